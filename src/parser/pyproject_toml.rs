//! pyproject.toml parser for Poetry projects
//!
//! Collects the dependency names declared under:
//! - `[tool.poetry.dependencies]` - Main project dependencies
//! - `[tool.poetry.dev-dependencies]` - Legacy development dependencies
//! - `[tool.poetry.group.<name>.dependencies]` - Every dependency group
//!
//! The `python` entry constrains the interpreter rather than naming a
//! package, so it is never reported.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

use crate::parser::traits::{ParseError, Parser};

const PYTHON_CONSTRAINT: &str = "python";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Pyproject {
    tool: Tool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Tool {
    poetry: Poetry,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Poetry {
    dependencies: toml::Table,
    #[serde(rename = "dev-dependencies")]
    dev_dependencies: toml::Table,
    group: BTreeMap<String, DependencyGroup>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DependencyGroup {
    dependencies: toml::Table,
}

/// Parser for pyproject.toml files
pub struct PyprojectTomlParser;

impl PyprojectTomlParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PyprojectTomlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for PyprojectTomlParser {
    type Output = BTreeSet<String>;

    fn parse(&self, content: &str) -> Result<Self::Output, ParseError> {
        let pyproject: Pyproject = toml::from_str(content)?;
        let poetry = pyproject.tool.poetry;

        let mut dependencies: BTreeSet<String> = poetry
            .dependencies
            .into_iter()
            .chain(poetry.dev_dependencies)
            .map(|(name, _)| name)
            .collect();

        for group in poetry.group.into_values() {
            dependencies.extend(group.dependencies.into_iter().map(|(name, _)| name));
        }

        dependencies.remove(PYTHON_CONSTRAINT);

        Ok(dependencies)
    }
}
