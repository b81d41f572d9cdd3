//! poetry.lock parser
//!
//! Reads the `[[package]]` array of tables and maps every locked package
//! name to its resolved version. When a name is locked more than once the
//! last entry wins.

use std::collections::HashMap;

use serde::Deserialize;

use crate::parser::traits::{ParseError, Parser};

#[derive(Debug, Deserialize)]
struct PoetryLock {
    #[serde(default)]
    package: Vec<LockedPackage>,
}

#[derive(Debug, Deserialize)]
struct LockedPackage {
    name: String,
    version: String,
}

/// Parser for poetry.lock files
pub struct PoetryLockParser;

impl PoetryLockParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PoetryLockParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for PoetryLockParser {
    type Output = HashMap<String, String>;

    fn parse(&self, content: &str) -> Result<Self::Output, ParseError> {
        let lock: PoetryLock = toml::from_str(content)?;

        Ok(lock
            .package
            .into_iter()
            .map(|package| (package.name, package.version))
            .collect())
    }
}
