//! Dockerfile parser
//!
//! Extracts the Python version from the first `python:<version>` image
//! reference, e.g. `FROM python:3.12.2-slim` or a `BASE_IMAGE` build arg
//! pointing at a mirrored python image. Accepted version shapes are
//! `MAJOR.MINOR` and `MAJOR.MINOR.PATCH`.

use regex::Regex;

use crate::parser::traits::{ParseError, Parser};

/// Parser for Dockerfiles
pub struct DockerfileParser {
    /// Regex for the version following `python:`
    python_version_re: Regex,
}

impl DockerfileParser {
    pub fn new() -> Self {
        Self {
            python_version_re: Regex::new(r"python:(\d+\.\d+\.?\d*)").unwrap(),
        }
    }
}

impl Default for DockerfileParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for DockerfileParser {
    /// `None` when no python image reference is found
    type Output = Option<String>;

    fn parse(&self, content: &str) -> Result<Self::Output, ParseError> {
        Ok(self
            .python_version_re
            .captures(content)
            .and_then(|caps| caps.get(1))
            .map(|version| version.as_str().to_string()))
    }
}
