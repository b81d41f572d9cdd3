//! Parser layer
//! - traits.rs: Parser trait definition and ParseError
//! - poetry_lock.rs: poetry.lock parser (name -> resolved version)
//! - pyproject_toml.rs: pyproject.toml parser (declared Poetry dependencies)
//! - dockerfile.rs: Dockerfile parser (python base image version)
//!
//! GitLab delivers file bodies base64 encoded; [`decode_content`] turns them
//! back into text before any parser sees them.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

pub mod dockerfile;
pub mod poetry_lock;
pub mod pyproject_toml;
pub mod traits;

pub use dockerfile::DockerfileParser;
pub use poetry_lock::PoetryLockParser;
pub use pyproject_toml::PyprojectTomlParser;
pub use traits::{ParseError, Parser};

/// Decode a base64 file body into UTF-8 text, ignoring embedded whitespace
pub fn decode_content(content: &str) -> Result<String, ParseError> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact)?;
    Ok(String::from_utf8(bytes)?)
}
