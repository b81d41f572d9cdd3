//! Version resolution and ordering
//!
//! Versions are ordered by PEP 440, the scheme Poetry locks with. The
//! [`VERSION_UNKNOWN`] sentinel orders as version `0`, below every real
//! version. Strings that are not PEP 440 versions order after every parsed
//! version, lexicographically among themselves.

use std::collections::HashMap;
use std::str::FromStr;

use pep508_rs::pep440_rs::Version;
use tracing::warn;

/// Placeholder for a dependency without a resolvable version
pub const VERSION_UNKNOWN: &str = "Version Unknown";

/// Sort key of a version string
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum VersionKey {
    Pep440(Version),
    Unparsed(String),
}

/// Build the sort key for `version`
pub fn version_key(version: &str) -> VersionKey {
    let candidate = if version == VERSION_UNKNOWN {
        "0"
    } else {
        version
    };

    match Version::from_str(candidate) {
        Ok(parsed) => VersionKey::Pep440(parsed),
        Err(e) => {
            warn!("Failed to parse version '{}': {}", version, e);
            VersionKey::Unparsed(version.to_string())
        }
    }
}

/// Look up the locked version of `name`
///
/// Tries the literal name, then `-` replaced by `_`, then `_` replaced by
/// `-`. Falls back to [`VERSION_UNKNOWN`].
pub fn resolve_version(name: &str, locked: &HashMap<String, String>) -> String {
    [
        name.to_string(),
        name.replace('-', "_"),
        name.replace('_', "-"),
    ]
    .iter()
    .find_map(|candidate| locked.get(candidate).filter(|version| !version.is_empty()))
    .cloned()
    .unwrap_or_else(|| VERSION_UNKNOWN.to_string())
}
