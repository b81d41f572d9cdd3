//! Resources returned by the GitLab API

use serde::Deserialize;

/// A repository tracked by GitLab
///
/// Only the fields the aggregation needs are deserialized; everything else in
/// the API payload is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub web_url: String,
}

/// A group returned by the descendant groups listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Group {
    pub id: u64,
}

/// Repository file as returned by the files API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryFile {
    /// Base64 encoded file body
    pub content: String,
}
