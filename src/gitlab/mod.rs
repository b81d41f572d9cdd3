//! GitLab REST API layer
//!
//! The aggregation pipeline only talks to GitLab through the [`client::GitLabClient`]
//! trait, so tests can substitute mocks for the network.
//!
//! # Modules
//!
//! - [`client`]: `GitLabClient` trait definition
//! - [`error`]: Error type for upstream API calls
//! - [`http`]: `reqwest` implementation of the trait with transparent pagination
//! - [`types`]: Resources deserialized from API responses

pub mod client;
pub mod error;
pub mod http;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use client::GitLabClient;
pub use error::GitLabError;
pub use http::HttpGitLabClient;
pub use types::{Group, Project, RepositoryFile};
