//! Poetry dependency inventory for GitLab group trees
//!
//! # Modules
//!
//! - [`api`]: axum router, handlers and the server loop
//! - [`config`]: Settings and service constants
//! - [`error`]: Error type of the aggregation pipeline
//! - [`gitlab`]: GitLab REST API client
//! - [`logging`]: tracing subscriber setup
//! - [`packages`]: Group traversal, file fetching and package aggregation
//! - [`parser`]: poetry.lock, pyproject.toml and Dockerfile parsers

pub mod api;
pub mod config;
pub mod error;
pub mod gitlab;
pub mod logging;
pub mod packages;
pub mod parser;
