//! Group package aggregation
//!
//! Discovers every project of a GitLab group tree, fetches its dependency
//! files and folds them into a package → version → projects view.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐   ┌────────────────┐   ┌────────────────┐
//! │   Subgroups    │──▶│    Projects    │──▶│     Files      │
//! │ (descendants)  │   │ (fan-out/group)│   │(fan-out/project)│
//! └────────────────┘   └────────────────┘   └────────────────┘
//!                                                   │
//!                      ┌────────────────┐   ┌────────────────┐
//!                      │   Aggregator   │◀──│     Cache      │
//!                      │ (parse & sort) │   │  (in-memory)   │
//!                      └────────────────┘   └────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`aggregator`]: Orchestrates the pipeline and produces sorted output
//! - [`cache`]: In-memory file cache shared by all requests
//! - [`files`]: Concurrent dependency file retrieval
//! - [`projects`]: Concurrent project listing per group
//! - [`subgroups`]: Descendant group discovery
//! - [`types`]: Request-scoped data types
//! - [`version`]: Version resolution and ordering

pub mod aggregator;
pub mod cache;
pub mod files;
pub mod projects;
pub mod subgroups;
pub mod types;
pub mod version;

pub use aggregator::{GroupPackageGetter, PackageAggregator};
pub use cache::{FileCache, FileStorer};
pub use files::{FileFetcher, GitLabFileFetcher};
pub use projects::{GitLabProjectResolver, ProjectResolver};
pub use subgroups::{GitLabSubgroupResolver, SubgroupResolver};
pub use types::{GroupPackage, PackageEntry, ProjectFile, ProjectRef};
