//! Request-scoped types of the aggregation pipeline

use serde::{Deserialize, Serialize};

pub use crate::gitlab::types::Project;

/// A fetched dependency file, still base64 encoded as delivered by GitLab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFile {
    pub content: String,
}

/// Project attribution of a package version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub project_name: String,
    pub project_url: String,
}

impl From<&Project> for ProjectRef {
    fn from(project: &Project) -> Self {
        Self {
            project_name: project.name.clone(),
            project_url: project.web_url.clone(),
        }
    }
}

/// One dependency of one project, before aggregation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageEntry {
    pub name: String,
    pub version: String,
    pub project: ProjectRef,
}

/// A package version and every project using it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupPackage {
    pub package_name: String,
    pub package_version: String,
    pub projects: Vec<ProjectRef>,
}
