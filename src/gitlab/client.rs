//! Client trait for the GitLab API

#[cfg(test)]
use mockall::automock;

use crate::gitlab::error::GitLabError;
use crate::gitlab::types::{Group, Project, RepositoryFile};

/// Operations the aggregation pipeline needs from GitLab
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait GitLabClient: Send + Sync {
    /// Lists every descendant group of `group_id`
    ///
    /// # Returns
    /// * `Err(GitLabError::NotFound)` - If the group does not exist
    async fn list_descendant_groups(&self, group_id: u64) -> Result<Vec<Group>, GitLabError>;

    /// Lists the non-archived projects owned by `group_id`
    async fn list_group_projects(&self, group_id: u64) -> Result<Vec<Project>, GitLabError>;

    /// Fetches a single repository file at `reference`
    ///
    /// # Returns
    /// * `Err(GitLabError::NotFound)` - If the file (or project) does not exist
    async fn get_file(
        &self,
        project_id: u64,
        file_path: &str,
        reference: &str,
    ) -> Result<RepositoryFile, GitLabError>;
}
