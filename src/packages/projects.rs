//! Concurrent project listing

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
#[cfg(test)]
use mockall::automock;
use tracing::debug;

use crate::error::PackageError;
use crate::gitlab::client::GitLabClient;
use crate::packages::types::Project;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProjectResolver: Send + Sync {
    /// Lists the non-archived projects owned by one group
    async fn get_projects(&self, group_id: u64) -> Result<Vec<Project>, PackageError>;

    /// Lists the projects of every group, in completion order
    ///
    /// Any failing group fails the whole batch.
    async fn batch_get_projects(
        &self,
        group_ids: &HashSet<u64>,
    ) -> Result<Vec<Project>, PackageError>;
}

pub struct GitLabProjectResolver {
    client: Arc<dyn GitLabClient>,
    max_concurrency: usize,
}

impl GitLabProjectResolver {
    pub fn new(client: Arc<dyn GitLabClient>, max_concurrency: usize) -> Self {
        Self {
            client,
            max_concurrency: max_concurrency.max(1),
        }
    }
}

#[async_trait]
impl ProjectResolver for GitLabProjectResolver {
    async fn get_projects(&self, group_id: u64) -> Result<Vec<Project>, PackageError> {
        debug!("Getting projects for group {}", group_id);

        let projects = self.client.list_group_projects(group_id).await?;

        debug!(
            "Received project ids {:?} for group {}",
            projects.iter().map(|project| project.id).collect::<Vec<_>>(),
            group_id
        );

        Ok(projects)
    }

    async fn batch_get_projects(
        &self,
        group_ids: &HashSet<u64>,
    ) -> Result<Vec<Project>, PackageError> {
        let results: Vec<Result<Vec<Project>, PackageError>> = stream::iter(group_ids.iter().copied())
            .map(|group_id| self.get_projects(group_id))
            .buffer_unordered(self.max_concurrency)
            .collect()
            .await;

        let mut projects = Vec::new();
        for result in results {
            projects.extend(result?);
        }

        Ok(projects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gitlab::client::MockGitLabClient;
    use crate::gitlab::error::GitLabError;
    use crate::gitlab::testing::SlowGitLab;
    use std::time::Duration;

    fn project(id: u64) -> Project {
        Project {
            id,
            name: format!("project_{}", id),
            web_url: format!("https://gitlab.example.com/project_{}", id),
        }
    }

    #[tokio::test]
    async fn get_projects_returns_group_projects() {
        let mut client = MockGitLabClient::new();
        client
            .expect_list_group_projects()
            .withf(|group_id| *group_id == 5)
            .times(1)
            .returning(|_| Ok(vec![project(1), project(2)]));

        let resolver = GitLabProjectResolver::new(Arc::new(client), 4);
        let result = resolver.get_projects(5).await.unwrap();

        assert_eq!(result, vec![project(1), project(2)]);
    }

    #[tokio::test]
    async fn batch_get_projects_flattens_every_group() {
        let mut client = MockGitLabClient::new();
        client
            .expect_list_group_projects()
            .times(3)
            .returning(|group_id| match group_id {
                1 => Ok(vec![project(10), project(11)]),
                2 => Ok(vec![project(20)]),
                _ => Ok(vec![]),
            });

        let resolver = GitLabProjectResolver::new(Arc::new(client), 2);
        let mut result = resolver
            .batch_get_projects(&HashSet::from([1, 2, 3]))
            .await
            .unwrap();

        result.sort_by_key(|project| project.id);
        assert_eq!(result, vec![project(10), project(11), project(20)]);
    }

    #[tokio::test]
    async fn batch_get_projects_fails_when_any_group_fails() {
        let mut client = MockGitLabClient::new();
        client
            .expect_list_group_projects()
            .returning(|group_id| match group_id {
                2 => Err(GitLabError::InvalidResponse("status 500".to_string())),
                _ => Ok(vec![project(group_id)]),
            });

        let resolver = GitLabProjectResolver::new(Arc::new(client), 4);
        let result = resolver.batch_get_projects(&HashSet::from([1, 2, 3])).await;

        assert!(matches!(result, Err(PackageError::Upstream(_))));
    }

    #[tokio::test]
    async fn batch_get_projects_returns_empty_for_no_groups() {
        let mut client = MockGitLabClient::new();
        client.expect_list_group_projects().times(0);

        let resolver = GitLabProjectResolver::new(Arc::new(client), 0);
        let result = resolver.batch_get_projects(&HashSet::new()).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn batch_get_projects_keeps_at_most_max_concurrency_in_flight() {
        let client = Arc::new(SlowGitLab::new(Duration::from_millis(20)));
        let group_ids: HashSet<u64> = (1..=8).collect();

        let resolver = GitLabProjectResolver::new(client.clone(), 2);
        let result = resolver.batch_get_projects(&group_ids).await.unwrap();

        assert_eq!(result.len(), 8);
        assert_eq!(client.calls(), 8);
        assert_eq!(client.peak(), 2);
    }
}
