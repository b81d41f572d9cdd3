//! In-memory GitLab test utilities

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use packagebusters::api::AppState;
use packagebusters::gitlab::{GitLabClient, GitLabError, Group, Project, RepositoryFile};
use packagebusters::packages::{
    FileCache, GitLabFileFetcher, GitLabProjectResolver, GitLabSubgroupResolver,
    PackageAggregator,
};

/// GitLab instance backed by maps, counting file requests
#[derive(Default)]
pub struct FakeGitLab {
    descendants: HashMap<u64, Vec<u64>>,
    projects: HashMap<u64, Vec<Project>>,
    files: HashMap<(u64, String), String>,
    failing_groups: Vec<u64>,
    file_requests: AtomicUsize,
}

impl FakeGitLab {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a group and its descendant group ids
    pub fn with_group(mut self, group_id: u64, descendants: &[u64]) -> Self {
        self.descendants.insert(group_id, descendants.to_vec());
        self
    }

    /// Register a project owned by `group_id`
    pub fn with_project(mut self, group_id: u64, project_id: u64, name: &str) -> Self {
        self.projects.entry(group_id).or_default().push(Project {
            id: project_id,
            name: name.to_string(),
            web_url: format!("https://gitlab.example.com/team/{}", name),
        });
        self
    }

    /// Register a plain text repository file
    pub fn with_file(mut self, project_id: u64, file_path: &str, content: &str) -> Self {
        self.files.insert(
            (project_id, file_path.to_string()),
            STANDARD.encode(content),
        );
        self
    }

    /// Make project listing of `group_id` fail with a server error
    pub fn with_failing_group(mut self, group_id: u64) -> Self {
        self.failing_groups.push(group_id);
        self
    }

    pub fn file_requests(&self) -> usize {
        self.file_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GitLabClient for FakeGitLab {
    async fn list_descendant_groups(&self, group_id: u64) -> Result<Vec<Group>, GitLabError> {
        match self.descendants.get(&group_id) {
            Some(ids) => Ok(ids.iter().map(|id| Group { id: *id }).collect()),
            None => Err(GitLabError::NotFound(format!("group {}", group_id))),
        }
    }

    async fn list_group_projects(&self, group_id: u64) -> Result<Vec<Project>, GitLabError> {
        if self.failing_groups.contains(&group_id) {
            return Err(GitLabError::InvalidResponse("HTTP 500".to_string()));
        }
        Ok(self.projects.get(&group_id).cloned().unwrap_or_default())
    }

    async fn get_file(
        &self,
        project_id: u64,
        file_path: &str,
        _reference: &str,
    ) -> Result<RepositoryFile, GitLabError> {
        self.file_requests.fetch_add(1, Ordering::SeqCst);
        match self.files.get(&(project_id, file_path.to_string())) {
            Some(content) => Ok(RepositoryFile {
                content: content.clone(),
            }),
            None => Err(GitLabError::NotFound(format!(
                "{} in project {}",
                file_path, project_id
            ))),
        }
    }
}

/// Wire the real pipeline on top of `gitlab`
pub fn create_test_state(gitlab: Arc<FakeGitLab>) -> AppState {
    let cache = Arc::new(FileCache::new());
    let subgroups = Arc::new(GitLabSubgroupResolver::new(gitlab.clone()));
    let projects = Arc::new(GitLabProjectResolver::new(gitlab.clone(), 4));
    let files = Arc::new(GitLabFileFetcher::new(gitlab, cache, 4));

    Arc::new(PackageAggregator::new(subgroups, projects, files))
}
