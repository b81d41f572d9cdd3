//! GitLab client that tracks how many calls are in flight

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::gitlab::client::GitLabClient;
use crate::gitlab::error::GitLabError;
use crate::gitlab::types::{Group, Project, RepositoryFile};

/// Every call sleeps for `delay` while counted as in flight
pub struct SlowGitLab {
    delay: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
}

impl SlowGitLab {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    /// Highest number of calls observed in flight at once
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn track(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(current, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl GitLabClient for SlowGitLab {
    async fn list_descendant_groups(&self, _group_id: u64) -> Result<Vec<Group>, GitLabError> {
        self.track().await;
        Ok(vec![])
    }

    async fn list_group_projects(&self, group_id: u64) -> Result<Vec<Project>, GitLabError> {
        self.track().await;
        Ok(vec![Project {
            id: group_id,
            name: format!("project_{}", group_id),
            web_url: format!("https://gitlab.example.com/project_{}", group_id),
        }])
    }

    async fn get_file(
        &self,
        _project_id: u64,
        _file_path: &str,
        _reference: &str,
    ) -> Result<RepositoryFile, GitLabError> {
        self.track().await;
        Ok(RepositoryFile {
            content: "Y29udGVudA==".to_string(),
        })
    }
}
