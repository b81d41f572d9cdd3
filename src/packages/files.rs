//! Concurrent dependency file retrieval
//!
//! Files are read at [`DEFAULT_REF`]. A file GitLab reports as missing is
//! cached as an empty body so later lookups skip the API, and is returned as
//! `None`. Empty files are treated as missing as well.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use futures::stream::{self, StreamExt};
#[cfg(test)]
use mockall::automock;
use tracing::debug;

use crate::config::DEFAULT_REF;
use crate::error::PackageError;
use crate::gitlab::client::GitLabClient;
use crate::gitlab::error::GitLabError;
use crate::packages::cache::FileStorer;
use crate::packages::types::{Project, ProjectFile};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait FileFetcher: Send + Sync {
    /// Fetches one file, consulting the cache first when `use_cache` is set
    ///
    /// # Returns
    /// * `Ok(None)` - If the project has no such file
    async fn get_file(
        &self,
        project_id: u64,
        file_path: &str,
        use_cache: bool,
    ) -> Result<Option<ProjectFile>, PackageError>;

    /// Fetches `file_path` for every project, in completion order
    async fn batch_get_files(
        &self,
        projects: &[Project],
        file_path: &str,
        use_cache: bool,
    ) -> Result<Vec<(Project, Option<ProjectFile>)>, PackageError>;
}

pub struct GitLabFileFetcher {
    client: Arc<dyn GitLabClient>,
    cache: Arc<dyn FileStorer>,
    max_concurrency: usize,
    cache_ttl: Option<Duration>,
}

impl GitLabFileFetcher {
    pub fn new(
        client: Arc<dyn GitLabClient>,
        cache: Arc<dyn FileStorer>,
        max_concurrency: usize,
    ) -> Self {
        Self {
            client,
            cache,
            max_concurrency: max_concurrency.max(1),
            cache_ttl: None,
        }
    }

    /// Expire cached entries older than `cache_ttl`
    pub fn with_cache_ttl(mut self, cache_ttl: Option<Duration>) -> Self {
        self.cache_ttl = cache_ttl;
        self
    }

    /// Cached content, unless the entry has outlived the TTL
    fn cached_content(&self, project_id: u64, file_path: &str) -> Option<String> {
        let content = self.cache.get(project_id, file_path)?;

        if let Some(ttl) = self.cache_ttl {
            let expired = self
                .cache
                .get_created_at(project_id, file_path)
                .and_then(|created_at| (Utc::now() - created_at).to_std().ok())
                .is_none_or(|age| age >= ttl);

            if expired {
                debug!(
                    "Cached file {} for project {} expired",
                    file_path, project_id
                );
                self.cache.delete(project_id, file_path);
                return None;
            }
        }

        Some(content)
    }
}

fn non_empty(content: String) -> Option<ProjectFile> {
    (!content.is_empty()).then_some(ProjectFile { content })
}

#[async_trait]
impl FileFetcher for GitLabFileFetcher {
    async fn get_file(
        &self,
        project_id: u64,
        file_path: &str,
        use_cache: bool,
    ) -> Result<Option<ProjectFile>, PackageError> {
        if use_cache {
            if let Some(content) = self.cached_content(project_id, file_path) {
                debug!(
                    "Received file {} for project {} from cache",
                    file_path, project_id
                );
                return Ok(non_empty(content));
            }
            debug!(
                "File {} for project {} not found in cache",
                file_path, project_id
            );
        }

        debug!("Getting file {} for project {}", file_path, project_id);
        match self.client.get_file(project_id, file_path, DEFAULT_REF).await {
            Ok(file) => {
                debug!("Received file {} for project {}", file_path, project_id);
                self.cache.set(project_id, file_path, file.content.clone());
                Ok(non_empty(file.content))
            }
            Err(GitLabError::NotFound(_)) => {
                debug!("File {} not found in project {}", file_path, project_id);
                self.cache.set(project_id, file_path, String::new());
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn batch_get_files(
        &self,
        projects: &[Project],
        file_path: &str,
        use_cache: bool,
    ) -> Result<Vec<(Project, Option<ProjectFile>)>, PackageError> {
        let results: Vec<Result<(Project, Option<ProjectFile>), PackageError>> =
            stream::iter(projects.iter().cloned())
                .map(|project| async move {
                    let file = self.get_file(project.id, file_path, use_cache).await?;
                    Ok::<_, PackageError>((project, file))
                })
                .buffer_unordered(self.max_concurrency)
                .collect()
                .await;

        results.into_iter().collect()
    }
}
