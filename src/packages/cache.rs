//! In-memory file cache
//!
//! Memoizes fetched file bodies per `(project_id, file_path)` for the whole
//! process lifetime. An empty body records that the file is known to be
//! absent. There is no eviction and no size bound; expiry, when wanted, is
//! decided by the reader through [`FileStorer::get_created_at`].

#[cfg(test)]
use mockall::automock;

use chrono::{DateTime, Utc};
use dashmap::DashMap;

/// Trait for storing and retrieving fetched files
#[cfg_attr(test, automock)]
pub trait FileStorer: Send + Sync {
    /// Store `content`, replacing any previous entry
    fn set(&self, project_id: u64, file_path: &str, content: String);

    /// Get the stored content
    fn get(&self, project_id: u64, file_path: &str) -> Option<String>;

    /// Get the time the entry was stored
    fn get_created_at(&self, project_id: u64, file_path: &str) -> Option<DateTime<Utc>>;

    /// Remove the entry; absent entries are ignored
    fn delete(&self, project_id: u64, file_path: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedFile {
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct FileCache {
    files: DashMap<(u64, String), CachedFile>,
}

impl FileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn key(project_id: u64, file_path: &str) -> (u64, String) {
        (project_id, file_path.to_string())
    }
}

impl FileStorer for FileCache {
    fn set(&self, project_id: u64, file_path: &str, content: String) {
        self.files.insert(
            Self::key(project_id, file_path),
            CachedFile {
                content,
                created_at: Utc::now(),
            },
        );
    }

    fn get(&self, project_id: u64, file_path: &str) -> Option<String> {
        self.files
            .get(&Self::key(project_id, file_path))
            .map(|file| file.content.clone())
    }

    fn get_created_at(&self, project_id: u64, file_path: &str) -> Option<DateTime<Utc>> {
        self.files
            .get(&Self::key(project_id, file_path))
            .map(|file| file.created_at)
    }

    fn delete(&self, project_id: u64, file_path: &str) {
        self.files.remove(&Self::key(project_id, file_path));
    }
}
