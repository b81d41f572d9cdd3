//! Descendant group discovery

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tracing::debug;

use crate::error::PackageError;
use crate::gitlab::client::GitLabClient;
use crate::gitlab::error::GitLabError;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait SubgroupResolver: Send + Sync {
    /// Returns the ids of every descendant group of `group_id`
    ///
    /// # Returns
    /// * `Err(PackageError::InvalidGroupId)` - If the group does not exist
    async fn get_subgroup_ids(&self, group_id: u64) -> Result<HashSet<u64>, PackageError>;
}

pub struct GitLabSubgroupResolver {
    client: Arc<dyn GitLabClient>,
}

impl GitLabSubgroupResolver {
    pub fn new(client: Arc<dyn GitLabClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SubgroupResolver for GitLabSubgroupResolver {
    async fn get_subgroup_ids(&self, group_id: u64) -> Result<HashSet<u64>, PackageError> {
        debug!("Getting subgroups for group {}", group_id);

        let groups = self
            .client
            .list_descendant_groups(group_id)
            .await
            .map_err(|e| match e {
                GitLabError::NotFound(_) => PackageError::InvalidGroupId(group_id),
                other => PackageError::Upstream(other),
            })?;

        let subgroup_ids: HashSet<u64> = groups.into_iter().map(|group| group.id).collect();
        debug!(
            "Received subgroup ids {:?} for group {}",
            subgroup_ids, group_id
        );

        Ok(subgroup_ids)
    }
}
