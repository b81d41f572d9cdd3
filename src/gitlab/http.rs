//! GitLab REST API client backed by reqwest

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::gitlab::client::GitLabClient;
use crate::gitlab::error::GitLabError;
use crate::gitlab::types::{Group, Project, RepositoryFile};

/// Page size requested from list endpoints (GitLab caps it at 100)
const PER_PAGE: &str = "100";

/// Header carrying the next page number; empty on the last page
const NEXT_PAGE_HEADER: &str = "x-next-page";

const TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// GitLab API client
pub struct HttpGitLabClient {
    client: Client,
    api_url: Url,
    token: String,
}

impl HttpGitLabClient {
    /// Creates a client for `{base_url}/api/v{api_version}/`
    pub fn new(
        base_url: &str,
        api_version: &str,
        token: String,
        timeout: Duration,
    ) -> Result<Self, GitLabError> {
        let api_url = format!("{}/api/v{}/", base_url.trim_end_matches('/'), api_version);
        let api_url = Url::parse(&api_url).map_err(|e| GitLabError::InvalidUrl(e.to_string()))?;
        if api_url.cannot_be_a_base() {
            return Err(GitLabError::InvalidUrl(api_url.to_string()));
        }

        let client = Client::builder()
            .user_agent("packagebusters")
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            api_url,
            token,
        })
    }

    /// Appends percent-encoded path segments to the API root
    fn endpoint(&self, segments: &[&str]) -> Result<Url, GitLabError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| GitLabError::InvalidUrl(self.api_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<reqwest::Response, GitLabError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(GitLabError::NotFound(url.path().to_string()));
        }

        if !status.is_success() {
            warn!("GitLab API returned status {}: {}", status, url.path());
            return Err(GitLabError::InvalidResponse(format!(
                "GitLab API returned status {} for {}",
                status,
                url.path()
            )));
        }

        Ok(response)
    }

    /// Follows `x-next-page` until the listing is exhausted
    async fn get_all_pages<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, GitLabError> {
        let mut items = Vec::new();
        let mut page = "1".to_string();

        loop {
            let mut page_url = url.clone();
            page_url
                .query_pairs_mut()
                .append_pair("per_page", PER_PAGE)
                .append_pair("page", &page);

            let response = self.get(page_url).await?;

            let next_page = response
                .headers()
                .get(NEXT_PAGE_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string);

            let mut batch: Vec<T> = response.json().await.map_err(|e| {
                warn!("Failed to parse GitLab listing response: {}", e);
                GitLabError::InvalidResponse(e.to_string())
            })?;
            items.append(&mut batch);

            match next_page {
                Some(next) => page = next,
                None => break,
            }
        }

        Ok(items)
    }
}

#[async_trait]
impl GitLabClient for HttpGitLabClient {
    async fn list_descendant_groups(&self, group_id: u64) -> Result<Vec<Group>, GitLabError> {
        let group_id = group_id.to_string();
        let url = self.endpoint(&["groups", &group_id, "descendant_groups"])?;
        self.get_all_pages(url).await
    }

    async fn list_group_projects(&self, group_id: u64) -> Result<Vec<Project>, GitLabError> {
        let group_id = group_id.to_string();
        let mut url = self.endpoint(&["groups", &group_id, "projects"])?;
        url.query_pairs_mut().append_pair("archived", "false");
        self.get_all_pages(url).await
    }

    async fn get_file(
        &self,
        project_id: u64,
        file_path: &str,
        reference: &str,
    ) -> Result<RepositoryFile, GitLabError> {
        let project_id = project_id.to_string();
        let mut url = self.endpoint(&["projects", &project_id, "repository", "files", file_path])?;
        url.query_pairs_mut().append_pair("ref", reference);

        self.get(url).await?.json().await.map_err(|e| {
            warn!("Failed to parse GitLab file response: {}", e);
            GitLabError::InvalidResponse(e.to_string())
        })
    }
}
