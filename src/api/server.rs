use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use crate::api::{AppState, router};
use crate::config::Settings;
use crate::gitlab::HttpGitLabClient;
use crate::packages::{
    FileCache, GitLabFileFetcher, GitLabProjectResolver, GitLabSubgroupResolver,
    PackageAggregator,
};

/// Wire the GitLab client, cache and resolvers into the aggregation service
pub fn build_state(settings: &Settings) -> anyhow::Result<AppState> {
    let client = Arc::new(
        HttpGitLabClient::new(
            &settings.gitlab_url,
            &settings.gitlab_api_version,
            settings.gitlab_token.clone(),
            settings.request_timeout(),
        )
        .context("Failed to create GitLab client")?,
    );
    let cache = Arc::new(FileCache::new());

    let subgroups = Arc::new(GitLabSubgroupResolver::new(client.clone()));
    let projects = Arc::new(GitLabProjectResolver::new(
        client.clone(),
        settings.max_concurrency,
    ));
    let files = Arc::new(
        GitLabFileFetcher::new(client, cache, settings.max_concurrency)
            .with_cache_ttl(settings.cache_ttl()),
    );

    Ok(Arc::new(PackageAggregator::new(subgroups, projects, files)))
}

pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    info!("Starting packagebusters with settings: {}", settings);

    let app = router(build_state(&settings)?);
    let listener = TcpListener::bind(settings.bind)
        .await
        .with_context(|| format!("Failed to bind {}", settings.bind))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
