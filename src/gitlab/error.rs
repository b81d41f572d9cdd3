use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitLabError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid GitLab URL: {0}")]
    InvalidUrl(String),
}
