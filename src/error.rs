use thiserror::Error;

use crate::gitlab::error::GitLabError;
use crate::parser::traits::ParseError;

/// Failure of a group packages request
#[derive(Debug, Error)]
pub enum PackageError {
    /// The requested group does not exist in GitLab
    #[error("Group {0} not found")]
    InvalidGroupId(u64),

    #[error("GitLab API error: {0}")]
    Upstream(#[from] GitLabError),

    #[error("Malformed {file_path} in project {project}: {source}")]
    MalformedFile {
        project: String,
        file_path: String,
        #[source]
        source: ParseError,
    },
}
