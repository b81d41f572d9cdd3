use axum::Json;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::PackageError;

/// Error codes carried in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    BadRequest = 1,
    BadGitlabGroupId = 2,
    UpstreamFailure = 3,
    MalformedFile = 4,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "BadRequest",
            ErrorCode::BadGitlabGroupId => "BadGitlabGroupId",
            ErrorCode::UpstreamFailure => "UpstreamFailure",
            ErrorCode::MalformedFile => "MalformedFile",
        }
    }
}

/// JSON body of an error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "type")]
    pub error_type: String,
    pub detail: String,
    pub error_code: u8,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: ErrorCode,
    detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: ErrorCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            code,
            detail: detail.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, detail)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    fn body(&self) -> ErrorBody {
        ErrorBody {
            error_type: self.code.as_str().to_string(),
            detail: self.detail.clone(),
            error_code: self.code as u8,
        }
    }
}

impl From<PackageError> for ApiError {
    fn from(err: PackageError) -> Self {
        let (status, code) = match &err {
            PackageError::InvalidGroupId(_) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadGitlabGroupId)
            }
            PackageError::Upstream(_) => (StatusCode::BAD_GATEWAY, ErrorCode::UpstreamFailure),
            PackageError::MalformedFile { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::MalformedFile)
            }
        };
        Self::new(status, code, err.to_string())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(
            "Response error: {}, error_code: {}",
            self.detail, self.code as u8
        );
        (self.status, Json(self.body())).into_response()
    }
}
