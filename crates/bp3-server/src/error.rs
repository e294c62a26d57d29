use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bp3_pipeline::PipelineError;
use bp3_storage::{StorageError, UploadFailure};
use bp3_structure::StructureError;
use log::error;
use serde::Serialize;
use thiserror::Error;

/// Failure of a request, carrying its HTTP status.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("input file is larger than {limit} bytes: {url}")]
    InputTooLarge { url: String, limit: u64 },

    #[error("failed to parse input: {0}")]
    Parse(String),

    #[error(transparent)]
    Download(StorageError),

    #[error(transparent)]
    Upload(StorageError),

    #[error("failed to upload {}", describe_failures(.0))]
    PartialUpload(Vec<UploadFailure>),

    #[error(transparent)]
    Prediction(#[from] PipelineError),

    #[error("internal error: {0}")]
    Internal(String),
}

fn describe_failures(failures: &[UploadFailure]) -> String {
    failures
        .iter()
        .map(|failure| format!("{} ({})", failure.key, failure.reason))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ServiceError {
    /// Transfer failures are the remote side's fault; local disk errors are ours.
    pub fn download(err: StorageError) -> Self {
        match err {
            StorageError::Io(_) => ServiceError::Internal(err.to_string()),
            _ => ServiceError::Download(err),
        }
    }

    pub fn upload(err: StorageError) -> Self {
        match err {
            StorageError::Io(_) => ServiceError::Internal(err.to_string()),
            _ => ServiceError::Upload(err),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::InputTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ServiceError::Parse(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::Download(_) => StatusCode::BAD_GATEWAY,
            ServiceError::Upload(_) | ServiceError::PartialUpload(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ServiceError::Prediction(_) | ServiceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<StructureError> for ServiceError {
    fn from(err: StructureError) -> Self {
        match err {
            StructureError::UnknownResidue { .. } => ServiceError::Parse(err.to_string()),
            StructureError::Io(_) => ServiceError::Internal(err.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for ServiceError {
    fn from(err: tokio::task::JoinError) -> Self {
        ServiceError::Internal(format!("worker task failed: {err}"))
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    code: u16,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        error!("request failed ({status}): {message}");
        let body = ErrorBody {
            message,
            code: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}
