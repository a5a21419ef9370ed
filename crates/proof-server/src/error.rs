//! Maps engine and prover errors to JSON HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use membership_circuits::MerkleError;
use membership_prover::ProveError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = serde_json::json!({
            "error": {
                "code": status.as_u16(),
                "message": self.to_string(),
            }
        });
        (status, axum::Json(body)).into_response()
    }
}

impl From<MerkleError> for ApiError {
    fn from(e: MerkleError) -> Self {
        match &e {
            MerkleError::NotFound(_) => ApiError::NotFound(e.to_string()),
            MerkleError::StaleTree
            | MerkleError::CorruptSnapshot(_)
            | MerkleError::Io(_)
            | MerkleError::Serialization(_) => ApiError::Internal(e.to_string()),
            _ => ApiError::Validation(e.to_string()),
        }
    }
}

impl From<ProveError> for ApiError {
    fn from(e: ProveError) -> Self {
        match &e {
            ProveError::Tree(inner) => inner.clone().into(),
            ProveError::DepthMismatch { .. } | ProveError::InvalidWitness(_) => {
                ApiError::Validation(e.to_string())
            }
            ProveError::ProofGeneration(_) | ProveError::Serialization(_) => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}
