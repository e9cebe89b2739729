use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::store::StoreError;

/// Result type for catalog operations
pub type AdminResult<T> = Result<T, AdminError>;

/// Errors surfaced by catalog operations
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// Caller input failed a precondition; nothing was written
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Stored data violates an invariant the catalog relies on
    #[error("Inconsistent catalog state: {0}")]
    Consistency(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AdminError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AdminError::Validation(_) => StatusCode::BAD_REQUEST,
            AdminError::NotFound(_) => StatusCode::NOT_FOUND,
            AdminError::Consistency(_) => StatusCode::CONFLICT,
            AdminError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            AdminError::Store(StoreError::Conflict(_)) => StatusCode::CONFLICT,
            AdminError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Admin request failed: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Parse a text identifier received at the API boundary
pub fn parse_id(raw: &str, what: &str) -> AdminResult<ulid::Ulid> {
    ulid::Ulid::from_string(raw.trim())
        .map_err(|_| AdminError::Validation(format!("Malformed {} id '{}'", what, raw)))
}
