use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sitekit_core::auth::AuthError;
use sitekit_core::errors::Error as CoreError;
use thiserror::Error;

const INTERNAL_ERROR: &str = "Internal server error";

/// Status and user-facing message for a core error.
///
/// Store and unexpected failures are logged here and reported opaquely.
fn classify(err: &CoreError) -> (StatusCode, String) {
    match err {
        CoreError::Validation(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        CoreError::Conflict(_) => (StatusCode::CONFLICT, err.to_string()),
        CoreError::Auth(AuthError::Provider(_)) => (StatusCode::BAD_REQUEST, err.to_string()),
        CoreError::Auth(AuthError::CredentialUpdate(_)) => {
            tracing::error!("Password update failed: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
        CoreError::Auth(AuthError::Provisioning(_))
        | CoreError::Database(_)
        | CoreError::Unexpected(_) => {
            tracing::error!("Request failed: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR.to_string())
        }
    }
}

/// Error of the JSON API routes, rendered as `{code, message}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            ApiError::Core(e) => classify(e),
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
            ApiError::Internal(reason) => {
                tracing::error!("Request failed: {}", reason);
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR.to_string())
            }
        };
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: msg,
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Error of the form actions, rendered as `{error}` like a failed form submission.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct ActionError(#[from] pub CoreError);

#[derive(Serialize)]
struct ActionErrorBody {
    error: String,
}

impl IntoResponse for ActionError {
    fn into_response(self) -> Response {
        let (status, error) = classify(&self.0);
        (status, Json(ActionErrorBody { error })).into_response()
    }
}

pub type ActionResult<T> = Result<T, ActionError>;
