//! Maps use-case failures onto status codes and a `{"error": ..}` body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::ports::user_repository::StoreError;
use crate::application::use_cases::auth::register::RegisterError;
use crate::application::use_cases::links::LinkError;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Details stay in the log; clients get a generic message.
    pub fn internal(err: impl std::fmt::Display) -> Self {
        tracing::error!(error = %err, "request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UserNotFound | StoreError::LinkNotFound => {
                Self::new(StatusCode::NOT_FOUND, err.to_string())
            }
            StoreError::UserAlreadyExists | StoreError::LinkAlreadyExists => {
                Self::new(StatusCode::CONFLICT, err.to_string())
            }
            // The target user vanished between authentication and the update.
            StoreError::NoRowsAffected => Self::new(StatusCode::NOT_FOUND, "user not found"),
            StoreError::UserRetrievalFailed
            | StoreError::DataScanFailed(_)
            | StoreError::DatabaseOperation(_) => Self::internal(&err),
        }
    }
}

impl From<RegisterError> for ApiError {
    fn from(err: RegisterError) -> Self {
        match err {
            RegisterError::WeakPassword
            | RegisterError::InvalidEmail
            | RegisterError::InvalidUsername => Self::bad_request(err.to_string()),
            RegisterError::Hash(_) => Self::internal(&err),
            RegisterError::Store(store) => store.into(),
        }
    }
}

impl From<LinkError> for ApiError {
    fn from(err: LinkError) -> Self {
        match err {
            LinkError::Incomplete => Self::bad_request(err.to_string()),
            LinkError::Store(store) => store.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_statuses() {
        let cases = [
            (StoreError::UserNotFound, StatusCode::NOT_FOUND),
            (StoreError::LinkNotFound, StatusCode::NOT_FOUND),
            (StoreError::UserAlreadyExists, StatusCode::CONFLICT),
            (StoreError::LinkAlreadyExists, StatusCode::CONFLICT),
            (StoreError::NoRowsAffected, StatusCode::NOT_FOUND),
            (
                StoreError::UserRetrievalFailed,
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                StoreError::DatabaseOperation(anyhow::anyhow!("disk I/O error")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn internal_failures_are_redacted() {
        let err = ApiError::from(StoreError::DataScanFailed(anyhow::anyhow!(
            "mismatched types; column link_user_id"
        )));
        assert_eq!(err.message, "internal server error");
    }
}
