use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use account_db::DbError;
use account_types::api::ErrorResponse;

/// Every failure a handler can return. The `Display` text is the exact
/// `error` string clients see, except for `Internal`, whose detail is only
/// logged.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Email Already Exists")]
    EmailTaken,
    /// Unknown email and wrong password both land here.
    #[error("Invalid password")]
    InvalidCredentials,
    #[error("{0}")]
    BadRequest(String),
    #[error("Access denied, no token provided")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        Self::Internal(detail.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::EmailTaken | Self::InvalidCredentials | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::MissingToken | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            error!("Internal error: {}", detail);
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::EmailTaken => Self::EmailTaken,
            other => Self::internal(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::internal(format!("spawn_blocking join error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_messages_match_wire_contract() {
        assert_eq!(ApiError::EmailTaken.to_string(), "Email Already Exists");
        assert_eq!(ApiError::InvalidCredentials.to_string(), "Invalid password");
        assert_eq!(
            ApiError::MissingToken.to_string(),
            "Access denied, no token provided"
        );
        assert_eq!(ApiError::InvalidToken.to_string(), "Invalid token");
    }

    #[test]
    fn statuses() {
        assert_eq!(ApiError::EmailTaken.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidCredentials.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::MissingToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::internal("boom").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_detail_is_not_exposed() {
        let err = ApiError::internal("disk on fire");
        assert_eq!(err.to_string(), "Internal server error");
    }

    #[test]
    fn db_errors_map_to_api_errors() {
        let err: ApiError = DbError::EmailTaken.into();
        assert!(matches!(err, ApiError::EmailTaken));

        let err: ApiError = DbError::LockPoisoned("x".into()).into();
        assert!(matches!(err, ApiError::Internal(_)));

        let err: ApiError = DbError::MissingAfterInsert("id-1".into()).into();
        assert!(matches!(err, ApiError::Internal(ref d) if d.contains("id-1")));
    }
}
