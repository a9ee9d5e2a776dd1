//! Error handling middleware - RFC 7807 compliant responses.

use std::fmt;

use actix_web::{HttpRequest, HttpResponse, ResponseError, error::JsonPayloadError, http::StatusCode};
use quill_core::error::{DomainError, RepoError, SlugError};
use quill_core::ports::AuthError;
use quill_shared::ErrorResponse;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    Conflict(String),
    Internal(String),
}

impl AppError {
    /// Map a failed lookup of `entity` so a miss reads "`entity` not found".
    pub fn lookup(entity: &'static str) -> impl Fn(RepoError) -> AppError {
        move |err| match err {
            RepoError::NotFound => AppError::NotFound(format!("{entity} not found")),
            other => other.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        AppError::BadRequest(detail.into())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Unauthorized(detail) => ErrorResponse::unauthorized(detail),
            AppError::Forbidden(detail) => ErrorResponse::forbidden(detail),
            AppError::Conflict(detail) => ErrorResponse::conflict(detail),
            AppError::Internal(detail) => {
                // The cause stays in the logs
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidInput(msg) => AppError::BadRequest(msg),
            DomainError::NotFound { entity_type } => {
                AppError::NotFound(format!("{entity_type} not found"))
            }
            DomainError::Conflict(msg) => AppError::Conflict(msg),
            DomainError::Unauthorized => AppError::Unauthorized("invalid user".into()),
            DomainError::Forbidden(msg) => AppError::Forbidden(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("resource not found".to_string()),
            RepoError::Constraint(msg) => {
                tracing::warn!("Constraint violation: {}", msg);
                AppError::Conflict("resource already exists".to_string())
            }
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

impl From<SlugError> for AppError {
    fn from(err: SlugError) -> Self {
        match err {
            SlugError::Invalid => AppError::BadRequest("invalid slug".to_string()),
            SlugError::Conflict => AppError::Conflict("slug already in use".to_string()),
            SlugError::Repo(err) => err.into(),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::Unauthorized("invalid credentials".into()),
            AuthError::TokenExpired | AuthError::InvalidToken(_) | AuthError::MissingAuth => {
                AppError::Unauthorized(err.to_string())
            }
            AuthError::HashingError(msg) => AppError::Internal(msg),
        }
    }
}

/// Turn malformed JSON bodies into problem responses.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!("Rejected request body: {}", err);
    AppError::BadRequest(format!("invalid request body: {err}")).into()
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_status_codes() {
        let cases = [
            (AppError::from(DomainError::InvalidInput("x".into())), 400),
            (AppError::from(DomainError::Unauthorized), 401),
            (AppError::from(DomainError::Conflict("taken".into())), 409),
            (AppError::from(DomainError::Forbidden("x".into())), 403),
            (AppError::from(RepoError::NotFound), 404),
            (AppError::from(RepoError::Constraint("dup".into())), 409),
            (AppError::from(RepoError::Query("boom".into())), 500),
            (AppError::from(SlugError::Invalid), 400),
            (AppError::from(SlugError::Conflict), 409),
            (AppError::from(AuthError::InvalidCredentials), 401),
            (AppError::from(AuthError::HashingError("x".into())), 500),
        ];

        for (err, status) in cases {
            assert_eq!(err.status_code().as_u16(), status, "{err}");
        }
    }

    #[test]
    fn lookup_names_the_missing_entity() {
        let err = AppError::lookup("category")(RepoError::NotFound);
        assert!(matches!(err, AppError::NotFound(ref msg) if msg == "category not found"));

        let err = AppError::lookup("category")(RepoError::Query("boom".into()));
        assert!(matches!(err, AppError::Internal(_)));
    }
}
