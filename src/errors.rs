//! # Error taxonomy
//!
//! Every operation returns `Result<_, ApiError>`. Handlers never let an
//! error escape: [`crate::context::RequestContext::reject`] renders it into
//! the result envelope with localized text, so clients always receive the
//! same body shape.
//!
//! | Variant            | HTTP | Typical cause                               |
//! |--------------------|------|---------------------------------------------|
//! | `BadRequest`       | 400  | bad page number, id mismatch, empty keyword |
//! | `ValidationFailed` | 400  | one entry per violated field rule           |
//! | `NotFound`         | 404  | entity, reference or route absent           |
//! | `MethodNotAllowed` | 405  | route exists, method does not               |
//! | `RequestTimeout`   | 408  | handler outlived the configured timeout     |
//! | `Conflict`         | 500  | optimistic-concurrency conflict on update   |
//! | `Database`         | 500  | any other storage fault                     |
//! | `Internal`         | 500  | runtime faults outside the store            |
//!
//! Internal fault text is only copied into the envelope when the
//! `errors.expose_internal` setting is on. It is always logged.

use axum::http::StatusCode;
use sea_orm::DbErr;
use std::fmt;

use crate::i18n::keys;

#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request with a single message key
    BadRequest { key: &'static str },

    /// 400 Bad Request, one message key per violated field rule
    ValidationFailed { errors: Vec<&'static str> },

    /// 404 Not Found
    NotFound { key: &'static str },

    /// 405 Method Not Allowed
    MethodNotAllowed,

    /// 408 Request Timeout
    RequestTimeout,

    /// 500 - the row changed or vanished between read and write
    Conflict { internal: DbErr },

    /// 500 - storage fault (details logged, optionally exposed)
    Database { internal: DbErr },

    /// 500 - non-storage fault such as file I/O
    Internal { message: String },
}

impl ApiError {
    #[must_use]
    pub fn bad_request(key: &'static str) -> Self {
        Self::BadRequest { key }
    }

    #[must_use]
    pub fn not_found(key: &'static str) -> Self {
        Self::NotFound { key }
    }

    #[must_use]
    pub fn validation_failed(errors: Vec<&'static str>) -> Self {
        Self::ValidationFailed { errors }
    }

    #[must_use]
    pub fn conflict(internal: DbErr) -> Self {
        Self::Conflict { internal }
    }

    #[must_use]
    pub fn database(internal: DbErr) -> Self {
        Self::Database { internal }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } | Self::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            Self::Conflict { .. } | Self::Database { .. } | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message key used for the envelope's `message` field.
    #[must_use]
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::BadRequest { key } | Self::NotFound { key } => *key,
            Self::ValidationFailed { .. } => keys::VALIDATION_FAILED,
            Self::MethodNotAllowed => keys::METHOD_NOT_ALLOWED,
            Self::RequestTimeout => keys::REQUEST_TIMEOUT,
            Self::Conflict { .. } => keys::CONCURRENCY_CONFLICT,
            Self::Database { .. } | Self::Internal { .. } => keys::INTERNAL_SERVER_ERROR,
        }
    }

    /// Builds the envelope's `errors` list and `message` text.
    ///
    /// `translate` maps a message key to display text for the request's
    /// locale. The returned error list is never empty.
    pub fn describe<F>(&self, translate: F, expose_internal: bool) -> (Vec<String>, String)
    where
        F: Fn(&str) -> String,
    {
        let message = translate(self.message_key());
        let errors = match self {
            Self::BadRequest { key } | Self::NotFound { key } => vec![translate(*key)],
            Self::ValidationFailed { errors } if !errors.is_empty() => {
                errors.iter().map(|key| translate(*key)).collect()
            }
            Self::ValidationFailed { .. } | Self::MethodNotAllowed | Self::RequestTimeout => {
                vec![message.clone()]
            }
            Self::Conflict { internal } | Self::Database { internal } => {
                if expose_internal {
                    vec![internal.to_string()]
                } else {
                    vec![message.clone()]
                }
            }
            Self::Internal { message: detail } => {
                if expose_internal {
                    vec![detail.clone()]
                } else {
                    vec![message.clone()]
                }
            }
        };
        (errors, message)
    }

    /// Server faults go out at error level, client mistakes at debug.
    pub fn log(&self) {
        match self {
            Self::Conflict { internal } => {
                tracing::error!(error = ?internal, "Concurrency conflict on update");
            }
            Self::Database { internal } => {
                tracing::error!(error = ?internal, "Database error occurred");
            }
            Self::Internal { message } => {
                tracing::error!(details = %message, "Internal error occurred");
            }
            _ => {
                tracing::debug!(
                    error = %self,
                    status = %self.status_code(),
                    "API error"
                );
            }
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest { key } | Self::NotFound { key } => write!(f, "{key}"),
            Self::ValidationFailed { errors } => {
                write!(f, "{}: {}", keys::VALIDATION_FAILED, errors.join(", "))
            }
            Self::MethodNotAllowed => f.write_str(keys::METHOD_NOT_ALLOWED),
            Self::RequestTimeout => f.write_str(keys::REQUEST_TIMEOUT),
            Self::Conflict { internal } | Self::Database { internal } => write!(f, "{internal}"),
            Self::Internal { message } => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// `RecordNotUpdated` is how sea-orm reports an UPDATE that touched no row,
/// which is the conflict signal. Everything else is a plain storage fault.
impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::RecordNotUpdated => Self::Conflict { internal: err },
            other => Self::Database { internal: other },
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo(key: &str) -> String {
        format!("<{key}>")
    }

    #[test]
    fn test_status_codes_follow_taxonomy() {
        assert_eq!(
            ApiError::bad_request(keys::INVALID_PAGE_NUMBER).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::validation_failed(vec!["PriceRequired"]).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::not_found("CategoryNotFound").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::conflict(DbErr::RecordNotUpdated).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::internal("disk full").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_routing_failures_carry_their_own_message() {
        let (errors, message) = ApiError::MethodNotAllowed.describe(echo, false);
        assert_eq!(ApiError::MethodNotAllowed.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(errors, vec![format!("<{}>", keys::METHOD_NOT_ALLOWED)]);
        assert_eq!(message, errors[0]);

        let (errors, _) = ApiError::RequestTimeout.describe(echo, false);
        assert_eq!(ApiError::RequestTimeout.status_code(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(errors, vec![format!("<{}>", keys::REQUEST_TIMEOUT)]);
    }

    #[test]
    fn test_record_not_updated_becomes_conflict() {
        let err = ApiError::from(DbErr::RecordNotUpdated);
        assert!(matches!(err, ApiError::Conflict { .. }));
    }

    #[test]
    fn test_other_db_errors_become_database() {
        let err = ApiError::from(DbErr::Custom("boom".to_string()));
        assert!(matches!(err, ApiError::Database { .. }));
        assert_eq!(err.message_key(), keys::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_describe_not_found() {
        let (errors, message) = ApiError::not_found("CategoryNotFound").describe(echo, false);
        assert_eq!(errors, vec!["<CategoryNotFound>"]);
        assert_eq!(message, "<CategoryNotFound>");
    }

    #[test]
    fn test_describe_validation_lists_every_field() {
        let err = ApiError::validation_failed(vec!["ProductNameRequired", "PriceRequired"]);
        let (errors, message) = err.describe(echo, false);
        assert_eq!(errors, vec!["<ProductNameRequired>", "<PriceRequired>"]);
        assert_eq!(message, format!("<{}>", keys::VALIDATION_FAILED));
    }

    #[test]
    fn test_describe_empty_validation_still_has_an_error() {
        let (errors, _) = ApiError::validation_failed(Vec::new()).describe(echo, false);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_database_detail_redacted_by_default() {
        let err = ApiError::database(DbErr::Custom("no such table: categories".to_string()));
        let (errors, _) = err.describe(echo, false);
        assert_eq!(errors, vec![format!("<{}>", keys::INTERNAL_SERVER_ERROR)]);
    }

    #[test]
    fn test_database_detail_exposed_when_enabled() {
        let err = ApiError::database(DbErr::Custom("no such table: categories".to_string()));
        let (errors, _) = err.describe(echo, true);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("no such table: categories"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = ApiError::from(io);
        assert!(matches!(err, ApiError::Internal { .. }));
        assert_eq!(err.to_string(), "read-only");
    }
}
