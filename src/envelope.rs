//! The result envelope returned by every endpoint, and [`Reply`], the
//! response type handlers build it into.

use axum::{
    Json,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Uniform response body.
///
/// A failed envelope always has a non-empty `errors` list and no `data`;
/// a successful one always has an empty `errors` list.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub success: bool,
    pub errors: Vec<String>,
    pub message: String,
    /// Mirrors the HTTP status code.
    pub status: u16,
    /// Number of records behind a list response, 0 otherwise.
    pub total_data: u64,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn success(status: StatusCode, message: impl Into<String>, data: T, total_data: u64) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            message: message.into(),
            status: status.as_u16(),
            total_data,
            data: Some(data),
        }
    }

    /// An empty `errors` list is replaced by the message itself.
    pub fn failure(status: StatusCode, errors: Vec<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        let errors = if errors.is_empty() {
            vec![message.clone()]
        } else {
            errors
        };
        Self {
            success: false,
            errors,
            message,
            status: status.as_u16(),
            total_data: 0,
            data: None,
        }
    }
}

/// An HTTP response carrying an [`Envelope`], or no body at all for 204.
#[derive(Debug)]
#[must_use]
pub struct Reply<T> {
    status: StatusCode,
    headers: HeaderMap,
    envelope: Option<Envelope<T>>,
}

impl<T> Reply<T> {
    pub fn new(envelope: Envelope<T>) -> Self {
        let status =
            StatusCode::from_u16(envelope.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self {
            status,
            headers: HeaderMap::new(),
            envelope: Some(envelope),
        }
    }

    pub fn no_content() -> Self {
        Self {
            status: StatusCode::NO_CONTENT,
            headers: HeaderMap::new(),
            envelope: None,
        }
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[must_use]
    pub fn envelope(&self) -> Option<&Envelope<T>> {
        self.envelope.as_ref()
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        match self.envelope {
            Some(envelope) => (self.status, self.headers, Json(envelope)).into_response(),
            None => (self.status, self.headers).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_has_no_errors() {
        let env = Envelope::success(StatusCode::OK, "CategoriesRetrievedSuccessfully", vec![1, 2], 25);
        assert!(env.success);
        assert!(env.errors.is_empty());
        assert_eq!(env.status, 200);
        assert_eq!(env.total_data, 25);
        assert_eq!(env.data, Some(vec![1, 2]));
    }

    #[test]
    fn test_failure_has_errors_and_no_data() {
        let env: Envelope<u8> = Envelope::failure(
            StatusCode::NOT_FOUND,
            vec!["Category not found.".to_string()],
            "Category not found.",
        );
        assert!(!env.success);
        assert_eq!(env.errors.len(), 1);
        assert!(env.data.is_none());
        assert_eq!(env.status, 404);
        assert_eq!(env.total_data, 0);
    }

    #[test]
    fn test_failure_never_has_empty_errors() {
        let env: Envelope<u8> = Envelope::failure(StatusCode::BAD_REQUEST, Vec::new(), "Invalid page number.");
        assert_eq!(env.errors, vec!["Invalid page number."]);
    }

    #[test]
    fn test_serializes_camel_case() {
        let env = Envelope::success(StatusCode::CREATED, "created", "x", 0);
        let value = serde_json::to_value(&env).unwrap();
        for field in ["success", "errors", "message", "status", "totalData", "data"] {
            assert!(value.get(field).is_some(), "missing {field}");
        }
        assert_eq!(value["status"], 201);
    }

    #[test]
    fn test_reply_status_mirrors_envelope() {
        let reply = Reply::new(Envelope::success(StatusCode::CREATED, "created", 7, 0));
        assert_eq!(reply.status(), StatusCode::CREATED);
        assert_eq!(Reply::<()>::no_content().status(), StatusCode::NO_CONTENT);
        assert!(Reply::<()>::no_content().envelope().is_none());
    }

    #[test]
    fn test_no_content_response_has_empty_body() {
        let response = Reply::<()>::no_content().into_response();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(response.headers().get("content-type").is_none());
    }
}
