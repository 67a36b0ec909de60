//! Per-request context and extractors that reject in the envelope shape.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::{HeaderMap, StatusCode, header::ACCEPT_LANGUAGE, request::Parts},
};
use serde::de::DeserializeOwned;
use std::convert::Infallible;
use std::sync::Arc;

use crate::envelope::{Envelope, Reply};
use crate::errors::ApiError;
use crate::i18n::{Catalog, Locale, keys};
use crate::state::AppState;

/// The negotiated locale and rendering switches for one request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub locale: Locale,
    catalog: Arc<Catalog>,
    expose_internal_errors: bool,
}

impl RequestContext {
    #[must_use]
    pub fn from_headers(headers: &HeaderMap, state: &AppState) -> Self {
        let accept_language = headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok());
        Self {
            locale: state.catalog.negotiate(accept_language),
            catalog: Arc::clone(&state.catalog),
            expose_internal_errors: state.expose_internal_errors,
        }
    }

    /// Localized text for a message key.
    #[must_use]
    pub fn text(&self, key: &str) -> String {
        self.catalog.text(&self.locale, key)
    }

    pub fn success<T>(&self, status: StatusCode, key: &str, data: T, total_data: u64) -> Reply<T> {
        Reply::new(Envelope::success(status, self.text(key), data, total_data))
    }

    /// Renders an error into a failed envelope, logging it first.
    pub fn reject<T>(&self, err: &ApiError) -> Reply<T> {
        err.log();
        let (errors, message) = err.describe(|key| self.text(key), self.expose_internal_errors);
        Reply::new(Envelope::failure(err.status_code(), errors, message))
    }
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers, state))
    }
}

/// JSON body; a missing or malformed body becomes a 400 envelope.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T> FromRequest<AppState> for JsonBody<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = Reply<()>;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let ctx = RequestContext::from_headers(req.headers(), state);
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(reason = %rejection.body_text(), "Rejected request body");
                Err(ctx.reject(&ApiError::bad_request(keys::INVALID_REQUEST_BODY)))
            }
        }
    }
}

/// Query string; an unparsable value becomes a 400 envelope.
#[derive(Debug)]
pub struct QueryParams<T>(pub T);

impl<T> FromRequestParts<AppState> for QueryParams<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = Reply<()>;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(reason = %rejection.body_text(), "Rejected query string");
                let ctx = RequestContext::from_headers(&parts.headers, state);
                Err(ctx.reject(&ApiError::bad_request(keys::INVALID_QUERY_PARAMETERS)))
            }
        }
    }
}

/// Integer id captured from the route.
#[derive(Debug, Clone, Copy)]
pub struct PathId(pub i32);

impl FromRequestParts<AppState> for PathId {
    type Rejection = Reply<()>;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match Path::<i32>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(Self(id)),
            Err(rejection) => {
                tracing::debug!(reason = %rejection.body_text(), "Rejected route parameter");
                let ctx = RequestContext::from_headers(&parts.headers, state);
                Err(ctx.reject(&ApiError::bad_request(keys::INVALID_ROUTE_PARAMETER)))
            }
        }
    }
}
