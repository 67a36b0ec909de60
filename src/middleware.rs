//! Response header and CORS layers.

use axum::{
    extract::{Request, State},
    http::{
        HeaderName, HeaderValue, StatusCode,
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE,
        },
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};

use crate::config::{CorsConfig, HeadersConfig};
use crate::context::RequestContext;
use crate::errors::ApiError;
use crate::state::AppState;

/// Static headers added to every response that does not already carry them.
#[derive(Debug, Clone, Default)]
pub struct ResponseHeaders {
    headers: Vec<(HeaderName, HeaderValue)>,
}

impl ResponseHeaders {
    /// Values that are not valid header text are skipped with a warning.
    #[must_use]
    pub fn from_config(config: &HeadersConfig) -> Self {
        let headers = [
            (ACCESS_CONTROL_ALLOW_ORIGIN, &config.allow_origin),
            (ACCESS_CONTROL_ALLOW_HEADERS, &config.allow_headers),
            (ACCESS_CONTROL_ALLOW_METHODS, &config.allow_methods),
        ]
        .into_iter()
        .filter_map(|(name, value)| match HeaderValue::from_str(value) {
            Ok(value) => Some((name, value)),
            Err(_) => {
                tracing::warn!(header = %name, value = %value, "Ignoring invalid response header value");
                None
            }
        })
        .collect();
        Self { headers }
    }
}

/// Debug-logs the request headers and stamps the configured headers on the
/// response. Headers already set, e.g. by the CORS layer, are left alone.
pub async fn apply_response_headers(
    State(extra): State<Arc<ResponseHeaders>>,
    request: Request,
    next: Next,
) -> Response {
    tracing::debug!(
        method = %request.method(),
        path = %request.uri().path(),
        headers = ?request.headers(),
        "Incoming request"
    );

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    for (name, value) in &extra.headers {
        headers.entry(name).or_insert_with(|| value.clone());
    }
    response
}

/// Replaces the bodiless 408 of the timeout layer with a failed envelope
/// in the request's locale.
pub async fn envelope_timeouts(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let ctx = RequestContext::from_headers(request.headers(), &state);
    let response = next.run(request).await;
    if response.status() == StatusCode::REQUEST_TIMEOUT
        && !response.headers().contains_key(CONTENT_TYPE)
    {
        return ctx.reject::<()>(&ApiError::RequestTimeout).into_response();
    }
    response
}

/// Builds the CORS layer. `*` in `allowed_origins` allows any origin.
/// Methods and request headers are unrestricted; with credentials they are
/// mirrored from the preflight, since wildcards are not allowed there.
#[must_use]
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().max_age(Duration::from_secs(config.max_age_seconds));

    if config.allowed_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any).allow_methods(Any).allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let layer = layer.allow_origin(AllowOrigin::list(origins));
    if config.allow_credentials {
        layer
            .allow_credentials(true)
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request())
    } else {
        layer.allow_methods(Any).allow_headers(Any)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_headers_skip_invalid_values() {
        let config = HeadersConfig {
            allow_origin: "*".to_string(),
            allow_headers: "bad\nvalue".to_string(),
            allow_methods: "GET, POST".to_string(),
        };
        let extra = ResponseHeaders::from_config(&config);
        let names: Vec<_> = extra.headers.iter().map(|(name, _)| name.clone()).collect();
        assert_eq!(
            names,
            vec![ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_ALLOW_METHODS]
        );
    }
}
