//! Router assembly: resource routes, upload, docs and the middleware stack.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{StatusCode, header::CONTENT_TYPE},
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::entities::{Category, Customer, Order, OrderItem, Product};
use crate::middleware::{
    ResponseHeaders, apply_response_headers, build_cors_layer, envelope_timeouts,
};
use crate::openapi::{DOCS_PATH, build_openapi};
use crate::routes::{method_not_allowed, resource_routes, route_not_found};
use crate::state::AppState;
use crate::upload::{UPLOAD_PATH, upload_image};

/// Builds the complete application.
pub fn build_app(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new();
    router = resource_routes::<Category>(router);
    router = resource_routes::<Customer>(router);
    router = resource_routes::<Product>(router);
    router = resource_routes::<Order>(router);
    router = resource_routes::<OrderItem>(router);
    router = router.route(
        UPLOAD_PATH,
        post(upload_image).layer(DefaultBodyLimit::max(config.upload.max_bytes)),
    );

    if config.docs.enabled {
        match build_openapi().to_pretty_json() {
            Ok(document) => {
                router = router.route(
                    DOCS_PATH,
                    get(move || async move { ([(CONTENT_TYPE, "application/json")], document) }),
                );
            }
            Err(err) => tracing::warn!(error = %err, "OpenAPI document could not be rendered"),
        }
    }

    with_layers(router, state, config)
}

/// Adds the routing fallbacks and the middleware stack, then binds the
/// state. Routes must all be registered before this is called.
pub fn with_layers(router: Router<AppState>, state: AppState, config: &AppConfig) -> Router {
    let extra_headers = Arc::new(ResponseHeaders::from_config(&config.headers));
    router
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.server.request_timeout_seconds),
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            envelope_timeouts,
        ))
        .layer(build_cors_layer(&config.cors))
        .layer(middleware::from_fn_with_state(
            extra_headers,
            apply_response_headers,
        ))
        .with_state(state)
}
