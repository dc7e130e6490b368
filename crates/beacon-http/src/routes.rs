//! API route configuration.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, header},
    routing::{MethodRouter, get, post},
};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::handlers;
use crate::state::AppState;

const NO_STORE: &str = "no-store, no-cache, must-revalidate, proxy-revalidate";

/// Creates the API router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", uncached(get(handlers::current_ip)))
        .route("/status", uncached(get(handlers::status)))
        .route("/update", post(handlers::update))
        .route("/health", get(handlers::health_check))
        .fallback(handlers::not_found)
        .with_state(state)
}

/// Reads must never be served stale by an intermediary, HTTP/1.0 caches included
fn uncached(route: MethodRouter<Arc<AppState>>) -> MethodRouter<Arc<AppState>> {
    route
        .layer::<_, Infallible>(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static(NO_STORE),
        ))
        .layer::<_, Infallible>(SetResponseHeaderLayer::overriding(
            header::PRAGMA,
            HeaderValue::from_static("no-cache"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::EXPIRES,
            HeaderValue::from_static("0"),
        ))
}
