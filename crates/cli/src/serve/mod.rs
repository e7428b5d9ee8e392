//! `gantry serve` -- HTTP JSON API for hook invocation.
//!
//! Exposes the hook registry as an async HTTP service using `axum` +
//! `tokio`. The codec and adapter own payload semantics; this layer
//! only routes, maps fault categories to status codes, and logs.
//!
//! Endpoints:
//! - GET  /              - Host status and component versions
//! - POST /invoke/{app}  - Invoke a hook from a JSON event body
//!
//! All responses use Content-Type: application/json.

mod handlers;
mod state;

use std::sync::Arc;

use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use gantry_hooks::HookRegistry;

use self::handlers::{handle_index, handle_invoke, handle_not_found};
use self::state::AppState;

fn router(registry: HookRegistry) -> Router {
    let state = Arc::new(AppState { registry });
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);
    Router::new()
        .route("/", get(handle_index))
        .route("/invoke/{app}", post(handle_invoke))
        .fallback(handle_not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is terminated.
pub async fn start_server(
    bind: &str,
    port: u16,
    registry: HookRegistry,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener = tokio::net::TcpListener::bind((bind, port)).await?;
    tracing::info!("gantry host listening on http://{}:{}", bind, port);
    axum::serve(listener, router(registry)).await?;
    Ok(())
}
