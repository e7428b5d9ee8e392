//! HTTP route handlers: index, invoke, fallback.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use gantry_hooks::FaultCategory;

use super::state::AppState;

/// An invocation event: the hook name plus one opaque payload string
/// per parameter, at the top level of the object.
#[derive(Deserialize)]
struct InvokeEvent {
    hook: String,
    #[serde(flatten)]
    payloads: BTreeMap<String, serde_json::Value>,
}

/// GET /
pub(crate) async fn handle_index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let apps: Vec<&str> = state.registry.apps().collect();
    Json(serde_json::json!({
        "app": "gantry host",
        "apps": apps,
        "versions": {
            "gantry-cli": env!("CARGO_PKG_VERSION"),
            "gantry-codec": gantry_codec::VERSION,
            "gantry-hooks": gantry_hooks::VERSION,
        },
    }))
}

/// POST /invoke/{app}
pub(crate) async fn handle_invoke(
    State(state): State<Arc<AppState>>,
    Path(app): Path<String>,
    body: String,
) -> Response {
    let event: InvokeEvent = match serde_json::from_str(&body) {
        Ok(event) => event,
        Err(e) => {
            return payload_error(format!("malformed invoke event: {}", e));
        }
    };

    let mut payloads = BTreeMap::new();
    for (name, value) in event.payloads {
        match value {
            serde_json::Value::String(payload) => {
                payloads.insert(name, payload);
            }
            other => {
                return payload_error(format!(
                    "payload for parameter '{}' must be a string, got {}",
                    name, other
                ));
            }
        }
    }

    tracing::info!(app = %app, hook = %event.hook, "invoking hook");
    match gantry_hooks::invoke(&state.registry, &app, &event.hook, &payloads).await {
        Ok(document) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            document,
        )
            .into_response(),
        Err(e) => {
            let category = e.category();
            tracing::warn!(app = %app, hook = %event.hook, category = category.as_str(), error = %e, "invocation failed");
            let status = match category {
                FaultCategory::Routing => StatusCode::NOT_FOUND,
                FaultCategory::Payload => StatusCode::BAD_REQUEST,
                FaultCategory::Codec | FaultCategory::Hook => StatusCode::INTERNAL_SERVER_ERROR,
            };
            error_response(status, category.as_str(), &e.to_string())
        }
    }
}

/// Fallback for unmatched routes.
pub(crate) async fn handle_not_found() -> impl IntoResponse {
    error_response(StatusCode::NOT_FOUND, "routing", "not found")
}

fn payload_error(message: String) -> Response {
    error_response(StatusCode::BAD_REQUEST, "payload", &message)
}

fn error_response(status: StatusCode, category: &str, message: &str) -> Response {
    (
        status,
        Json(serde_json::json!({ "error": message, "category": category })),
    )
        .into_response()
}
