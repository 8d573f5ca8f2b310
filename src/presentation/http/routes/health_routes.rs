use axum::{Json, Router, routing::get};
use serde_json::json;

pub fn health_routes() -> Router {
    Router::new().route(
        "/health",
        get(|| async { Json(json!({ "status": "ok", "service": "clauselens" })) }),
    )
}
