use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::AppState;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "moodrisk-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let data_dir_ok = tokio::fs::create_dir_all(&state.config.data_dir).await.is_ok();
    let model_ok = !state.artifacts.schema.is_empty();

    let check = |ok: bool| if ok { "ok" } else { "failed" };
    let checks = json!({
        "data_dir": check(data_dir_ok),
        "model": check(model_ok),
    });

    if data_dir_ok && model_ok {
        (
            StatusCode::OK,
            Json(json!({ "status": "ready", "checks": checks })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "not_ready", "checks": checks })),
        )
    }
}
