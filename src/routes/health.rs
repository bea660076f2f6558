use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::AppState;

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let (students, _) = state.registry.students(0, 0).await;
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "students": students })),
    )
}
