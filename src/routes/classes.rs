use axum::{extract::State, Json};

use crate::{models::class::ClassRef, AppState};

pub async fn list_classes(State(state): State<AppState>) -> Json<Vec<ClassRef>> {
    Json(state.registry.classes().to_vec())
}
