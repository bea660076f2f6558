use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    models::parent::ParentRecord,
    routes::{reject, ApiError},
    AppState,
};

pub async fn get_parent(
    State(state): State<AppState>,
    Path(cnic): Path<String>,
) -> Result<Json<ParentRecord>, ApiError> {
    state
        .registry
        .find_parent(&cnic)
        .await
        .map(Json)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "Parent not found"))
}
