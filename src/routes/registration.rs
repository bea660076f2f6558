use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    models::registration::{
        RegisterRequest, RegisterResponse, UpdateStudentQuery, UpdateStudentRequest,
    },
    routes::{reject, ApiError},
    AppState,
};

/// Creates the student and its parent in one step.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let registered = state.registry.register(body).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Student registered".into(),
            student_id: registered.student_id,
            child_ids: registered.child_ids,
        }),
    ))
}

pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<UpdateStudentQuery>,
    Json(body): Json<UpdateStudentRequest>,
) -> Result<Json<Value>, ApiError> {
    let parent_cnic = query
        .parent
        .filter(|c| !c.is_empty())
        .ok_or_else(|| reject(StatusCode::BAD_REQUEST, "Parent CNIC is required"))?;

    let student = state
        .registry
        .update_student(&id, &parent_cnic, body)
        .await?;
    Ok(Json(json!({ "message": "Student updated", "student": student })))
}
