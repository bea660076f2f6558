pub mod classes;
pub mod health;
pub mod parents;
pub mod registration;
pub mod students;

use axum::{
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::{services::registry::RegistryError, AppState};

pub type ApiError = (StatusCode, Json<Value>);

pub fn reject(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "message": message.into() })))
}

impl From<RegistryError> for ApiError {
    fn from(e: RegistryError) -> Self {
        let status = match e {
            RegistryError::Invalid(_) => StatusCode::BAD_REQUEST,
            RegistryError::Conflict(_) => StatusCode::CONFLICT,
            RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
        };
        reject(status, e.to_string())
    }
}

/// The reference registration API.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/classes", get(classes::list_classes))
        .route("/api/parents/{cnic}", get(parents::get_parent))
        .route("/api/register", post(registration::register))
        .route("/api/students", get(students::list_students))
        .route("/api/students/{id}", put(registration::update_student))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
