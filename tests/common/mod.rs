#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use campus_admin::{
    config::Config,
    models::{class::fallback_classes, parent::ParentDraft, student::StudentDraft},
    routes,
    services::{api::ApiClient, registry::Registry},
    AppState,
};

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Starts the reference API with an empty registry.
pub async fn spawn_api() -> (String, Arc<Registry>) {
    let registry = Arc::new(Registry::new(fallback_classes()));
    let state = AppState {
        registry: registry.clone(),
        config: Arc::new(Config::for_base_url("http://127.0.0.1")),
    };
    let url = serve(routes::router(state)).await;
    (url, registry)
}

/// A base URL nothing is listening on.
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn api(base_url: &str) -> ApiClient {
    ApiClient::new(&Config::for_base_url(base_url)).unwrap()
}

pub fn parent_draft(cnic: &str) -> ParentDraft {
    ParentDraft {
        cnic: cnic.into(),
        full_name: "Ali Khan".into(),
        username: format!("parent-{cnic}"),
        password: "pw-parent".into(),
        phone_number: "0300-1234567".into(),
        address: "Street 9, Lahore".into(),
        relation: "Father".into(),
        ..ParentDraft::default()
    }
}

pub fn student_draft(username: &str, full_name: &str) -> StudentDraft {
    let mut student = StudentDraft::new(full_name, username, "pw-student");
    student.class_id = "1".into();
    student.roll_number = "1".into();
    student
}
