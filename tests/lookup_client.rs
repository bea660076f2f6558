mod common;

use axum::{http::StatusCode, routing::get, Json, Router};
use campus_admin::{
    error::LookupError,
    models::parent::RecordStatus,
    services::{
        lookup::{LookupClient, LookupResult},
        submission::SubmissionCoordinator,
        workflow::{RegistrationWorkflow, WorkflowState},
    },
};
use serde_json::json;

use common::{api, dead_url, parent_draft, serve, spawn_api, student_draft};

#[tokio::test]
async fn unknown_cnic_is_not_found() {
    let (url, _registry) = spawn_api().await;
    let client = LookupClient::new(api(&url));

    assert_eq!(client.lookup("00000-0000000-0").await, LookupResult::NotFound);
}

#[tokio::test]
async fn registered_parent_is_found_with_children() {
    let (url, registry) = spawn_api().await;

    let mut wf = RegistrationWorkflow::new();
    wf.edit_parent(|p| *p = parent_draft("12345-6789012-3")).unwrap();
    wf.edit_student(|s| *s = student_draft("zara", "Zara Khan")).unwrap();
    let state = wf
        .submit(&SubmissionCoordinator::new(api(&url)))
        .await
        .unwrap();
    assert_eq!(state, WorkflowState::Submitted);

    let client = LookupClient::new(api(&url));
    match client.lookup("12345-6789012-3").await {
        LookupResult::Found(parent) => {
            assert_eq!(parent.full_name, "Ali Khan");
            assert_eq!(parent.status, RecordStatus::Active);
            assert_eq!(parent.child_ids.len(), 1);
            let stored = registry.find_parent("12345-6789012-3").await.unwrap();
            assert_eq!(parent, stored);
        }
        other => panic!("expected Found, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_service_is_an_error_not_an_absence() {
    let client = LookupClient::new(api(&dead_url().await));

    let result = client.lookup("12345-6789012-3").await;
    assert!(matches!(result, LookupResult::Error(LookupError::Transport(_))));
}

#[tokio::test]
async fn server_failure_is_an_error_not_an_absence() {
    let app = Router::new().route(
        "/api/parents/{cnic}",
        get(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "boom" })),
            )
        }),
    );
    let client = LookupClient::new(api(&serve(app).await));

    let result = client.lookup("12345-6789012-3").await;
    assert!(matches!(result, LookupResult::Error(LookupError::Transport(_))));
}

#[tokio::test]
async fn malformed_record_is_rejected_at_the_boundary() {
    let app = Router::new().route(
        "/api/parents/{cnic}",
        get(|| async { Json(json!({ "fullName": 5, "childIds": "s1" })) }),
    );
    let client = LookupClient::new(api(&serve(app).await));

    let result = client.lookup("12345-6789012-3").await;
    assert!(matches!(result, LookupResult::Error(LookupError::Malformed(_))));
}

#[tokio::test]
async fn empty_success_body_means_not_found() {
    let app = Router::new().route("/api/parents/{cnic}", get(|| async { Json(json!(null)) }));
    let client = LookupClient::new(api(&serve(app).await));

    assert_eq!(client.lookup("12345-6789012-3").await, LookupResult::NotFound);
}

#[tokio::test]
async fn over_long_cnic_never_reaches_the_network() {
    let client = LookupClient::new(api(&dead_url().await));

    let result = client.lookup("12345-6789012-3456").await;
    assert_eq!(
        result,
        LookupResult::Error(LookupError::InvalidIdentifier { max: 15 })
    );
    let result = client.lookup("").await;
    assert!(matches!(
        result,
        LookupResult::Error(LookupError::InvalidIdentifier { .. })
    ));
}
