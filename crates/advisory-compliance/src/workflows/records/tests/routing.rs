use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::workflows::assessment::schedule::ReviewSchedule;
use crate::workflows::records::materializer::RecordMaterializer;
use crate::workflows::records::router::{record_router, DashboardState};

fn build_router() -> axum::Router {
    let store = Arc::new(MemoryRecordStore::with_subjects(subjects()));
    let state = Arc::new(DashboardState {
        materializer: RecordMaterializer::new(store),
        schedule: ReviewSchedule::default(),
    });
    record_router(state)
}

async fn read_json_body(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[tokio::test]
async fn list_records_returns_one_row_per_subject() {
    let router = build_router();

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/compliance/records/aml")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let rows = payload.as_array().expect("array payload");
    assert_eq!(rows.len(), subjects().len());
    for row in rows {
        assert_eq!(row.get("is_virtual"), Some(&json!(true)));
        assert_eq!(row.get("record_type"), Some(&json!("aml")));
    }
}

#[tokio::test]
async fn unknown_record_type_is_not_found() {
    let router = build_router();

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/compliance/records/suitability")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patching_a_virtual_record_materializes_it() {
    let router = build_router();

    let patch = json!({
        "field": "breach_status",
        "value": "investigating",
    });
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/v1/compliance/records/breach/virtual-CL-1001")
                .header("content-type", "application/json")
                .body(Body::from(patch.to_string()))
                .expect("request"),
        )
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("is_virtual"), Some(&json!(false)));
    assert_eq!(payload.get("subject_id"), Some(&json!("CL-1001")));
    assert_eq!(
        payload.pointer("/detail/status"),
        Some(&json!("investigating"))
    );

    let listing = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/compliance/records/breach")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");
    let rows = read_json_body(listing).await;
    let promoted = rows
        .as_array()
        .expect("array payload")
        .iter()
        .find(|row| row.get("subject_id") == Some(&json!("CL-1001")))
        .expect("subject row present")
        .clone();
    assert_eq!(promoted.get("is_virtual"), Some(&json!(false)));
}

#[tokio::test]
async fn incompatible_patch_is_unprocessable() {
    let router = build_router();

    let patch = json!({
        "field": "identity_check",
        "value": "pending",
    });
    let response = router
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/v1/compliance/records/breach/virtual-CL-1002")
                .header("content-type", "application/json")
                .body(Body::from(patch.to_string()))
                .expect("request"),
        )
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn overview_reports_unassessed_subjects() {
    let router = build_router();

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/compliance/overview?today=2024-06-03")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("today"), Some(&json!("2024-06-03")));
    assert_eq!(payload.pointer("/aml/unassessed"), Some(&json!(3)));
    assert_eq!(payload.pointer("/aml/assessed"), Some(&json!(0)));
    assert_eq!(payload.pointer("/breaches/unresolved"), Some(&json!(0)));
}
