use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Router,
};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{ComplianceRecord, RecordDetail, RecordId, RecordPatch, RecordType, SubjectId};
use super::materializer::RecordMaterializer;
use super::report::ComplianceOverview;
use super::repository::{RecordStore, RepositoryError};
use crate::workflows::assessment::schedule::ReviewSchedule;

/// Shared state for the dashboard endpoints.
pub struct DashboardState<S> {
    pub materializer: RecordMaterializer<S>,
    pub schedule: ReviewSchedule,
}

/// Router builder exposing the record dashboard and status-edit endpoints.
pub fn record_router<S>(state: Arc<DashboardState<S>>) -> Router
where
    S: RecordStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/compliance/records/:record_type",
            get(list_records_handler::<S>),
        )
        .route(
            "/api/v1/compliance/records/:record_type/:record_id",
            put(patch_record_handler::<S>),
        )
        .route(
            "/api/v1/compliance/overview",
            get(overview_handler::<S>),
        )
        .with_state(state)
}

/// Sanitized representation of one dashboard row.
#[derive(Debug, Clone, Serialize)]
pub struct RecordStatusView {
    pub record_id: RecordId,
    pub subject_id: SubjectId,
    pub record_type: &'static str,
    pub is_virtual: bool,
    pub detail: RecordDetail,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl RecordStatusView {
    pub fn from_record(record: &ComplianceRecord) -> Self {
        Self {
            record_id: record.id.clone(),
            subject_id: record.subject_id.clone(),
            record_type: record.record_type.label(),
            is_virtual: record.is_virtual(),
            detail: record.detail.clone(),
            notes: record.notes.clone(),
            evidence: record.evidence.clone(),
            updated_at: record.updated_at,
        }
    }
}

fn unknown_record_type(raw: &str) -> Response {
    let payload = json!({
        "error": format!("unknown record type '{raw}'"),
    });
    (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
}

fn repository_error_response(error: RepositoryError) -> Response {
    let status = match &error {
        RepositoryError::NotFound => StatusCode::NOT_FOUND,
        RepositoryError::Conflict => StatusCode::CONFLICT,
        RepositoryError::Record(_) => StatusCode::UNPROCESSABLE_ENTITY,
        RepositoryError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn list_records_handler<S>(
    State(state): State<Arc<DashboardState<S>>>,
    Path(record_type): Path<String>,
) -> Response
where
    S: RecordStore + 'static,
{
    let Some(record_type) = RecordType::from_label(&record_type) else {
        return unknown_record_type(&record_type);
    };

    match state.materializer.dashboard(record_type, Utc::now()) {
        Ok(records) => {
            let views: Vec<RecordStatusView> =
                records.iter().map(RecordStatusView::from_record).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => repository_error_response(error),
    }
}

pub(crate) async fn patch_record_handler<S>(
    State(state): State<Arc<DashboardState<S>>>,
    Path((record_type, record_id)): Path<(String, String)>,
    axum::Json(patch): axum::Json<RecordPatch>,
) -> Response
where
    S: RecordStore + 'static,
{
    let Some(record_type) = RecordType::from_label(&record_type) else {
        return unknown_record_type(&record_type);
    };

    let id = RecordId(record_id);
    match state
        .materializer
        .update_field(record_type, &id, patch, Utc::now())
    {
        Ok(record) => {
            let view = RecordStatusView::from_record(&record);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => repository_error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct OverviewQuery {
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) async fn overview_handler<S>(
    State(state): State<Arc<DashboardState<S>>>,
    Query(query): Query<OverviewQuery>,
) -> Response
where
    S: RecordStore + 'static,
{
    let today = query.today.unwrap_or_else(|| Local::now().date_naive());
    let now = Utc::now();

    let aml = state.materializer.dashboard(RecordType::Aml, now);
    let duty = state.materializer.dashboard(RecordType::ConsumerDuty, now);
    let breaches = state.materializer.dashboard(RecordType::Breach, now);

    match (aml, duty, breaches) {
        (Ok(aml), Ok(duty), Ok(breaches)) => {
            let overview =
                ComplianceOverview::build(&aml, &duty, &breaches, &state.schedule, today);
            (StatusCode::OK, axum::Json(overview)).into_response()
        }
        (Err(error), _, _) | (_, Err(error), _) | (_, _, Err(error)) => {
            repository_error_response(error)
        }
    }
}
