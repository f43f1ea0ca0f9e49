use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::{Answer, AssessmentId, QuestionnaireKind};
use super::questionnaire::Questionnaire;
use super::repository::AssessmentRepository;
use super::service::{AssessmentService, AssessmentServiceError};
use crate::workflows::records::domain::SubjectId;
use crate::workflows::records::repository::{RecordStore, RepositoryError};

/// Router builder exposing the wizard endpoints.
pub fn assessment_router<R, S>(service: Arc<AssessmentService<R, S>>) -> Router
where
    R: AssessmentRepository + 'static,
    S: RecordStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/compliance/assessments",
            post(begin_handler::<R, S>),
        )
        .route(
            "/api/v1/compliance/assessments/:assessment_id",
            get(status_handler::<R, S>),
        )
        .route(
            "/api/v1/compliance/assessments/:assessment_id/answers",
            post(answer_handler::<R, S>),
        )
        .route(
            "/api/v1/compliance/assessments/:assessment_id/complete",
            post(complete_handler::<R, S>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct BeginAssessmentRequest {
    pub(crate) subject_id: String,
    pub(crate) questionnaire: QuestionnaireKind,
    #[serde(default)]
    pub(crate) started_on: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CompleteAssessmentRequest {
    #[serde(default)]
    pub(crate) completed_on: Option<NaiveDate>,
}

fn service_error_response(error: AssessmentServiceError) -> Response {
    let status = match &error {
        AssessmentServiceError::NotFound => StatusCode::NOT_FOUND,
        AssessmentServiceError::AlreadyComplete => StatusCode::CONFLICT,
        AssessmentServiceError::UnknownQuestion(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AssessmentServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        AssessmentServiceError::Repository(RepositoryError::Record(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        AssessmentServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn begin_handler<R, S>(
    State(service): State<Arc<AssessmentService<R, S>>>,
    axum::Json(request): axum::Json<BeginAssessmentRequest>,
) -> Response
where
    R: AssessmentRepository + 'static,
    S: RecordStore + 'static,
{
    let started_on = request
        .started_on
        .unwrap_or_else(|| Local::now().date_naive());

    match service.begin(
        SubjectId(request.subject_id),
        request.questionnaire,
        started_on,
    ) {
        Ok(assessment) => {
            let questionnaire = Questionnaire::for_kind(assessment.questionnaire);
            let view = assessment.status_view(&questionnaire);
            (StatusCode::ACCEPTED, axum::Json(view)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn status_handler<R, S>(
    State(service): State<Arc<AssessmentService<R, S>>>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    S: RecordStore + 'static,
{
    let id = AssessmentId(assessment_id);
    match service.get(&id) {
        Ok(assessment) => {
            let questionnaire = Questionnaire::for_kind(assessment.questionnaire);
            let view = assessment.status_view(&questionnaire);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn answer_handler<R, S>(
    State(service): State<Arc<AssessmentService<R, S>>>,
    Path(assessment_id): Path<String>,
    axum::Json(answer): axum::Json<Answer>,
) -> Response
where
    R: AssessmentRepository + 'static,
    S: RecordStore + 'static,
{
    let id = AssessmentId(assessment_id);
    match service.record_answer(&id, answer) {
        Ok(assessment) => {
            let questionnaire = Questionnaire::for_kind(assessment.questionnaire);
            let view = assessment.status_view(&questionnaire);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn complete_handler<R, S>(
    State(service): State<Arc<AssessmentService<R, S>>>,
    Path(assessment_id): Path<String>,
    axum::Json(request): axum::Json<CompleteAssessmentRequest>,
) -> Response
where
    R: AssessmentRepository + 'static,
    S: RecordStore + 'static,
{
    let id = AssessmentId(assessment_id);
    let completed_on = request
        .completed_on
        .unwrap_or_else(|| Local::now().date_naive());

    match service.complete(&id, completed_on, Utc::now()) {
        Ok(evaluation) => (StatusCode::OK, axum::Json(evaluation)).into_response(),
        Err(error) => service_error_response(error),
    }
}
