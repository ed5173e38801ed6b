use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::{CompanyId, DocumentInstance, Subject, SubjectId};
use super::repository::{DocumentRepository, RepositoryError};
use super::rules::DocumentTypeRecord;
use super::service::{DocumentStatusService, StatusServiceError};

/// Router builder exposing document status and report endpoints.
pub fn document_router<R>(service: Arc<DocumentStatusService<R>>) -> Router
where
    R: DocumentRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/companies/:company_id/subjects/:subject_id/document-status",
            get(subject_status_handler::<R>),
        )
        .route(
            "/api/v1/companies/:company_id/document-report",
            get(company_report_handler::<R>),
        )
        .route(
            "/api/v1/companies/:company_id/document-report.csv",
            get(company_report_csv_handler::<R>),
        )
        .route(
            "/api/v1/document-status/evaluate",
            post(evaluate_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub struct AsOfQuery {
    #[serde(default)]
    pub as_of: Option<String>,
}

/// Stateless evaluation request carrying every input the engine needs.
#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub subject: Subject,
    #[serde(default)]
    pub document_types: Vec<DocumentTypeRecord>,
    #[serde(default)]
    pub documents: Vec<DocumentInstance>,
    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,
}

pub(crate) async fn subject_status_handler<R>(
    State(service): State<Arc<DocumentStatusService<R>>>,
    Path((company_id, subject_id)): Path<(String, String)>,
    Query(query): Query<AsOfQuery>,
) -> Response
where
    R: DocumentRepository + 'static,
{
    let as_of = match resolve_as_of(query.as_of.as_deref()) {
        Ok(as_of) => as_of,
        Err(response) => return response,
    };

    match service.status_for(&CompanyId(company_id), &SubjectId(subject_id), as_of) {
        Ok(info) => (StatusCode::OK, axum::Json(info)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn company_report_handler<R>(
    State(service): State<Arc<DocumentStatusService<R>>>,
    Path(company_id): Path<String>,
    Query(query): Query<AsOfQuery>,
) -> Response
where
    R: DocumentRepository + 'static,
{
    let as_of = match resolve_as_of(query.as_of.as_deref()) {
        Ok(as_of) => as_of,
        Err(response) => return response,
    };

    match service.company_report(&CompanyId(company_id), as_of) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn company_report_csv_handler<R>(
    State(service): State<Arc<DocumentStatusService<R>>>,
    Path(company_id): Path<String>,
    Query(query): Query<AsOfQuery>,
) -> Response
where
    R: DocumentRepository + 'static,
{
    let as_of = match resolve_as_of(query.as_of.as_deref()) {
        Ok(as_of) => as_of,
        Err(response) => return response,
    };

    let report = match service.company_report(&CompanyId(company_id), as_of) {
        Ok(report) => report,
        Err(error) => return error_response(error),
    };

    match report.to_csv() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn evaluate_handler<R>(
    State(service): State<Arc<DocumentStatusService<R>>>,
    axum::Json(request): axum::Json<EvaluateRequest>,
) -> Response
where
    R: DocumentRepository + 'static,
{
    let as_of = request.as_of.unwrap_or_else(Utc::now);
    match service.engine().evaluate_records(
        &request.subject,
        &request.document_types,
        &request.documents,
        as_of,
    ) {
        Ok(info) => (StatusCode::OK, axum::Json(info)).into_response(),
        Err(error) => error_response(StatusServiceError::Configuration(error)),
    }
}

fn resolve_as_of(raw: Option<&str>) -> Result<DateTime<Utc>, Response> {
    match raw {
        None => Ok(Utc::now()),
        Some(value) => DateTime::parse_from_rfc3339(value.trim())
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(|error| {
                let payload = json!({
                    "error": format!("as_of must be an RFC 3339 timestamp ({error})"),
                });
                (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
            }),
    }
}

fn error_response(error: StatusServiceError) -> Response {
    let (status, kind) = match &error {
        StatusServiceError::SubjectNotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        StatusServiceError::Configuration(_) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "rule_configuration")
        }
        StatusServiceError::Repository(RepositoryError::NotFound) => {
            (StatusCode::NOT_FOUND, "not_found")
        }
        StatusServiceError::Repository(RepositoryError::Unavailable(_)) => {
            (StatusCode::SERVICE_UNAVAILABLE, "repository_unavailable")
        }
    };

    let payload = json!({
        "error": error.to_string(),
        "kind": kind,
    });
    (status, axum::Json(payload)).into_response()
}
