use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::{get, patch, post};
use axum::Router;

use super::domain::{ApplicationId, ApplicationQuery, ApplyRequest, StatusUpdate};
use super::repository::ApplicationRepository;
use super::service::{ApplicationService, ApplicationServiceError};
use crate::workflows::accounts::Actor;
use crate::workflows::envelope::{respond, ApiFailure};
use crate::workflows::extract::{ApiJson, ApiPath, ApiQuery};
use crate::workflows::jobs::{JobId, JobRepository};

/// Router builder exposing apply, review, and withdraw endpoints.
pub fn application_router<J, R>(service: Arc<ApplicationService<J, R>>) -> Router
where
    J: JobRepository + 'static,
    R: ApplicationRepository + 'static,
{
    Router::new()
        .route("/api/jobs/:job_id/apply", post(apply_handler::<J, R>))
        .route(
            "/api/jobs/:job_id/applications",
            get(job_applications_handler::<J, R>),
        )
        .route(
            "/api/jobs/:job_id/application-status",
            get(application_status_handler::<J, R>),
        )
        .route(
            "/api/developer/applications",
            get(developer_applications_handler::<J, R>),
        )
        .route(
            "/api/applications/:application_id",
            get(detail_handler::<J, R>).delete(withdraw_handler::<J, R>),
        )
        .route(
            "/api/applications/:application_id/status",
            patch(status_handler::<J, R>),
        )
        .with_state(service)
}

impl From<ApplicationServiceError> for ApiFailure {
    fn from(error: ApplicationServiceError) -> Self {
        ApiFailure::new(error.status_code(), error.to_string())
    }
}

pub(crate) async fn apply_handler<J, R>(
    State(service): State<Arc<ApplicationService<J, R>>>,
    actor: Actor,
    ApiPath(job_id): ApiPath<u64>,
    ApiJson(request): ApiJson<ApplyRequest>,
) -> Result<Response, ApiFailure>
where
    J: JobRepository + 'static,
    R: ApplicationRepository + 'static,
{
    let application = service.submit(&actor, JobId(job_id), request.cover_letter)?;
    Ok(respond(StatusCode::CREATED, application))
}

pub(crate) async fn job_applications_handler<J, R>(
    State(service): State<Arc<ApplicationService<J, R>>>,
    actor: Actor,
    ApiPath(job_id): ApiPath<u64>,
    ApiQuery(query): ApiQuery<ApplicationQuery>,
) -> Result<Response, ApiFailure>
where
    J: JobRepository + 'static,
    R: ApplicationRepository + 'static,
{
    let applications = service.list_for_job(&actor, JobId(job_id), &query)?;
    Ok(respond(StatusCode::OK, applications))
}

pub(crate) async fn application_status_handler<J, R>(
    State(service): State<Arc<ApplicationService<J, R>>>,
    actor: Actor,
    ApiPath(job_id): ApiPath<u64>,
) -> Result<Response, ApiFailure>
where
    J: JobRepository + 'static,
    R: ApplicationRepository + 'static,
{
    let view = service.status_for_job(&actor, JobId(job_id))?;
    Ok(respond(StatusCode::OK, view))
}

pub(crate) async fn developer_applications_handler<J, R>(
    State(service): State<Arc<ApplicationService<J, R>>>,
    actor: Actor,
    ApiQuery(query): ApiQuery<ApplicationQuery>,
) -> Result<Response, ApiFailure>
where
    J: JobRepository + 'static,
    R: ApplicationRepository + 'static,
{
    let applications = service.list_for_applicant(&actor, &query)?;
    Ok(respond(StatusCode::OK, applications))
}

pub(crate) async fn detail_handler<J, R>(
    State(service): State<Arc<ApplicationService<J, R>>>,
    actor: Actor,
    ApiPath(application_id): ApiPath<u64>,
) -> Result<Response, ApiFailure>
where
    J: JobRepository + 'static,
    R: ApplicationRepository + 'static,
{
    let application = service.get(&actor, ApplicationId(application_id))?;
    Ok(respond(StatusCode::OK, application))
}

pub(crate) async fn status_handler<J, R>(
    State(service): State<Arc<ApplicationService<J, R>>>,
    actor: Actor,
    ApiPath(application_id): ApiPath<u64>,
    ApiJson(update): ApiJson<StatusUpdate>,
) -> Result<Response, ApiFailure>
where
    J: JobRepository + 'static,
    R: ApplicationRepository + 'static,
{
    let application = service.transition_status(
        &actor,
        ApplicationId(application_id),
        update.status,
        &update.note,
    )?;
    Ok(respond(StatusCode::OK, application))
}

pub(crate) async fn withdraw_handler<J, R>(
    State(service): State<Arc<ApplicationService<J, R>>>,
    actor: Actor,
    ApiPath(application_id): ApiPath<u64>,
) -> Result<Response, ApiFailure>
where
    J: JobRepository + 'static,
    R: ApplicationRepository + 'static,
{
    let application = service.withdraw(&actor, ApplicationId(application_id))?;
    Ok(respond(StatusCode::OK, application))
}
