use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::get;
use axum::Router;

use super::domain::{JobDraft, JobId};
use super::repository::JobRepository;
use super::service::{JobBoardService, JobServiceError};
use crate::workflows::accounts::Actor;
use crate::workflows::envelope::{respond, ApiFailure};
use crate::workflows::extract::{ApiJson, ApiPath};

/// Router builder exposing the posting catalogue.
pub fn job_router<J>(service: Arc<JobBoardService<J>>) -> Router
where
    J: JobRepository + 'static,
{
    Router::new()
        .route("/api/jobs", get(list_handler::<J>).post(create_handler::<J>))
        .route("/api/jobs/my/jobs", get(mine_handler::<J>))
        .route(
            "/api/jobs/:job_id",
            get(detail_handler::<J>)
                .put(update_handler::<J>)
                .delete(delete_handler::<J>),
        )
        .with_state(service)
}

impl From<JobServiceError> for ApiFailure {
    fn from(error: JobServiceError) -> Self {
        ApiFailure::new(error.status_code(), error.to_string())
    }
}

pub(crate) async fn list_handler<J>(
    State(service): State<Arc<JobBoardService<J>>>,
) -> Result<Response, ApiFailure>
where
    J: JobRepository + 'static,
{
    Ok(respond(StatusCode::OK, service.list()?))
}

pub(crate) async fn mine_handler<J>(
    State(service): State<Arc<JobBoardService<J>>>,
    actor: Actor,
) -> Result<Response, ApiFailure>
where
    J: JobRepository + 'static,
{
    Ok(respond(StatusCode::OK, service.list_for_recruiter(&actor)?))
}

pub(crate) async fn detail_handler<J>(
    State(service): State<Arc<JobBoardService<J>>>,
    ApiPath(job_id): ApiPath<u64>,
) -> Result<Response, ApiFailure>
where
    J: JobRepository + 'static,
{
    Ok(respond(StatusCode::OK, service.get(JobId(job_id))?))
}

pub(crate) async fn create_handler<J>(
    State(service): State<Arc<JobBoardService<J>>>,
    actor: Actor,
    ApiJson(draft): ApiJson<JobDraft>,
) -> Result<Response, ApiFailure>
where
    J: JobRepository + 'static,
{
    Ok(respond(StatusCode::CREATED, service.post(&actor, draft)?))
}

pub(crate) async fn update_handler<J>(
    State(service): State<Arc<JobBoardService<J>>>,
    actor: Actor,
    ApiPath(job_id): ApiPath<u64>,
    ApiJson(draft): ApiJson<JobDraft>,
) -> Result<Response, ApiFailure>
where
    J: JobRepository + 'static,
{
    Ok(respond(
        StatusCode::OK,
        service.update(&actor, JobId(job_id), draft)?,
    ))
}

pub(crate) async fn delete_handler<J>(
    State(service): State<Arc<JobBoardService<J>>>,
    actor: Actor,
    ApiPath(job_id): ApiPath<u64>,
) -> Result<Response, ApiFailure>
where
    J: JobRepository + 'static,
{
    Ok(respond(StatusCode::OK, service.remove(&actor, JobId(job_id))?))
}
