use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::get;
use axum::Router;

use super::domain::{RecentQuery, RecruiterApplicationQuery};
use super::service::{DashboardError, DashboardService};
use crate::workflows::accounts::Actor;
use crate::workflows::applications::ApplicationRepository;
use crate::workflows::envelope::{respond, ApiFailure};
use crate::workflows::extract::ApiQuery;
use crate::workflows::interviews::InterviewRepository;
use crate::workflows::jobs::JobRepository;

type Service<J, A, I> = State<Arc<DashboardService<J, A, I>>>;

/// Router builder for the recruiter and developer dashboard reads.
pub fn dashboard_router<J, A, I>(service: Arc<DashboardService<J, A, I>>) -> Router
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    I: InterviewRepository + 'static,
{
    Router::new()
        .route(
            "/api/recruiter/dashboard/stats",
            get(recruiter_stats_handler::<J, A, I>),
        )
        .route(
            "/api/recruiter/applications",
            get(recruiter_applications_handler::<J, A, I>),
        )
        .route(
            "/api/recruiter/applications/recent",
            get(recruiter_recent_handler::<J, A, I>),
        )
        .route(
            "/api/developer/dashboard/stats",
            get(developer_stats_handler::<J, A, I>),
        )
        .route(
            "/api/developer/applications/recent",
            get(developer_recent_handler::<J, A, I>),
        )
        .with_state(service)
}

impl From<DashboardError> for ApiFailure {
    fn from(error: DashboardError) -> Self {
        ApiFailure::new(error.status_code(), error.to_string())
    }
}

async fn recruiter_stats_handler<J, A, I>(
    State(service): Service<J, A, I>,
    actor: Actor,
) -> Result<Response, ApiFailure>
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    I: InterviewRepository + 'static,
{
    Ok(respond(StatusCode::OK, service.recruiter_stats(&actor)?))
}

async fn recruiter_applications_handler<J, A, I>(
    State(service): Service<J, A, I>,
    actor: Actor,
    ApiQuery(query): ApiQuery<RecruiterApplicationQuery>,
) -> Result<Response, ApiFailure>
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    I: InterviewRepository + 'static,
{
    let applications = service.recruiter_applications(&actor, &query)?;
    Ok(respond(StatusCode::OK, applications))
}

async fn recruiter_recent_handler<J, A, I>(
    State(service): Service<J, A, I>,
    actor: Actor,
    ApiQuery(query): ApiQuery<RecentQuery>,
) -> Result<Response, ApiFailure>
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    I: InterviewRepository + 'static,
{
    Ok(respond(StatusCode::OK, service.recruiter_recent(&actor, &query)?))
}

async fn developer_stats_handler<J, A, I>(
    State(service): Service<J, A, I>,
    actor: Actor,
) -> Result<Response, ApiFailure>
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    I: InterviewRepository + 'static,
{
    Ok(respond(StatusCode::OK, service.developer_stats(&actor)?))
}

async fn developer_recent_handler<J, A, I>(
    State(service): Service<J, A, I>,
    actor: Actor,
    ApiQuery(query): ApiQuery<RecentQuery>,
) -> Result<Response, ApiFailure>
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    I: InterviewRepository + 'static,
{
    Ok(respond(StatusCode::OK, service.developer_recent(&actor, &query)?))
}
