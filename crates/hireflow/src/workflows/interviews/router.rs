use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;

use super::domain::{
    Interview, InterviewId, InterviewPayload, InterviewQuery, RescheduleInterview,
    ScheduleInterview,
};
use super::repository::InterviewRepository;
use super::service::{InterviewService, InterviewServiceError};
use crate::workflows::accounts::Actor;
use crate::workflows::applications::{ApplicationId, ApplicationRepository};
use crate::workflows::envelope::{respond, ApiFailure};
use crate::workflows::extract::{ApiJson, ApiPath, ApiQuery};
use crate::workflows::jobs::JobRepository;

/// Router builder exposing interview scheduling endpoints.
pub fn interview_router<J, A, I>(service: Arc<InterviewService<J, A, I>>) -> Router
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    I: InterviewRepository + 'static,
{
    Router::new()
        .route("/api/interviews/schedule", post(schedule_handler::<J, A, I>))
        .route(
            "/api/interviews/recruiter/all",
            get(recruiter_interviews_handler::<J, A, I>),
        )
        .route(
            "/api/interviews/developer/all",
            get(developer_interviews_handler::<J, A, I>),
        )
        .route(
            "/api/interviews/application/:application_id",
            get(application_interview_handler::<J, A, I>),
        )
        .route(
            "/api/interviews/:interview_id",
            get(detail_handler::<J, A, I>)
                .patch(reschedule_handler::<J, A, I>)
                .delete(cancel_handler::<J, A, I>),
        )
        .route(
            "/api/interviews/:interview_id/complete",
            post(complete_handler::<J, A, I>),
        )
        .with_state(service)
}

impl From<InterviewServiceError> for ApiFailure {
    fn from(error: InterviewServiceError) -> Self {
        ApiFailure::new(error.status_code(), error.to_string())
    }
}

fn payload(status: StatusCode, interview: Interview) -> Response {
    respond(status, InterviewPayload { interview })
}

async fn schedule_handler<J, A, I>(
    State(service): State<Arc<InterviewService<J, A, I>>>,
    actor: Actor,
    ApiJson(request): ApiJson<ScheduleInterview>,
) -> Result<Response, ApiFailure>
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    I: InterviewRepository + 'static,
{
    let interview = service.schedule(&actor, request)?;
    Ok(payload(StatusCode::CREATED, interview))
}

async fn detail_handler<J, A, I>(
    State(service): State<Arc<InterviewService<J, A, I>>>,
    actor: Actor,
    ApiPath(interview_id): ApiPath<u64>,
) -> Result<Response, ApiFailure>
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    I: InterviewRepository + 'static,
{
    let interview = service.get(&actor, InterviewId(interview_id))?;
    Ok(payload(StatusCode::OK, interview))
}

async fn reschedule_handler<J, A, I>(
    State(service): State<Arc<InterviewService<J, A, I>>>,
    actor: Actor,
    ApiPath(interview_id): ApiPath<u64>,
    ApiJson(request): ApiJson<RescheduleInterview>,
) -> Result<Response, ApiFailure>
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    I: InterviewRepository + 'static,
{
    let interview = service.reschedule(&actor, InterviewId(interview_id), request)?;
    Ok(payload(StatusCode::OK, interview))
}

async fn cancel_handler<J, A, I>(
    State(service): State<Arc<InterviewService<J, A, I>>>,
    actor: Actor,
    ApiPath(interview_id): ApiPath<u64>,
) -> Result<Response, ApiFailure>
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    I: InterviewRepository + 'static,
{
    let interview = service.cancel(&actor, InterviewId(interview_id))?;
    Ok(payload(StatusCode::OK, interview))
}

async fn complete_handler<J, A, I>(
    State(service): State<Arc<InterviewService<J, A, I>>>,
    actor: Actor,
    ApiPath(interview_id): ApiPath<u64>,
) -> Result<Response, ApiFailure>
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    I: InterviewRepository + 'static,
{
    let interview = service.complete(&actor, InterviewId(interview_id))?;
    Ok(payload(StatusCode::OK, interview))
}

async fn application_interview_handler<J, A, I>(
    State(service): State<Arc<InterviewService<J, A, I>>>,
    actor: Actor,
    ApiPath(application_id): ApiPath<u64>,
) -> Result<Response, ApiFailure>
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    I: InterviewRepository + 'static,
{
    match service.for_application(&actor, ApplicationId(application_id))? {
        Some(interview) => Ok(payload(StatusCode::OK, interview)),
        None => Err(ApiFailure::new(
            StatusCode::NOT_FOUND,
            "No interview scheduled for this application.",
        )),
    }
}

async fn recruiter_interviews_handler<J, A, I>(
    State(service): State<Arc<InterviewService<J, A, I>>>,
    actor: Actor,
    ApiQuery(query): ApiQuery<InterviewQuery>,
) -> Result<Response, ApiFailure>
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    I: InterviewRepository + 'static,
{
    let interviews = service.list_for_recruiter(&actor, &query)?;
    Ok(respond(StatusCode::OK, interviews))
}

async fn developer_interviews_handler<J, A, I>(
    State(service): State<Arc<InterviewService<J, A, I>>>,
    actor: Actor,
    ApiQuery(query): ApiQuery<InterviewQuery>,
) -> Result<Response, ApiFailure>
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    I: InterviewRepository + 'static,
{
    let interviews = service.list_for_developer(&actor, &query)?;
    Ok(respond(StatusCode::OK, interviews))
}
