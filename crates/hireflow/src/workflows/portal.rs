//! Wiring of every lifecycle router behind bearer authentication.

use std::sync::Arc;

use axum::middleware::from_fn_with_state;
use axum::Router;

use super::accounts::{account_router, authenticate, AccountDirectory};
use super::applications::{application_router, ApplicationService, TransitionPolicy};
use super::clock::Clock;
use super::dashboard::{dashboard_router, DashboardService};
use super::interviews::{interview_router, InterviewService};
use super::jobs::{job_router, JobBoardService};
use super::memory::{
    InMemoryApplicationRepository, InMemoryInterviewRepository, InMemoryJobRepository,
};

pub type MemoryJobService = JobBoardService<InMemoryJobRepository>;
pub type MemoryApplicationService =
    ApplicationService<InMemoryJobRepository, InMemoryApplicationRepository>;
pub type MemoryInterviewService = InterviewService<
    InMemoryJobRepository,
    InMemoryApplicationRepository,
    InMemoryInterviewRepository,
>;
pub type MemoryDashboardService = DashboardService<
    InMemoryJobRepository,
    InMemoryApplicationRepository,
    InMemoryInterviewRepository,
>;

/// The portal services sharing one set of in-memory repositories.
#[derive(Clone)]
pub struct Portal {
    pub accounts: Arc<AccountDirectory>,
    pub jobs: Arc<MemoryJobService>,
    pub applications: Arc<MemoryApplicationService>,
    pub interviews: Arc<MemoryInterviewService>,
    pub dashboard: Arc<MemoryDashboardService>,
}

impl Portal {
    pub fn in_memory(clock: Arc<dyn Clock>, policy: TransitionPolicy) -> Self {
        let job_rows = Arc::new(InMemoryJobRepository::new());
        let application_rows = Arc::new(InMemoryApplicationRepository::new());
        let interview_rows = Arc::new(InMemoryInterviewRepository::new());

        Self {
            accounts: Arc::new(AccountDirectory::new()),
            jobs: Arc::new(
                JobBoardService::new(job_rows.clone(), clock.clone())
                    .with_applications(application_rows.clone()),
            ),
            applications: Arc::new(
                ApplicationService::new(
                    job_rows.clone(),
                    application_rows.clone(),
                    clock.clone(),
                    policy,
                )
                .with_interviews(interview_rows.clone()),
            ),
            interviews: Arc::new(InterviewService::new(
                job_rows.clone(),
                application_rows.clone(),
                interview_rows.clone(),
                clock.clone(),
            )),
            dashboard: Arc::new(DashboardService::new(
                job_rows,
                application_rows,
                interview_rows,
                clock,
            )),
        }
    }

    /// All `/api` routes. Callers are resolved from `Authorization: Bearer` before
    /// any handler runs.
    pub fn router(&self) -> Router {
        Router::new()
            .merge(account_router(self.accounts.clone()))
            .merge(job_router(self.jobs.clone()))
            .merge(application_router(self.applications.clone()))
            .merge(interview_router(self.interviews.clone()))
            .merge(dashboard_router(self.dashboard.clone()))
            .layer(from_fn_with_state(self.accounts.clone(), authenticate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::clock::SystemClock;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn call(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router
            .clone()
            .oneshot(request)
            .await
            .expect("route executes");
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        (status, serde_json::from_slice(&body).expect("json payload"))
    }

    fn post(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    #[tokio::test]
    async fn bearer_token_from_signup_authorizes_job_posting() {
        let portal = Portal::in_memory(Arc::new(SystemClock), TransitionPolicy::default());
        let router = portal.router();

        let (status, payload) = call(
            &router,
            post(
                "/api/auth/signup",
                None,
                json!({
                    "name": "Rita Recruiter",
                    "email": "rita@example.com",
                    "password": "hunter2hunter2",
                    "role": "RECRUITER"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let token = payload["data"]["accessToken"]
            .as_str()
            .expect("token issued")
            .to_string();

        let job = json!({
            "title": "Rust Engineer",
            "companyName": "Acme",
            "location": "Remote",
            "jobType": "FULL_TIME",
            "description": "Ship it"
        });
        let (status, _) = call(&router, post("/api/jobs", None, job.clone())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, payload) = call(&router, post("/api/jobs", Some(&token), job)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(payload["data"]["recruiterId"].is_u64());
        assert_eq!(payload["data"]["jobType"], "FULL_TIME");
    }

    fn with_token(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json");
        let body = body.map_or_else(Body::empty, |body| Body::from(body.to_string()));
        builder.body(body).expect("request builds")
    }

    async fn signup(router: &Router, email: &str, role: &str) -> String {
        let (status, payload) = call(
            router,
            post(
                "/api/auth/signup",
                None,
                json!({
                    "name": "Portal User",
                    "email": email,
                    "password": "hunter2hunter2",
                    "role": role
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        payload["data"]["accessToken"]
            .as_str()
            .expect("token issued")
            .to_string()
    }

    #[tokio::test]
    async fn job_with_applicants_answers_conflict_on_delete() {
        let portal = Portal::in_memory(Arc::new(SystemClock), TransitionPolicy::default());
        let router = portal.router();
        let recruiter = signup(&router, "rita@example.com", "RECRUITER").await;
        let developer = signup(&router, "dev@example.com", "DEVELOPER").await;

        let (_, payload) = call(
            &router,
            post(
                "/api/jobs",
                Some(&recruiter),
                json!({
                    "title": "Rust Engineer",
                    "companyName": "Acme",
                    "location": "Remote",
                    "jobType": "CONTRACT",
                    "description": "Ship it"
                }),
            ),
        )
        .await;
        let job_id = payload["data"]["id"].as_u64().expect("job id");
        let (status, _) = call(
            &router,
            post(&format!("/api/jobs/{job_id}/apply"), Some(&developer), json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, payload) = call(
            &router,
            with_token("DELETE", &format!("/api/jobs/{job_id}"), &recruiter, None),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(payload["message"].is_string());

        let (status, payload) = call(
            &router,
            with_token("GET", "/api/recruiter/dashboard/stats", &recruiter, None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["data"]["jobsPosted"], 1);
        assert_eq!(payload["data"]["totalApplicants"], 1);
    }

    #[tokio::test]
    async fn developer_profile_round_trips_over_http() {
        let portal = Portal::in_memory(Arc::new(SystemClock), TransitionPolicy::default());
        let router = portal.router();
        let developer = signup(&router, "dev@example.com", "DEVELOPER").await;
        let recruiter = signup(&router, "rita@example.com", "RECRUITER").await;

        let (status, payload) = call(
            &router,
            with_token(
                "PATCH",
                "/api/developer/profile",
                &developer,
                Some(json!({ "experience": 3, "skills": ["Rust", "Go"] })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["data"]["skills"], json!(["Rust", "Go"]));

        let (status, payload) = call(
            &router,
            with_token("GET", "/api/developer/profile", &developer, None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["data"]["experience"], 3);

        let (status, _) = call(
            &router,
            with_token("GET", "/api/developer/profile", &recruiter, None),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, payload) = call(
            &router,
            with_token(
                "PATCH",
                "/api/developer/profile",
                &developer,
                Some(json!({ "experience": "lots" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(payload["message"].is_string());
    }
}
