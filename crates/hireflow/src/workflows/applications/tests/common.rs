use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::accounts::UserId;
use crate::workflows::applications::{
    Application, ApplicationId, ApplicationRepository, ApplicationService, ApplicationStatus,
    TransitionPolicy,
};
use crate::workflows::clock::FixedClock;
use crate::workflows::envelope::ApiFailure;
use crate::workflows::jobs::{Job, JobId, JobRepository, JobType};
use crate::workflows::memory::{InMemoryApplicationRepository, InMemoryJobRepository};
use crate::workflows::repository::RepositoryError;

pub(super) const RECRUITER: u64 = 1;
pub(super) const OTHER_RECRUITER: u64 = 2;
pub(super) const DEVELOPER: u64 = 7;
pub(super) const OTHER_DEVELOPER: u64 = 8;
pub(super) const JOB: JobId = JobId(42);

pub(super) type MemoryService =
    ApplicationService<InMemoryJobRepository, InMemoryApplicationRepository>;

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap()
}

pub(super) fn job(id: JobId, recruiter: u64) -> Job {
    Job {
        id,
        title: "Backend Engineer".to_string(),
        company_name: "Acme".to_string(),
        location: "Remote".to_string(),
        job_type: JobType::FullTime,
        salary_range: None,
        required_skills: vec!["Rust".to_string()],
        description: "Build the hiring pipeline".to_string(),
        recruiter_id: UserId(recruiter),
        created_at: now(),
    }
}

pub(super) fn seeded_jobs() -> Arc<InMemoryJobRepository> {
    let jobs = Arc::new(InMemoryJobRepository::new());
    jobs.insert(job(JOB, RECRUITER)).expect("seed job 42");
    jobs
}

pub(super) fn build_service_with(
    policy: TransitionPolicy,
) -> (MemoryService, Arc<InMemoryApplicationRepository>, FixedClock) {
    let clock = FixedClock::new(now());
    let applications = Arc::new(InMemoryApplicationRepository::new());
    let service = ApplicationService::new(
        seeded_jobs(),
        applications.clone(),
        Arc::new(clock.clone()),
        policy,
    );
    (service, applications, clock)
}

pub(super) fn build_service() -> (MemoryService, Arc<InMemoryApplicationRepository>, FixedClock) {
    build_service_with(TransitionPolicy::default())
}

/// Stores an application directly in `status`, bypassing the state machine.
pub(super) fn seed_application(
    repository: &InMemoryApplicationRepository,
    id: u64,
    status: ApplicationStatus,
) -> Application {
    let application = Application {
        id: ApplicationId(id),
        job_id: JOB,
        applicant_id: UserId(DEVELOPER),
        cover_letter: "Hello".to_string(),
        status,
        applied_date: now(),
        updated_date: now(),
        notes: Vec::new(),
    };
    repository
        .insert(application.clone())
        .expect("seed application");
    application
}

pub(super) struct UnavailableRepository;

impl ApplicationRepository for UnavailableRepository {
    fn insert(&self, _application: Application) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(
        &self,
        _application: Application,
        _expected: ApplicationStatus,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_by_pair(
        &self,
        _job_id: JobId,
        _applicant_id: UserId,
    ) -> Result<Option<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_for_job(&self, _job_id: JobId) -> Result<Vec<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_for_applicant(
        &self,
        _applicant_id: UserId,
    ) -> Result<Vec<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(
        &self,
        _id: ApplicationId,
        _expected: ApplicationStatus,
    ) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn expect_failure(result: Result<Response, ApiFailure>) -> ApiFailure {
    match result {
        Err(failure) => failure,
        Ok(response) => panic!("expected failure, got {}", response.status()),
    }
}
