use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::accounts::UserId;
use crate::workflows::applications::{
    Application, ApplicationId, ApplicationRepository, ApplicationStatus,
};
use crate::workflows::clock::FixedClock;
use crate::workflows::interviews::{InterviewService, ScheduleInterview};
use crate::workflows::jobs::{Job, JobId, JobRepository, JobType};
use crate::workflows::memory::{
    InMemoryApplicationRepository, InMemoryInterviewRepository, InMemoryJobRepository,
};

pub(super) const RECRUITER: u64 = 1;
pub(super) const OTHER_RECRUITER: u64 = 2;
pub(super) const DEVELOPER: u64 = 7;
pub(super) const OTHER_DEVELOPER: u64 = 8;
pub(super) const APPLICATION: ApplicationId = ApplicationId(1);

pub(super) type MemoryService = InterviewService<
    InMemoryJobRepository,
    InMemoryApplicationRepository,
    InMemoryInterviewRepository,
>;

pub(super) struct Fixture {
    pub(super) service: MemoryService,
    pub(super) applications: Arc<InMemoryApplicationRepository>,
    pub(super) interviews: Arc<InMemoryInterviewRepository>,
    pub(super) clock: FixedClock,
}

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap()
}

pub(super) fn tomorrow() -> DateTime<Utc> {
    now() + Duration::days(1)
}

/// Job 42 owned by [`RECRUITER`] with application 1 from [`DEVELOPER`] in `status`.
pub(super) fn fixture(status: ApplicationStatus) -> Fixture {
    let jobs = Arc::new(InMemoryJobRepository::new());
    jobs.insert(Job {
        id: JobId(42),
        title: "Backend Engineer".to_string(),
        company_name: "Acme".to_string(),
        location: "Remote".to_string(),
        job_type: JobType::FullTime,
        salary_range: Some("$120k-$150k".to_string()),
        required_skills: vec!["Rust".to_string()],
        description: "Own the scheduling service".to_string(),
        recruiter_id: UserId(RECRUITER),
        created_at: now(),
    })
    .expect("seed job");

    let applications = Arc::new(InMemoryApplicationRepository::new());
    applications
        .insert(Application {
            id: APPLICATION,
            job_id: JobId(42),
            applicant_id: UserId(DEVELOPER),
            cover_letter: String::new(),
            status,
            applied_date: now(),
            updated_date: now(),
            notes: Vec::new(),
        })
        .expect("seed application");

    let interviews = Arc::new(InMemoryInterviewRepository::new());
    let clock = FixedClock::new(now());
    let service = InterviewService::new(
        jobs,
        applications.clone(),
        interviews.clone(),
        Arc::new(clock.clone()),
    );
    Fixture {
        service,
        applications,
        interviews,
        clock,
    }
}

pub(super) fn schedule_request(duration: u32) -> ScheduleInterview {
    ScheduleInterview {
        location: Some("  Zoom ".to_string()),
        meeting_link: Some("https://meet.example.com/abc".to_string()),
        ..ScheduleInterview::new(APPLICATION, tomorrow(), duration)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
