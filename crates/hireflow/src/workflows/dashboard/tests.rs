use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;
use tower::ServiceExt;

use super::*;
use crate::workflows::accounts::{Actor, UserId};
use crate::workflows::applications::{
    Application, ApplicationId, ApplicationRepository, ApplicationStatus,
};
use crate::workflows::clock::FixedClock;
use crate::workflows::interviews::{Interview, InterviewId, InterviewRepository, InterviewStatus};
use crate::workflows::jobs::{Job, JobId, JobRepository, JobType};
use crate::workflows::memory::{
    InMemoryApplicationRepository, InMemoryInterviewRepository, InMemoryJobRepository,
};

const RECRUITER: u64 = 1;
const OTHER_RECRUITER: u64 = 2;
const DEVELOPER: u64 = 7;

type MemoryDashboard = DashboardService<
    InMemoryJobRepository,
    InMemoryApplicationRepository,
    InMemoryInterviewRepository,
>;

struct Fixture {
    service: Arc<MemoryDashboard>,
    jobs: Arc<InMemoryJobRepository>,
    applications: Arc<InMemoryApplicationRepository>,
    interviews: Arc<InMemoryInterviewRepository>,
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0).unwrap()
}

fn fixture() -> Fixture {
    let jobs = Arc::new(InMemoryJobRepository::new());
    let applications = Arc::new(InMemoryApplicationRepository::new());
    let interviews = Arc::new(InMemoryInterviewRepository::new());
    let service = Arc::new(DashboardService::new(
        jobs.clone(),
        applications.clone(),
        interviews.clone(),
        Arc::new(FixedClock::new(now())),
    ));
    Fixture {
        service,
        jobs,
        applications,
        interviews,
    }
}

fn post_job(fixture: &Fixture, id: u64, recruiter: u64, title: &str) -> JobId {
    fixture
        .jobs
        .insert(Job {
            id: JobId(id),
            title: title.to_string(),
            company_name: "Acme".to_string(),
            location: "Remote".to_string(),
            job_type: JobType::FullTime,
            salary_range: None,
            required_skills: Vec::new(),
            description: "Build things".to_string(),
            recruiter_id: UserId(recruiter),
            created_at: now() - Duration::days(60),
        })
        .expect("seed job")
        .id
}

fn apply(
    fixture: &Fixture,
    id: u64,
    job_id: JobId,
    applicant: u64,
    status: ApplicationStatus,
    days_ago: i64,
) -> ApplicationId {
    let applied = now() - Duration::days(days_ago);
    fixture
        .applications
        .insert(Application {
            id: ApplicationId(id),
            job_id,
            applicant_id: UserId(applicant),
            cover_letter: String::new(),
            status,
            applied_date: applied,
            updated_date: applied,
            notes: Vec::new(),
        })
        .expect("seed application")
        .id
}

fn book(fixture: &Fixture, id: u64, application_id: ApplicationId, status: InterviewStatus) {
    fixture
        .interviews
        .insert(Interview {
            id: InterviewId(id),
            application_id,
            scheduled_date: now() + Duration::days(2),
            duration: 45,
            location: Some("Room 4".to_string()),
            meeting_link: None,
            interviewer_notes: None,
            status,
            created_at: now(),
            updated_at: now(),
        })
        .expect("seed interview");
}

/// Two recruiter jobs, one foreign job, and a spread of application ages.
fn seeded() -> Fixture {
    let fixture = fixture();
    let backend = post_job(&fixture, 1, RECRUITER, "Backend Engineer");
    let frontend = post_job(&fixture, 2, RECRUITER, "Frontend Engineer");
    let foreign = post_job(&fixture, 3, OTHER_RECRUITER, "Designer");

    apply(&fixture, 10, backend, DEVELOPER, ApplicationStatus::InReview, 1);
    apply(&fixture, 11, backend, 8, ApplicationStatus::Accepted, 3);
    apply(&fixture, 12, frontend, DEVELOPER, ApplicationStatus::Applied, 10);
    apply(&fixture, 13, frontend, 9, ApplicationStatus::Rejected, 45);
    apply(&fixture, 14, foreign, DEVELOPER, ApplicationStatus::Accepted, 2);
    fixture
}

#[test]
fn recruiter_stats_count_only_owned_jobs() {
    let fixture = seeded();
    let stats = fixture
        .service
        .recruiter_stats(&Actor::recruiter(RECRUITER))
        .expect("stats");

    assert_eq!(
        stats,
        RecruiterStats {
            jobs_posted: 2,
            total_applicants: 4,
            in_review: 1,
            hired: 1,
        }
    );
}

#[test]
fn recruiter_applications_filter_page_and_window() {
    let fixture = seeded();
    let recruiter = Actor::recruiter(RECRUITER);

    let all = fixture
        .service
        .recruiter_applications(&recruiter, &RecruiterApplicationQuery::default())
        .expect("all");
    let ids: Vec<u64> = all.iter().map(|s| s.application.id.0).collect();
    assert_eq!(ids, vec![10, 11, 12, 13]);
    assert_eq!(all[2].job_title, "Frontend Engineer");

    let recent = fixture
        .service
        .recruiter_applications(
            &recruiter,
            &RecruiterApplicationQuery {
                recent: true,
                ..RecruiterApplicationQuery::default()
            },
        )
        .expect("recent");
    assert_eq!(recent.len(), 3);

    let page = fixture
        .service
        .recruiter_applications(
            &recruiter,
            &RecruiterApplicationQuery {
                status: None,
                limit: Some(2),
                offset: Some(1),
                recent: false,
            },
        )
        .expect("page");
    let ids: Vec<u64> = page.iter().map(|s| s.application.id.0).collect();
    assert_eq!(ids, vec![11, 12]);

    let accepted = fixture
        .service
        .recruiter_applications(
            &recruiter,
            &RecruiterApplicationQuery {
                status: Some(ApplicationStatus::Accepted),
                ..RecruiterApplicationQuery::default()
            },
        )
        .expect("accepted");
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0].application.id, ApplicationId(11));
}

#[test]
fn recruiter_recent_covers_the_last_week() {
    let fixture = seeded();
    let recent = fixture
        .service
        .recruiter_recent(&Actor::recruiter(RECRUITER), &RecentQuery::default())
        .expect("recent");
    let ids: Vec<u64> = recent.iter().map(|s| s.application.id.0).collect();
    assert_eq!(ids, vec![10, 11]);

    let one = fixture
        .service
        .recruiter_recent(&Actor::recruiter(RECRUITER), &RecentQuery::new(1))
        .expect("limited");
    assert_eq!(one.len(), 1);
}

#[test]
fn developer_stats_count_live_interviews() {
    let fixture = seeded();
    book(&fixture, 100, ApplicationId(10), InterviewStatus::Scheduled);
    book(&fixture, 101, ApplicationId(12), InterviewStatus::Cancelled);
    book(&fixture, 102, ApplicationId(12), InterviewStatus::Rescheduled);

    let stats = fixture
        .service
        .developer_stats(&Actor::developer(DEVELOPER))
        .expect("stats");
    assert_eq!(
        stats,
        DeveloperStats {
            applied_jobs: 3,
            in_review: 1,
            interviews: 2,
            offers: 1,
        }
    );
}

#[test]
fn developer_recent_spans_thirty_days_with_job_titles() {
    let fixture = seeded();
    apply(&fixture, 15, JobId(3), 99, ApplicationStatus::Applied, 0);

    let recent = fixture
        .service
        .developer_recent(&Actor::developer(DEVELOPER), &RecentQuery::default())
        .expect("recent");
    let titles: Vec<&str> = recent.iter().map(|s| s.job_title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Backend Engineer", "Designer", "Frontend Engineer"]
    );
}

#[test]
fn dashboards_are_role_scoped() {
    let fixture = seeded();
    let err = fixture
        .service
        .recruiter_stats(&Actor::developer(DEVELOPER))
        .expect_err("developer refused");
    assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    assert!(fixture
        .service
        .developer_stats(&Actor::recruiter(RECRUITER))
        .is_err());
    assert!(fixture
        .service
        .developer_recent(&Actor::admin(3), &RecentQuery::default())
        .is_err());
}

async fn get_json(fixture: &Fixture, uri: &str, actor: Actor) -> (StatusCode, Value) {
    let response = dashboard_router(fixture.service.clone())
        .oneshot(
            Request::get(uri)
                .extension(actor)
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    (status, serde_json::from_slice(&body).expect("json payload"))
}

#[tokio::test]
async fn stats_routes_answer_in_camel_case() {
    let fixture = seeded();

    let (status, payload) = get_json(
        &fixture,
        "/api/recruiter/dashboard/stats",
        Actor::recruiter(RECRUITER),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["data"]["jobsPosted"], 2);
    assert_eq!(payload["data"]["totalApplicants"], 4);

    let (status, payload) = get_json(
        &fixture,
        "/api/developer/dashboard/stats",
        Actor::developer(DEVELOPER),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["data"]["appliedJobs"], 3);
    assert_eq!(payload["data"]["offers"], 1);
}

#[tokio::test]
async fn recruiter_listing_route_reads_query_string() {
    let fixture = seeded();

    let (status, payload) = get_json(
        &fixture,
        "/api/recruiter/applications?status=IN_REVIEW&recent=true",
        Actor::recruiter(RECRUITER),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = payload["data"].as_array().expect("array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], 10);
    assert_eq!(rows[0]["jobTitle"], "Backend Engineer");
    assert_eq!(rows[0]["status"], "IN_REVIEW");

    let (status, payload) = get_json(
        &fixture,
        "/api/recruiter/applications/recent?limit=abc",
        Actor::recruiter(RECRUITER),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(payload["message"].is_string());
}

#[tokio::test]
async fn developer_cannot_read_recruiter_feed() {
    let fixture = seeded();
    let (status, payload) = get_json(
        &fixture,
        "/api/recruiter/applications/recent",
        Actor::developer(DEVELOPER),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(payload["message"].is_string());
}
