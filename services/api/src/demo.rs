use chrono::{Duration, Utc};
use clap::Args;
use hireflow::client::{ClientError, JobBoardClient, Session};
use hireflow::config::ClientConfig;
use hireflow::error::AppError;
use hireflow::workflows::accounts::{SignupRequest, UserRole};
use hireflow::workflows::applications::{ApplicationId, ApplicationStatus, TransitionPolicy};
use hireflow::workflows::interviews::{
    InterviewQuery, RescheduleInterview, ScheduleInterview, DEFAULT_DURATION_MINUTES,
};
use hireflow::workflows::jobs::{JobDraft, JobType};
use hireflow::workflows::{Portal, SystemClock};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::warn;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Drive an already running API instead of booting one in-process
    #[arg(long)]
    pub(crate) base_url: Option<String>,
    /// Transition policy for the in-process API and the client (forward-only or lenient)
    #[arg(long, value_parser = parse_policy)]
    pub(crate) policy: Option<TransitionPolicy>,
}

fn parse_policy(raw: &str) -> Result<TransitionPolicy, String> {
    TransitionPolicy::parse(raw).ok_or_else(|| {
        format!("unknown transition policy '{raw}' (use forward-only or lenient)")
    })
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { base_url, policy } = args;
    let policy = policy.unwrap_or_default();

    let base_url = match base_url {
        Some(url) => url,
        None => boot_portal(policy).await?,
    };
    println!("Hiring round demo against {base_url}");

    let client = JobBoardClient::new(&ClientConfig::new(base_url))?.with_policy(policy);
    let stamp = Utc::now().timestamp_millis();

    let recruiter = client
        .signup(&signup("Rita Recruiter", "rita", stamp, UserRole::Recruiter))
        .await?;
    let developer = client
        .signup(&signup("Dana Developer", "dana", stamp, UserRole::Developer))
        .await?;
    println!(
        "- Signed up recruiter #{} and developer #{}",
        recruiter.user().id,
        developer.user().id
    );

    let job = client.create_job(&recruiter, &demo_job()).await?;
    println!("- Posted job #{} \"{}\" at {}", job.id, job.title, job.company_name);

    let application = client
        .apply(&developer, job.id, "I have shipped Rust services for five years.")
        .await?;
    println!(
        "- Developer applied: application #{} is {}",
        application.id, application.status
    );

    if let Err(err) = client.apply(&developer, job.id, "again").await {
        println!("- Second application refused ({}): {err}", err.status());
    }

    let reviewing = client
        .update_application_status(&recruiter, &application, ApplicationStatus::InReview, "")
        .await?;
    println!("- Recruiter moved the application to {}", reviewing.status);

    run_interview_round(&client, &recruiter, &developer, reviewing.id).await?;

    let accepted = client
        .update_application_status(
            &recruiter,
            &reviewing,
            ApplicationStatus::Accepted,
            "Strong systems design round",
        )
        .await?;
    println!(
        "- Application {} with {} note(s)",
        accepted.status,
        accepted.notes.len()
    );

    report_refusal(
        "Rejecting after acceptance",
        client
            .update_application_status(&recruiter, &accepted, ApplicationStatus::Rejected, "")
            .await,
    );
    report_refusal(
        "Withdrawing after acceptance",
        client.withdraw_application(&developer, &accepted).await,
    );

    let view = client.application_status(&developer, job.id).await?;
    println!(
        "- Developer view of job #{}: applied={} status={}",
        job.id,
        view.applied,
        view.application
            .as_ref()
            .map(|application| application.status.label())
            .unwrap_or("none")
    );

    let stats = client.recruiter_stats(&recruiter).await?;
    println!(
        "- Recruiter dashboard: {} job(s), {} applicant(s), {} hired",
        stats.jobs_posted, stats.total_applicants, stats.hired
    );
    let offers = client.developer_stats(&developer).await?.offers;
    println!("- Developer dashboard: {offers} offer(s)");

    client.logout(&recruiter).await?;
    client.logout(&developer).await?;
    println!("Demo complete.");
    Ok(())
}

async fn run_interview_round(
    client: &JobBoardClient,
    recruiter: &Session,
    developer: &Session,
    application_id: ApplicationId,
) -> Result<(), AppError> {
    let request = ScheduleInterview {
        location: Some("Remote".to_string()),
        meeting_link: Some("https://meet.example.com/hireflow".to_string()),
        ..ScheduleInterview::new(
            application_id,
            Utc::now() + Duration::days(1),
            DEFAULT_DURATION_MINUTES,
        )
    };
    let interview = client.schedule_interview(recruiter, &request).await?;
    println!(
        "- Interview #{} scheduled for {} ({} min)",
        interview.id,
        interview.scheduled_date.to_rfc3339(),
        interview.duration
    );

    let moved = client
        .reschedule_interview(
            recruiter,
            interview.id,
            &RescheduleInterview::new(Utc::now() + Duration::days(2), 90),
        )
        .await?;
    println!(
        "- Interview {} to {}",
        moved.status.label().to_lowercase(),
        moved.scheduled_date.to_rfc3339()
    );

    let upcoming = client
        .developer_interviews(
            developer,
            &InterviewQuery {
                upcoming: true,
                ..InterviewQuery::default()
            },
        )
        .await?;
    println!("- Developer sees {} upcoming interview(s)", upcoming.len());

    let completed = client.complete_interview(recruiter, interview.id).await?;
    println!("- Interview marked {}", completed.status);
    Ok(())
}

async fn boot_portal(policy: TransitionPolicy) -> Result<String, AppError> {
    let portal = Portal::in_memory(Arc::new(SystemClock), policy);
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, portal.router()).await {
            warn!(error = %err, "demo portal stopped");
        }
    });
    Ok(format!("http://{addr}"))
}

fn report_refusal<T>(step: &str, outcome: Result<T, ClientError>) {
    match outcome {
        Ok(_) => println!("- {step} unexpectedly succeeded"),
        Err(err) => println!("- {step} refused locally ({}): {err}", err.status()),
    }
}

fn signup(name: &str, mailbox: &str, stamp: i64, role: UserRole) -> SignupRequest {
    SignupRequest {
        name: name.to_string(),
        email: format!("{mailbox}+{stamp}@example.com"),
        password: "demo-password".to_string(),
        role,
    }
}

fn demo_job() -> JobDraft {
    JobDraft {
        title: "Senior Rust Engineer".to_string(),
        company_name: "Hireflow Labs".to_string(),
        location: "Remote".to_string(),
        job_type: JobType::FullTime,
        salary_range: Some("$150k-$180k".to_string()),
        required_skills: vec!["Rust".to_string(), "Tokio".to_string(), "Axum".to_string()],
        description: "Own the hiring pipeline services end to end.".to_string(),
    }
}
