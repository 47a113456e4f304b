use std::collections::HashMap;
use std::sync::Arc;

use axum::http::StatusCode;
use tracing::debug;

use super::domain::{
    ApplicationSummary, DeveloperStats, RecentQuery, RecruiterApplicationQuery, RecruiterStats,
    MONTH_WINDOW_DAYS, RECRUITER_RECENT_DAYS,
};
use crate::workflows::accounts::{Actor, UserRole};
use crate::workflows::applications::{ApplicationRepository, ApplicationStatus};
use crate::workflows::clock::Clock;
use crate::workflows::interviews::InterviewRepository;
use crate::workflows::jobs::{Job, JobId, JobRepository};
use crate::workflows::repository::RepositoryError;

/// Aggregates over the job, application, and interview repositories.
pub struct DashboardService<J, A, I> {
    jobs: Arc<J>,
    applications: Arc<A>,
    interviews: Arc<I>,
    clock: Arc<dyn Clock>,
}

impl<J, A, I> DashboardService<J, A, I>
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    I: InterviewRepository + 'static,
{
    pub fn new(
        jobs: Arc<J>,
        applications: Arc<A>,
        interviews: Arc<I>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            jobs,
            applications,
            interviews,
            clock,
        }
    }

    pub fn recruiter_stats(&self, actor: &Actor) -> Result<RecruiterStats, DashboardError> {
        let jobs = self.recruiter_jobs(actor)?;
        let mut stats = RecruiterStats {
            jobs_posted: jobs.len(),
            ..RecruiterStats::default()
        };
        for summary in self.summaries_for(&jobs)? {
            stats.total_applicants += 1;
            match summary.application.status {
                ApplicationStatus::InReview => stats.in_review += 1,
                ApplicationStatus::Accepted => stats.hired += 1,
                _ => {}
            }
        }
        debug!(recruiter_id = %actor.user_id, ?stats, "recruiter stats computed");
        Ok(stats)
    }

    /// Applications across every job the recruiter owns.
    pub fn recruiter_applications(
        &self,
        actor: &Actor,
        query: &RecruiterApplicationQuery,
    ) -> Result<Vec<ApplicationSummary>, DashboardError> {
        let jobs = self.recruiter_jobs(actor)?;
        Ok(query.apply(self.summaries_for(&jobs)?, self.clock.now()))
    }

    /// Applications received in the last week.
    pub fn recruiter_recent(
        &self,
        actor: &Actor,
        query: &RecentQuery,
    ) -> Result<Vec<ApplicationSummary>, DashboardError> {
        let jobs = self.recruiter_jobs(actor)?;
        let summaries = self.summaries_for(&jobs)?;
        Ok(query.select(summaries, self.clock.now(), RECRUITER_RECENT_DAYS))
    }

    pub fn developer_stats(&self, actor: &Actor) -> Result<DeveloperStats, DashboardError> {
        require(actor, UserRole::Developer, "view developer dashboards")?;
        let applications = self.applications.list_for_applicant(actor.user_id)?;
        let mut stats = DeveloperStats {
            applied_jobs: applications.len(),
            ..DeveloperStats::default()
        };
        for application in &applications {
            match application.status {
                ApplicationStatus::InReview => stats.in_review += 1,
                ApplicationStatus::Accepted => stats.offers += 1,
                _ => {}
            }
            stats.interviews += self
                .interviews
                .for_application(application.id)?
                .iter()
                .filter(|interview| !interview.status.is_terminal())
                .count();
        }
        Ok(stats)
    }

    /// The developer's applications from the last thirty days.
    pub fn developer_recent(
        &self,
        actor: &Actor,
        query: &RecentQuery,
    ) -> Result<Vec<ApplicationSummary>, DashboardError> {
        require(actor, UserRole::Developer, "view developer applications")?;
        let jobs: HashMap<JobId, Job> = self
            .jobs
            .list()?
            .into_iter()
            .map(|job| (job.id, job))
            .collect();
        let summaries = self
            .applications
            .list_for_applicant(actor.user_id)?
            .into_iter()
            .filter_map(|application| {
                let job = jobs.get(&application.job_id)?;
                Some(ApplicationSummary::new(application, job))
            })
            .collect();
        Ok(query.select(summaries, self.clock.now(), MONTH_WINDOW_DAYS))
    }

    fn recruiter_jobs(&self, actor: &Actor) -> Result<Vec<Job>, DashboardError> {
        require(actor, UserRole::Recruiter, "view recruiter dashboards")?;
        let mut jobs = self.jobs.list()?;
        jobs.retain(|job| job.recruiter_id == actor.user_id);
        Ok(jobs)
    }

    fn summaries_for(&self, jobs: &[Job]) -> Result<Vec<ApplicationSummary>, DashboardError> {
        let mut summaries = Vec::new();
        for job in jobs {
            summaries.extend(
                self.applications
                    .list_for_job(job.id)?
                    .into_iter()
                    .map(|application| ApplicationSummary::new(application, job)),
            );
        }
        Ok(summaries)
    }
}

fn require(actor: &Actor, role: UserRole, action: &'static str) -> Result<(), DashboardError> {
    if actor.is(role) {
        Ok(())
    } else {
        Err(DashboardError::Forbidden { action })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("You do not have permission to {action}.")]
    Forbidden { action: &'static str },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl DashboardError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DashboardError::Forbidden { .. } => StatusCode::FORBIDDEN,
            DashboardError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            DashboardError::Repository(RepositoryError::Conflict | RepositoryError::Stale) => {
                StatusCode::CONFLICT
            }
            DashboardError::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
