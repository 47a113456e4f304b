use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use tracing::{info, warn};

use super::domain::{
    Application, ApplicationId, ApplicationNote, ApplicationQuery, ApplicationStatus,
    ApplicationStatusView,
};
use super::policy::TransitionPolicy;
use super::repository::ApplicationRepository;
use crate::workflows::accounts::{Actor, UserRole};
use crate::workflows::clock::Clock;
use crate::workflows::interviews::{InterviewRepository, InterviewStatus};
use crate::workflows::jobs::{Job, JobId, JobRepository};
use crate::workflows::repository::RepositoryError;

/// Service owning the application status state machine.
pub struct ApplicationService<J, R> {
    jobs: Arc<J>,
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    policy: TransitionPolicy,
    interviews: Option<Arc<dyn InterviewRepository>>,
    sequence: AtomicU64,
}

impl<J, R> ApplicationService<J, R>
where
    J: JobRepository + 'static,
    R: ApplicationRepository + 'static,
{
    pub fn new(
        jobs: Arc<J>,
        repository: Arc<R>,
        clock: Arc<dyn Clock>,
        policy: TransitionPolicy,
    ) -> Self {
        Self {
            jobs,
            repository,
            clock,
            policy,
            interviews: None,
            sequence: AtomicU64::new(1),
        }
    }

    /// Interviews still live when their application is withdrawn get cancelled here.
    pub fn with_interviews(mut self, interviews: Arc<dyn InterviewRepository>) -> Self {
        self.interviews = Some(interviews);
        self
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    /// Apply to a job as the calling developer.
    pub fn submit(
        &self,
        actor: &Actor,
        job_id: JobId,
        cover_letter: String,
    ) -> Result<Application, ApplicationServiceError> {
        self.job(job_id)?;
        if !actor.is(UserRole::Developer) {
            return Err(ApplicationServiceError::Forbidden {
                action: "apply to jobs",
            });
        }
        if self.repository.find_by_pair(job_id, actor.user_id)?.is_some() {
            return Err(ApplicationServiceError::DuplicateApplication { job_id });
        }

        let now = self.clock.now();
        let application = Application {
            id: self.next_id()?,
            job_id,
            applicant_id: actor.user_id,
            cover_letter: cover_letter.trim().to_string(),
            status: ApplicationStatus::Applied,
            applied_date: now,
            updated_date: now,
            notes: Vec::new(),
        };

        // The pair check above is advisory; the repository insert is the arbiter.
        let stored = self
            .repository
            .insert(application)
            .map_err(|err| match err {
                RepositoryError::Conflict => {
                    ApplicationServiceError::DuplicateApplication { job_id }
                }
                other => other.into(),
            })?;
        info!(
            application_id = %stored.id,
            %job_id,
            applicant_id = %actor.user_id,
            "application submitted"
        );
        Ok(stored)
    }

    /// Move an application to `status` as the recruiter who owns the job.
    pub fn transition_status(
        &self,
        actor: &Actor,
        application_id: ApplicationId,
        status: ApplicationStatus,
        note: &str,
    ) -> Result<Application, ApplicationServiceError> {
        let mut application = self.fetch(application_id)?;
        let job = self.job(application.job_id)?;
        if !owns(actor, &job) {
            return Err(ApplicationServiceError::Forbidden {
                action: "update this application",
            });
        }

        let from = application.status;
        if !self.policy.permits(from, status) {
            warn!(%application_id, %from, to = %status, "transition rejected");
            return Err(ApplicationServiceError::InvalidTransition { from, to: status });
        }

        let now = self.clock.now();
        application.status = status;
        application.updated_date = now;
        let note = note.trim();
        if !note.is_empty() {
            application.notes.push(ApplicationNote {
                status,
                note: note.to_string(),
                recorded_at: now,
            });
        }

        self.repository.update(application.clone(), from)?;
        info!(%application_id, %from, to = %status, "application status changed");
        Ok(application)
    }

    /// Delete the caller's own application while it is still undecided.
    pub fn withdraw(
        &self,
        actor: &Actor,
        application_id: ApplicationId,
    ) -> Result<Application, ApplicationServiceError> {
        let application = self.fetch(application_id)?;
        if application.applicant_id != actor.user_id {
            return Err(ApplicationServiceError::Forbidden {
                action: "withdraw this application",
            });
        }
        if !application.status.is_withdrawable() {
            return Err(ApplicationServiceError::InvalidState {
                status: application.status,
            });
        }

        let removed = self
            .repository
            .delete(application_id, application.status)?;
        info!(%application_id, "application withdrawn");
        self.cancel_live_interviews(application_id)?;
        Ok(removed)
    }

    /// Visible to the applicant, the owning recruiter, and admins.
    pub fn get(
        &self,
        actor: &Actor,
        application_id: ApplicationId,
    ) -> Result<Application, ApplicationServiceError> {
        let application = self.fetch(application_id)?;
        if application.applicant_id == actor.user_id || actor.is(UserRole::Admin) {
            return Ok(application);
        }
        let job = self.job(application.job_id)?;
        if owns(actor, &job) {
            Ok(application)
        } else {
            Err(ApplicationServiceError::Forbidden {
                action: "view this application",
            })
        }
    }

    /// Applicants for one of the caller's jobs.
    pub fn list_for_job(
        &self,
        actor: &Actor,
        job_id: JobId,
        query: &ApplicationQuery,
    ) -> Result<Vec<Application>, ApplicationServiceError> {
        let job = self.job(job_id)?;
        if !(owns(actor, &job) || actor.is(UserRole::Admin)) {
            return Err(ApplicationServiceError::Forbidden {
                action: "view applicants for this job",
            });
        }
        Ok(query.apply(self.repository.list_for_job(job_id)?))
    }

    /// The calling developer's own applications.
    pub fn list_for_applicant(
        &self,
        actor: &Actor,
        query: &ApplicationQuery,
    ) -> Result<Vec<Application>, ApplicationServiceError> {
        if !actor.is(UserRole::Developer) {
            return Err(ApplicationServiceError::Forbidden {
                action: "list developer applications",
            });
        }
        Ok(query.apply(self.repository.list_for_applicant(actor.user_id)?))
    }

    pub fn status_for_job(
        &self,
        actor: &Actor,
        job_id: JobId,
    ) -> Result<ApplicationStatusView, ApplicationServiceError> {
        self.job(job_id)?;
        let application = self.repository.find_by_pair(job_id, actor.user_id)?;
        Ok(ApplicationStatusView {
            applied: application.is_some(),
            application,
        })
    }

    fn cancel_live_interviews(
        &self,
        application_id: ApplicationId,
    ) -> Result<(), ApplicationServiceError> {
        let Some(interviews) = &self.interviews else {
            return Ok(());
        };
        let now = self.clock.now();
        for mut interview in interviews.for_application(application_id)? {
            if interview.status.is_terminal() {
                continue;
            }
            let expected = interview.status;
            interview.status = InterviewStatus::Cancelled;
            interview.updated_at = now;
            match interviews.update(interview.clone(), expected) {
                Ok(()) => info!(
                    %application_id,
                    interview_id = %interview.id,
                    "interview cancelled on withdrawal"
                ),
                Err(RepositoryError::Stale) => warn!(
                    %application_id,
                    interview_id = %interview.id,
                    "interview changed during withdrawal"
                ),
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }

    fn fetch(&self, id: ApplicationId) -> Result<Application, ApplicationServiceError> {
        self.repository
            .fetch(id)?
            .ok_or(ApplicationServiceError::NotFound(id))
    }

    fn job(&self, id: JobId) -> Result<Job, ApplicationServiceError> {
        self.jobs
            .fetch(id)?
            .ok_or(ApplicationServiceError::JobNotFound(id))
    }

    fn next_id(&self) -> Result<ApplicationId, ApplicationServiceError> {
        loop {
            let id = ApplicationId(self.sequence.fetch_add(1, Ordering::Relaxed));
            if self.repository.fetch(id)?.is_none() {
                return Ok(id);
            }
        }
    }
}

fn owns(actor: &Actor, job: &Job) -> bool {
    actor.is(UserRole::Recruiter) && job.recruiter_id == actor.user_id
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error("Job not found.")]
    JobNotFound(JobId),
    #[error("Application not found.")]
    NotFound(ApplicationId),
    #[error("You do not have permission to {action}.")]
    Forbidden { action: &'static str },
    #[error("You have already applied to job {job_id}.")]
    DuplicateApplication { job_id: JobId },
    #[error("Cannot change application status from {from} to {to}.")]
    InvalidTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },
    #[error("Application is {status} and can no longer be withdrawn.")]
    InvalidState { status: ApplicationStatus },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ApplicationServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApplicationServiceError::JobNotFound(_) | ApplicationServiceError::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ApplicationServiceError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApplicationServiceError::DuplicateApplication { .. } => StatusCode::CONFLICT,
            ApplicationServiceError::InvalidTransition { .. }
            | ApplicationServiceError::InvalidState { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApplicationServiceError::Repository(RepositoryError::NotFound) => {
                StatusCode::NOT_FOUND
            }
            ApplicationServiceError::Repository(
                RepositoryError::Conflict | RepositoryError::Stale,
            ) => StatusCode::CONFLICT,
            ApplicationServiceError::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
