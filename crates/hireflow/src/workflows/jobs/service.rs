use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use tracing::info;

use super::domain::{Job, JobDraft, JobId};
use super::repository::JobRepository;
use crate::workflows::accounts::{Actor, UserRole};
use crate::workflows::applications::ApplicationRepository;
use crate::workflows::clock::Clock;
use crate::workflows::repository::RepositoryError;

/// Posting catalogue: public reads, recruiter-owned writes.
pub struct JobBoardService<J> {
    jobs: Arc<J>,
    clock: Arc<dyn Clock>,
    applications: Option<Arc<dyn ApplicationRepository>>,
    sequence: AtomicU64,
}

impl<J> JobBoardService<J>
where
    J: JobRepository + 'static,
{
    pub fn new(jobs: Arc<J>, clock: Arc<dyn Clock>) -> Self {
        Self {
            jobs,
            clock,
            applications: None,
            sequence: AtomicU64::new(1),
        }
    }

    /// Postings with applicants on this repository cannot be deleted.
    pub fn with_applications(mut self, applications: Arc<dyn ApplicationRepository>) -> Self {
        self.applications = Some(applications);
        self
    }

    pub fn repository(&self) -> &Arc<J> {
        &self.jobs
    }

    /// Publish a posting owned by the calling recruiter.
    pub fn post(&self, actor: &Actor, draft: JobDraft) -> Result<Job, JobServiceError> {
        if !actor.is(UserRole::Recruiter) {
            return Err(JobServiceError::Forbidden {
                action: "post jobs",
            });
        }
        let draft = draft.normalized();
        if let Some(field) = draft.missing_field() {
            return Err(JobServiceError::MissingField(field));
        }

        let job = loop {
            let id = JobId(self.sequence.fetch_add(1, Ordering::Relaxed));
            if self.jobs.fetch(id)?.is_none() {
                break Job {
                    id,
                    title: draft.title,
                    company_name: draft.company_name,
                    location: draft.location,
                    job_type: draft.job_type,
                    salary_range: draft.salary_range,
                    required_skills: draft.required_skills,
                    description: draft.description,
                    recruiter_id: actor.user_id,
                    created_at: self.clock.now(),
                };
            }
        };

        let stored = self.jobs.insert(job)?;
        info!(job_id = %stored.id, recruiter_id = %stored.recruiter_id, "job posted");
        Ok(stored)
    }

    pub fn update(
        &self,
        actor: &Actor,
        id: JobId,
        draft: JobDraft,
    ) -> Result<Job, JobServiceError> {
        let mut job = self.owned(actor, id, "edit this job")?;
        let draft = draft.normalized();
        if let Some(field) = draft.missing_field() {
            return Err(JobServiceError::MissingField(field));
        }

        job.title = draft.title;
        job.company_name = draft.company_name;
        job.location = draft.location;
        job.job_type = draft.job_type;
        job.salary_range = draft.salary_range;
        job.required_skills = draft.required_skills;
        job.description = draft.description;

        self.jobs.update(job.clone())?;
        info!(job_id = %id, "job updated");
        Ok(job)
    }

    pub fn remove(&self, actor: &Actor, id: JobId) -> Result<Job, JobServiceError> {
        self.owned(actor, id, "delete this job")?;
        if let Some(applications) = &self.applications {
            let count = applications.list_for_job(id)?.len();
            if count > 0 {
                return Err(JobServiceError::HasApplications { job_id: id, count });
            }
        }
        let removed = self.jobs.delete(id)?;
        info!(job_id = %id, "job deleted");
        Ok(removed)
    }

    pub fn get(&self, id: JobId) -> Result<Job, JobServiceError> {
        self.jobs.fetch(id)?.ok_or(JobServiceError::NotFound(id))
    }

    /// All postings, newest first.
    pub fn list(&self) -> Result<Vec<Job>, JobServiceError> {
        let mut jobs = self.jobs.list()?;
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(jobs)
    }

    /// Postings owned by the calling recruiter, newest first.
    pub fn list_for_recruiter(&self, actor: &Actor) -> Result<Vec<Job>, JobServiceError> {
        if !actor.is(UserRole::Recruiter) {
            return Err(JobServiceError::Forbidden {
                action: "list recruiter jobs",
            });
        }
        let mut jobs = self.list()?;
        jobs.retain(|job| job.recruiter_id == actor.user_id);
        Ok(jobs)
    }

    fn owned(
        &self,
        actor: &Actor,
        id: JobId,
        action: &'static str,
    ) -> Result<Job, JobServiceError> {
        let job = self.get(id)?;
        if actor.is(UserRole::Recruiter) && job.recruiter_id == actor.user_id {
            Ok(job)
        } else {
            Err(JobServiceError::Forbidden { action })
        }
    }
}

/// Error raised by the job board service.
#[derive(Debug, thiserror::Error)]
pub enum JobServiceError {
    #[error("Job not found.")]
    NotFound(JobId),
    #[error("You do not have permission to {action}.")]
    Forbidden { action: &'static str },
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Job {job_id} has {count} application(s) and cannot be deleted.")]
    HasApplications { job_id: JobId, count: usize },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl JobServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            JobServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            JobServiceError::Forbidden { .. } => StatusCode::FORBIDDEN,
            JobServiceError::MissingField(_) => StatusCode::BAD_REQUEST,
            JobServiceError::HasApplications { .. } => StatusCode::CONFLICT,
            JobServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            JobServiceError::Repository(RepositoryError::Conflict | RepositoryError::Stale) => {
                StatusCode::CONFLICT
            }
            JobServiceError::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
