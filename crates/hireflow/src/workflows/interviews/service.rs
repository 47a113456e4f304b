use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use tracing::{info, warn};

use super::domain::{
    normalize_text, validate_slot, Interview, InterviewId, InterviewQuery, InterviewStatus,
    RescheduleInterview, ScheduleInterview, SlotError,
};
use super::repository::InterviewRepository;
use crate::workflows::accounts::{Actor, UserRole};
use crate::workflows::applications::{
    Application, ApplicationId, ApplicationRepository, ApplicationStatus,
};
use crate::workflows::clock::Clock;
use crate::workflows::jobs::{Job, JobRepository};
use crate::workflows::repository::RepositoryError;

/// Service owning the interview scheduling state machine.
pub struct InterviewService<J, A, I> {
    jobs: Arc<J>,
    applications: Arc<A>,
    interviews: Arc<I>,
    clock: Arc<dyn Clock>,
    sequence: AtomicU64,
}

impl<J, A, I> InterviewService<J, A, I>
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
            sequence: AtomicU64::new(1),
        }
    }

    /// Book the first interview for an application the caller recruits for.
    pub fn schedule(
        &self,
        actor: &Actor,
        request: ScheduleInterview,
    ) -> Result<Interview, InterviewServiceError> {
        let now = self.clock.now();
        validate_slot(request.scheduled_date, request.duration, now)?;

        let (application, _job) = self.owned_application(
            actor,
            request.application_id,
            "schedule interviews for this application",
        )?;
        if application.status == ApplicationStatus::Rejected {
            return Err(InterviewServiceError::ApplicationClosed {
                status: application.status,
            });
        }
        if self
            .interviews
            .for_application(application.id)?
            .iter()
            .any(|existing| existing.status.occupies_slot())
        {
            return Err(InterviewServiceError::Conflict {
                application_id: application.id,
            });
        }

        let interview = Interview {
            id: self.next_id()?,
            application_id: application.id,
            scheduled_date: request.scheduled_date,
            duration: request.duration,
            location: normalize_text(request.location),
            meeting_link: normalize_text(request.meeting_link),
            interviewer_notes: normalize_text(request.interviewer_notes),
            status: InterviewStatus::Scheduled,
            created_at: now,
            updated_at: now,
        };

        let stored = self
            .interviews
            .insert(interview)
            .map_err(|err| match err {
                RepositoryError::Conflict => InterviewServiceError::Conflict {
                    application_id: application.id,
                },
                other => other.into(),
            })?;
        info!(
            interview_id = %stored.id,
            application_id = %stored.application_id,
            scheduled = %stored.scheduled_date,
            "interview scheduled"
        );
        Ok(stored)
    }

    pub fn reschedule(
        &self,
        actor: &Actor,
        interview_id: InterviewId,
        request: RescheduleInterview,
    ) -> Result<Interview, InterviewServiceError> {
        let now = self.clock.now();
        validate_slot(request.scheduled_date, request.duration, now)?;

        let mut interview = self.owned_interview(actor, interview_id, "reschedule this interview")?;
        let from = interview.status;
        if from.is_terminal() {
            warn!(%interview_id, status = %from, "reschedule rejected");
            return Err(InterviewServiceError::InvalidState { status: from });
        }

        interview.scheduled_date = request.scheduled_date;
        interview.duration = request.duration;
        if let Some(location) = request.location {
            interview.location = normalize_text(Some(location));
        }
        if let Some(link) = request.meeting_link {
            interview.meeting_link = normalize_text(Some(link));
        }
        if let Some(notes) = request.interviewer_notes {
            interview.interviewer_notes = normalize_text(Some(notes));
        }
        interview.status = InterviewStatus::Rescheduled;
        interview.updated_at = now;

        self.interviews.update(interview.clone(), from)?;
        info!(%interview_id, scheduled = %interview.scheduled_date, "interview rescheduled");
        Ok(interview)
    }

    /// Cancelling twice is an error, not a no-op.
    pub fn cancel(
        &self,
        actor: &Actor,
        interview_id: InterviewId,
    ) -> Result<Interview, InterviewServiceError> {
        self.finish(actor, interview_id, InterviewStatus::Cancelled, "cancel this interview")
    }

    pub fn complete(
        &self,
        actor: &Actor,
        interview_id: InterviewId,
    ) -> Result<Interview, InterviewServiceError> {
        self.finish(actor, interview_id, InterviewStatus::Completed, "complete this interview")
    }

    pub fn get(
        &self,
        actor: &Actor,
        interview_id: InterviewId,
    ) -> Result<Interview, InterviewServiceError> {
        let interview = self.fetch(interview_id)?;
        self.visible_application(actor, interview.application_id)?;
        Ok(interview)
    }

    /// The interview currently attached to an application: the live one if any,
    /// otherwise the most recently created.
    pub fn for_application(
        &self,
        actor: &Actor,
        application_id: ApplicationId,
    ) -> Result<Option<Interview>, InterviewServiceError> {
        self.visible_application(actor, application_id)?;
        let mut interviews = self.interviews.for_application(application_id)?;
        interviews.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        let live = interviews
            .iter()
            .rposition(|interview| interview.status.occupies_slot());
        Ok(match live {
            Some(index) => Some(interviews.swap_remove(index)),
            None => interviews.pop(),
        })
    }

    /// Interviews across every job the calling recruiter owns.
    pub fn list_for_recruiter(
        &self,
        actor: &Actor,
        query: &InterviewQuery,
    ) -> Result<Vec<Interview>, InterviewServiceError> {
        if !actor.is(UserRole::Recruiter) {
            return Err(InterviewServiceError::Forbidden {
                action: "list recruiter interviews",
            });
        }
        let mut visible = Vec::new();
        for interview in self.interviews.list()? {
            let Some(application) = self.applications.fetch(interview.application_id)? else {
                continue;
            };
            let Some(job) = self.jobs.fetch(application.job_id)? else {
                continue;
            };
            if job.recruiter_id == actor.user_id {
                visible.push(interview);
            }
        }
        Ok(query.apply(visible, self.clock.now()))
    }

    /// Interviews attached to the calling developer's applications.
    pub fn list_for_developer(
        &self,
        actor: &Actor,
        query: &InterviewQuery,
    ) -> Result<Vec<Interview>, InterviewServiceError> {
        if !actor.is(UserRole::Developer) {
            return Err(InterviewServiceError::Forbidden {
                action: "list developer interviews",
            });
        }
        let mut visible = Vec::new();
        for application in self.applications.list_for_applicant(actor.user_id)? {
            visible.extend(self.interviews.for_application(application.id)?);
        }
        Ok(query.apply(visible, self.clock.now()))
    }

    fn finish(
        &self,
        actor: &Actor,
        interview_id: InterviewId,
        to: InterviewStatus,
        action: &'static str,
    ) -> Result<Interview, InterviewServiceError> {
        let mut interview = self.owned_interview(actor, interview_id, action)?;
        let from = interview.status;
        if from.is_terminal() {
            warn!(%interview_id, status = %from, to = %to, "interview already closed");
            return Err(InterviewServiceError::InvalidState { status: from });
        }

        interview.status = to;
        interview.updated_at = self.clock.now();
        self.interviews.update(interview.clone(), from)?;
        info!(%interview_id, status = %to, "interview closed");
        Ok(interview)
    }

    fn owned_interview(
        &self,
        actor: &Actor,
        interview_id: InterviewId,
        action: &'static str,
    ) -> Result<Interview, InterviewServiceError> {
        let interview = self.fetch(interview_id)?;
        self.owned_application(actor, interview.application_id, action)?;
        Ok(interview)
    }

    fn owned_application(
        &self,
        actor: &Actor,
        application_id: ApplicationId,
        action: &'static str,
    ) -> Result<(Application, Job), InterviewServiceError> {
        let (application, job) = self.application_with_job(application_id)?;
        if actor.is(UserRole::Recruiter) && job.recruiter_id == actor.user_id {
            Ok((application, job))
        } else {
            Err(InterviewServiceError::Forbidden { action })
        }
    }

    fn visible_application(
        &self,
        actor: &Actor,
        application_id: ApplicationId,
    ) -> Result<(), InterviewServiceError> {
        let (application, job) = self.application_with_job(application_id)?;
        let recruiter = actor.is(UserRole::Recruiter) && job.recruiter_id == actor.user_id;
        if recruiter || application.applicant_id == actor.user_id || actor.is(UserRole::Admin) {
            Ok(())
        } else {
            Err(InterviewServiceError::Forbidden {
                action: "view this interview",
            })
        }
    }

    fn application_with_job(
        &self,
        application_id: ApplicationId,
    ) -> Result<(Application, Job), InterviewServiceError> {
        let application = self
            .applications
            .fetch(application_id)?
            .ok_or(InterviewServiceError::ApplicationNotFound(application_id))?;
        let job = self
            .jobs
            .fetch(application.job_id)?
            .ok_or(InterviewServiceError::ApplicationNotFound(application_id))?;
        Ok((application, job))
    }

    fn fetch(&self, id: InterviewId) -> Result<Interview, InterviewServiceError> {
        self.interviews
            .fetch(id)?
            .ok_or(InterviewServiceError::NotFound(id))
    }

    fn next_id(&self) -> Result<InterviewId, InterviewServiceError> {
        loop {
            let id = InterviewId(self.sequence.fetch_add(1, Ordering::Relaxed));
            if self.interviews.fetch(id)?.is_none() {
                return Ok(id);
            }
        }
    }
}

/// Error raised by the interview service.
#[derive(Debug, thiserror::Error)]
pub enum InterviewServiceError {
    #[error(transparent)]
    Slot(#[from] SlotError),
    #[error("Interview not found.")]
    NotFound(InterviewId),
    #[error("Application not found.")]
    ApplicationNotFound(ApplicationId),
    #[error("You do not have permission to {action}.")]
    Forbidden { action: &'static str },
    #[error("Application {application_id} already has an active interview.")]
    Conflict { application_id: ApplicationId },
    #[error("Interview is {status} and can no longer be changed.")]
    InvalidState { status: InterviewStatus },
    #[error("Application is {status}; interviews cannot be scheduled.")]
    ApplicationClosed { status: ApplicationStatus },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl InterviewServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            InterviewServiceError::Slot(_) => StatusCode::BAD_REQUEST,
            InterviewServiceError::NotFound(_)
            | InterviewServiceError::ApplicationNotFound(_) => StatusCode::NOT_FOUND,
            InterviewServiceError::Forbidden { .. } => StatusCode::FORBIDDEN,
            InterviewServiceError::Conflict { .. } => StatusCode::CONFLICT,
            InterviewServiceError::InvalidState { .. }
            | InterviewServiceError::ApplicationClosed { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            InterviewServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            InterviewServiceError::Repository(
                RepositoryError::Conflict | RepositoryError::Stale,
            ) => StatusCode::CONFLICT,
            InterviewServiceError::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
