use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use super::error::ClientError;
use super::guard::EntityKey;
use super::session::Session;
use super::JobBoardClient;
use crate::workflows::applications::ApplicationId;
use crate::workflows::interviews::{
    validate_slot, Interview, InterviewId, InterviewPayload, InterviewQuery, RescheduleInterview,
    ScheduleInterview,
};

/// Interview endpoints answer `{"interview": ...}`; older deployments return it bare.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InterviewBody {
    Wrapped(InterviewPayload),
    Bare(Interview),
}

impl From<InterviewBody> for Interview {
    fn from(body: InterviewBody) -> Self {
        match body {
            InterviewBody::Wrapped(payload) => payload.interview,
            InterviewBody::Bare(interview) => interview,
        }
    }
}

impl JobBoardClient {
    /// Validates the slot against the local clock before sending.
    pub async fn schedule_interview(
        &self,
        session: &Session,
        request: &ScheduleInterview,
    ) -> Result<Interview, ClientError> {
        validate_slot(request.scheduled_date, request.duration, Utc::now())?;
        let _permit = self
            .guard
            .acquire(EntityKey::InterviewSlot(request.application_id))?;
        let body: InterviewBody = self
            .api
            .post("/api/interviews/schedule", request, Some(session))
            .await?;
        let interview = Interview::from(body);
        info!(
            interview_id = %interview.id,
            application_id = %interview.application_id,
            "interview scheduled"
        );
        Ok(interview)
    }

    pub async fn reschedule_interview(
        &self,
        session: &Session,
        id: InterviewId,
        request: &RescheduleInterview,
    ) -> Result<Interview, ClientError> {
        validate_slot(request.scheduled_date, request.duration, Utc::now())?;
        let _permit = self.guard.acquire(EntityKey::Interview(id))?;
        let body: InterviewBody = self
            .api
            .patch(&format!("/api/interviews/{id}"), request, Some(session))
            .await?;
        Ok(body.into())
    }

    pub async fn cancel_interview(
        &self,
        session: &Session,
        id: InterviewId,
    ) -> Result<Interview, ClientError> {
        let _permit = self.guard.acquire(EntityKey::Interview(id))?;
        let body: InterviewBody = self
            .api
            .delete(&format!("/api/interviews/{id}"), Some(session))
            .await?;
        Ok(body.into())
    }

    pub async fn complete_interview(
        &self,
        session: &Session,
        id: InterviewId,
    ) -> Result<Interview, ClientError> {
        let _permit = self.guard.acquire(EntityKey::Interview(id))?;
        let body: InterviewBody = self
            .api
            .post(
                &format!("/api/interviews/{id}/complete"),
                &serde_json::json!({}),
                Some(session),
            )
            .await?;
        Ok(body.into())
    }

    pub async fn get_interview(
        &self,
        session: &Session,
        id: InterviewId,
    ) -> Result<Interview, ClientError> {
        let body: InterviewBody = self
            .api
            .get(&format!("/api/interviews/{id}"), Some(session))
            .await?;
        Ok(body.into())
    }

    /// `None` when the application has no interview yet.
    pub async fn interview_for_application(
        &self,
        session: &Session,
        application_id: ApplicationId,
    ) -> Result<Option<Interview>, ClientError> {
        let result: Result<InterviewBody, ClientError> = self
            .api
            .get(
                &format!("/api/interviews/application/{application_id}"),
                Some(session),
            )
            .await;
        match result {
            Ok(body) => Ok(Some(body.into())),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub async fn recruiter_interviews(
        &self,
        session: &Session,
        query: &InterviewQuery,
    ) -> Result<Vec<Interview>, ClientError> {
        self.api
            .get_with_query("/api/interviews/recruiter/all", query, Some(session))
            .await
    }

    pub async fn developer_interviews(
        &self,
        session: &Session,
        query: &InterviewQuery,
    ) -> Result<Vec<Interview>, ClientError> {
        self.api
            .get_with_query("/api/interviews/developer/all", query, Some(session))
            .await
    }
}
