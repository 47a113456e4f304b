use tracing::info;

use super::error::ClientError;
use super::guard::EntityKey;
use super::session::Session;
use super::JobBoardClient;
use crate::workflows::applications::{
    Application, ApplicationId, ApplicationQuery, ApplicationStatus, ApplicationStatusView,
    ApplyRequest, StatusUpdate,
};
use crate::workflows::jobs::JobId;

impl JobBoardClient {
    /// Apply to a job as the session's developer.
    pub async fn apply(
        &self,
        session: &Session,
        job_id: JobId,
        cover_letter: impl Into<String>,
    ) -> Result<Application, ClientError> {
        let _permit = self.guard.acquire(EntityKey::Job(job_id))?;
        let request = ApplyRequest {
            cover_letter: cover_letter.into(),
        };
        let application: Application = self
            .api
            .post(&format!("/api/jobs/{job_id}/apply"), &request, Some(session))
            .await?;
        info!(application_id = %application.id, %job_id, "applied");
        Ok(application)
    }

    pub async fn application_status(
        &self,
        session: &Session,
        job_id: JobId,
    ) -> Result<ApplicationStatusView, ClientError> {
        self.api
            .get(&format!("/api/jobs/{job_id}/application-status"), Some(session))
            .await
    }

    pub async fn my_applications(
        &self,
        session: &Session,
        query: &ApplicationQuery,
    ) -> Result<Vec<Application>, ClientError> {
        self.api
            .get_with_query("/api/developer/applications", query, Some(session))
            .await
    }

    pub async fn job_applications(
        &self,
        session: &Session,
        job_id: JobId,
        query: &ApplicationQuery,
    ) -> Result<Vec<Application>, ClientError> {
        self.api
            .get_with_query(
                &format!("/api/jobs/{job_id}/applications"),
                query,
                Some(session),
            )
            .await
    }

    pub async fn get_application(
        &self,
        session: &Session,
        id: ApplicationId,
    ) -> Result<Application, ClientError> {
        self.api
            .get(&format!("/api/applications/{id}"), Some(session))
            .await
    }

    /// Move `current` to `status`, refusing locally when the policy forbids it.
    pub async fn update_application_status(
        &self,
        session: &Session,
        current: &Application,
        status: ApplicationStatus,
        note: impl Into<String>,
    ) -> Result<Application, ClientError> {
        if !self.policy.permits(current.status, status) {
            return Err(ClientError::InvalidTransition {
                from: current.status,
                to: status,
            });
        }
        let _permit = self.guard.acquire(EntityKey::Application(current.id))?;
        let update = StatusUpdate {
            status,
            note: note.into(),
        };
        let updated: Application = self
            .api
            .patch(
                &format!("/api/applications/{}/status", current.id),
                &update,
                Some(session),
            )
            .await?;
        info!(
            application_id = %updated.id,
            from = %current.status,
            to = %updated.status,
            "status changed"
        );
        Ok(updated)
    }

    /// Withdraw `current`, refusing locally once it has been decided.
    pub async fn withdraw_application(
        &self,
        session: &Session,
        current: &Application,
    ) -> Result<Application, ClientError> {
        if !current.status.is_withdrawable() {
            return Err(ClientError::NotWithdrawable {
                status: current.status,
            });
        }
        let _permit = self.guard.acquire(EntityKey::Application(current.id))?;
        let removed: Application = self
            .api
            .delete(&format!("/api/applications/{}", current.id), Some(session))
            .await?;
        info!(application_id = %removed.id, "withdrawn");
        Ok(removed)
    }
}
