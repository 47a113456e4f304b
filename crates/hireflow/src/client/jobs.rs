use super::error::ClientError;
use super::guard::EntityKey;
use super::session::Session;
use super::JobBoardClient;
use crate::workflows::jobs::{Job, JobDraft, JobId};

impl JobBoardClient {
    pub async fn list_jobs(&self) -> Result<Vec<Job>, ClientError> {
        self.api.get("/api/jobs", None).await
    }

    pub async fn get_job(&self, id: JobId) -> Result<Job, ClientError> {
        self.api.get(&format!("/api/jobs/{id}"), None).await
    }

    pub async fn my_jobs(&self, session: &Session) -> Result<Vec<Job>, ClientError> {
        self.api.get("/api/jobs/my/jobs", Some(session)).await
    }

    pub async fn create_job(
        &self,
        session: &Session,
        draft: &JobDraft,
    ) -> Result<Job, ClientError> {
        self.api.post("/api/jobs", draft, Some(session)).await
    }

    pub async fn update_job(
        &self,
        session: &Session,
        id: JobId,
        draft: &JobDraft,
    ) -> Result<Job, ClientError> {
        let _permit = self.guard.acquire(EntityKey::Job(id))?;
        self.api
            .put(&format!("/api/jobs/{id}"), draft, Some(session))
            .await
    }

    pub async fn delete_job(&self, session: &Session, id: JobId) -> Result<Job, ClientError> {
        let _permit = self.guard.acquire(EntityKey::Job(id))?;
        self.api
            .delete(&format!("/api/jobs/{id}"), Some(session))
            .await
    }
}
