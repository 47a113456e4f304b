use super::error::ClientError;
use super::session::Session;
use super::JobBoardClient;
use crate::workflows::dashboard::{
    ApplicationSummary, DeveloperStats, RecentQuery, RecruiterApplicationQuery, RecruiterStats,
};

impl JobBoardClient {
    pub async fn recruiter_stats(
        &self,
        session: &Session,
    ) -> Result<RecruiterStats, ClientError> {
        self.api
            .get("/api/recruiter/dashboard/stats", Some(session))
            .await
    }

    /// Applications across all of the session recruiter's jobs.
    pub async fn recruiter_applications(
        &self,
        session: &Session,
        query: &RecruiterApplicationQuery,
    ) -> Result<Vec<ApplicationSummary>, ClientError> {
        self.api
            .get_with_query("/api/recruiter/applications", query, Some(session))
            .await
    }

    /// Last week's applications; the portal caps `limit` at 20.
    pub async fn recruiter_recent_applications(
        &self,
        session: &Session,
        limit: usize,
    ) -> Result<Vec<ApplicationSummary>, ClientError> {
        self.api
            .get_with_query(
                "/api/recruiter/applications/recent",
                &RecentQuery::new(limit),
                Some(session),
            )
            .await
    }

    pub async fn developer_stats(
        &self,
        session: &Session,
    ) -> Result<DeveloperStats, ClientError> {
        self.api
            .get("/api/developer/dashboard/stats", Some(session))
            .await
    }

    /// The developer's applications from the last thirty days.
    pub async fn developer_recent_applications(
        &self,
        session: &Session,
        limit: usize,
    ) -> Result<Vec<ApplicationSummary>, ClientError> {
        self.api
            .get_with_query(
                "/api/developer/applications/recent",
                &RecentQuery::new(limit),
                Some(session),
            )
            .await
    }
}
