use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::applications::{Application, ApplicationStatus};
use crate::workflows::jobs::Job;

pub const DEFAULT_RECENT_LIMIT: usize = 10;
pub const MAX_RECENT_LIMIT: usize = 20;
pub const DEFAULT_PAGE_LIMIT: usize = 50;

/// Window of the recruiter's "recent applications" panel.
pub const RECRUITER_RECENT_DAYS: i64 = 7;
/// Window of the developer's recent feed and the recruiter `recent=true` filter.
pub const MONTH_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruiterStats {
    pub jobs_posted: usize,
    pub total_applicants: usize,
    pub in_review: usize,
    /// Applications moved to ACCEPTED.
    pub hired: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperStats {
    pub applied_jobs: usize,
    pub in_review: usize,
    /// Interviews still scheduled or rescheduled.
    pub interviews: usize,
    pub offers: usize,
}

/// An application with the posting it was made against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSummary {
    #[serde(flatten)]
    pub application: Application,
    pub job_title: String,
    pub company_name: String,
}

impl ApplicationSummary {
    pub fn new(application: Application, job: &Job) -> Self {
        Self {
            application,
            job_title: job.title.clone(),
            company_name: job.company_name.clone(),
        }
    }
}

/// Query string of `GET /api/recruiter/applications`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecruiterApplicationQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    /// Only applications from the last thirty days.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub recent: bool,
}

impl RecruiterApplicationQuery {
    /// Filters and pages `summaries`, newest first.
    pub fn apply(
        &self,
        mut summaries: Vec<ApplicationSummary>,
        now: DateTime<Utc>,
    ) -> Vec<ApplicationSummary> {
        if let Some(status) = self.status {
            summaries.retain(|summary| summary.application.status == status);
        }
        if self.recent {
            let since = now - Duration::days(MONTH_WINDOW_DAYS);
            summaries.retain(|summary| summary.application.applied_date >= since);
        }
        newest_first(&mut summaries);
        summaries
            .into_iter()
            .skip(self.offset.unwrap_or(0))
            .take(self.limit.unwrap_or(DEFAULT_PAGE_LIMIT))
            .collect()
    }
}

/// Query string of the `.../applications/recent` feeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl RecentQuery {
    pub fn new(limit: usize) -> Self {
        Self { limit: Some(limit) }
    }

    /// Requested size clamped to `1..=MAX_RECENT_LIMIT`.
    pub fn effective_limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_RECENT_LIMIT)
            .clamp(1, MAX_RECENT_LIMIT)
    }

    /// Applications made within `days` of `now`, newest first.
    pub fn select(
        &self,
        mut summaries: Vec<ApplicationSummary>,
        now: DateTime<Utc>,
        days: i64,
    ) -> Vec<ApplicationSummary> {
        let since = now - Duration::days(days);
        summaries.retain(|summary| summary.application.applied_date >= since);
        newest_first(&mut summaries);
        summaries.truncate(self.effective_limit());
        summaries
    }
}

fn newest_first(summaries: &mut [ApplicationSummary]) {
    summaries.sort_by(|a, b| {
        b.application
            .applied_date
            .cmp(&a.application.applied_date)
            .then(b.application.id.cmp(&a.application.id))
    });
}
