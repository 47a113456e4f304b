use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::applications::ApplicationId;

pub const MIN_DURATION_MINUTES: u32 = 15;
pub const MAX_DURATION_MINUTES: u32 = 480;
pub const DEFAULT_DURATION_MINUTES: u32 = 60;

/// Identifier wrapper for interviews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterviewId(pub u64);

impl fmt::Display for InterviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Interview lifecycle. COMPLETED and CANCELLED are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterviewStatus {
    Scheduled,
    Rescheduled,
    Completed,
    Cancelled,
}

impl InterviewStatus {
    pub const fn label(self) -> &'static str {
        match self {
            InterviewStatus::Scheduled => "Scheduled",
            InterviewStatus::Rescheduled => "Rescheduled",
            InterviewStatus::Completed => "Completed",
            InterviewStatus::Cancelled => "Cancelled",
        }
    }

    pub const fn as_wire(self) -> &'static str {
        match self {
            InterviewStatus::Scheduled => "SCHEDULED",
            InterviewStatus::Rescheduled => "RESCHEDULED",
            InterviewStatus::Completed => "COMPLETED",
            InterviewStatus::Cancelled => "CANCELLED",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            InterviewStatus::Completed | InterviewStatus::Cancelled
        )
    }

    /// Counts against the one-interview-per-application rule.
    pub const fn occupies_slot(self) -> bool {
        !matches!(self, InterviewStatus::Cancelled)
    }
}

impl fmt::Display for InterviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    pub id: InterviewId,
    pub application_id: ApplicationId,
    pub scheduled_date: DateTime<Utc>,
    pub duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interviewer_notes: Option<String>,
    pub status: InterviewStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/interviews/schedule`.
///
/// `scheduled_date` accepts any RFC 3339 offset and is held in UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleInterview {
    pub application_id: ApplicationId,
    pub scheduled_date: DateTime<Utc>,
    #[serde(default = "default_duration")]
    pub duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interviewer_notes: Option<String>,
}

impl ScheduleInterview {
    pub fn new(
        application_id: ApplicationId,
        scheduled_date: DateTime<Utc>,
        duration: u32,
    ) -> Self {
        Self {
            application_id,
            scheduled_date,
            duration,
            location: None,
            meeting_link: None,
            interviewer_notes: None,
        }
    }
}

/// Body of `PATCH /api/interviews/{id}`. Absent optional fields keep their value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleInterview {
    pub scheduled_date: DateTime<Utc>,
    #[serde(default = "default_duration")]
    pub duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interviewer_notes: Option<String>,
}

impl RescheduleInterview {
    pub fn new(scheduled_date: DateTime<Utc>, duration: u32) -> Self {
        Self {
            scheduled_date,
            duration,
            location: None,
            meeting_link: None,
            interviewer_notes: None,
        }
    }
}

fn default_duration() -> u32 {
    DEFAULT_DURATION_MINUTES
}

/// Wire wrapper: interview endpoints answer `{"data": {"interview": ...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewPayload {
    pub interview: Interview,
}

/// Listing filters for the recruiter and developer interview views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<InterviewStatus>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub upcoming: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

impl InterviewQuery {
    /// Filters, orders by scheduled date (soonest first), then pages.
    pub fn apply(&self, mut interviews: Vec<Interview>, now: DateTime<Utc>) -> Vec<Interview> {
        if let Some(status) = self.status {
            interviews.retain(|interview| interview.status == status);
        }
        if self.upcoming {
            interviews.retain(|interview| {
                interview.scheduled_date > now && !interview.status.is_terminal()
            });
        }
        interviews.sort_by(|a, b| {
            a.scheduled_date
                .cmp(&b.scheduled_date)
                .then(a.id.cmp(&b.id))
        });
        interviews
            .into_iter()
            .skip(self.offset.unwrap_or(0))
            .take(self.limit.unwrap_or(usize::MAX))
            .collect()
    }
}

/// Input validation shared by the server and the portal client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlotError {
    #[error("Interview date must be in the future.")]
    InvalidDate {
        scheduled: DateTime<Utc>,
        now: DateTime<Utc>,
    },
    #[error("Interview duration must be between 15 and 480 minutes, got {minutes}.")]
    DurationOutOfRange { minutes: u32 },
}

pub fn validate_slot(
    scheduled: DateTime<Utc>,
    duration: u32,
    now: DateTime<Utc>,
) -> Result<(), SlotError> {
    if scheduled <= now {
        return Err(SlotError::InvalidDate { scheduled, now });
    }
    if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&duration) {
        return Err(SlotError::DurationOutOfRange { minutes: duration });
    }
    Ok(())
}

/// Converts a wall-clock value entered in `offset` to UTC.
pub fn scheduled_at_from_local(local: NaiveDateTime, offset: FixedOffset) -> Option<DateTime<Utc>> {
    offset
        .from_local_datetime(&local)
        .single()
        .map(|value| value.with_timezone(&Utc))
}

/// Trims an optional text field, treating blank input as absent.
pub(crate) fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
