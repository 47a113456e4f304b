//! Interview scheduling for applications a recruiter is progressing.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    scheduled_at_from_local, validate_slot, Interview, InterviewId, InterviewPayload,
    InterviewQuery, InterviewStatus, RescheduleInterview, ScheduleInterview, SlotError,
    DEFAULT_DURATION_MINUTES, MAX_DURATION_MINUTES, MIN_DURATION_MINUTES,
};
pub use repository::InterviewRepository;
pub use router::interview_router;
pub use service::{InterviewService, InterviewServiceError};
