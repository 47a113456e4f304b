use chrono::Duration;

use super::common::*;
use crate::workflows::accounts::Actor;
use crate::workflows::applications::{ApplicationRepository, ApplicationStatus};
use crate::workflows::interviews::{
    InterviewId, InterviewQuery, InterviewRepository, InterviewServiceError, InterviewStatus,
    RescheduleInterview, ScheduleInterview, SlotError,
};

fn recruiter() -> Actor {
    Actor::recruiter(RECRUITER)
}

#[test]
fn interview_runs_schedule_reschedule_complete() {
    let fx = fixture(ApplicationStatus::InReview);

    let scheduled = fx
        .service
        .schedule(&recruiter(), schedule_request(45))
        .expect("schedule succeeds");
    assert_eq!(scheduled.status, InterviewStatus::Scheduled);
    assert_eq!(scheduled.duration, 45);
    assert_eq!(scheduled.location.as_deref(), Some("Zoom"));
    assert_eq!(scheduled.created_at, now());

    fx.clock.advance(Duration::hours(2));
    let moved = fx
        .service
        .reschedule(
            &recruiter(),
            scheduled.id,
            RescheduleInterview::new(tomorrow() + Duration::days(1), 90),
        )
        .expect("reschedule succeeds");
    assert_eq!(moved.status, InterviewStatus::Rescheduled);
    assert_eq!(moved.duration, 90);
    assert_eq!(moved.location.as_deref(), Some("Zoom"));
    assert_eq!(moved.updated_at, now() + Duration::hours(2));

    let completed = fx
        .service
        .complete(&recruiter(), scheduled.id)
        .expect("complete succeeds");
    assert_eq!(completed.status, InterviewStatus::Completed);

    match fx.service.reschedule(
        &recruiter(),
        scheduled.id,
        RescheduleInterview::new(tomorrow() + Duration::days(3), 60),
    ) {
        Err(InterviewServiceError::InvalidState { status }) => {
            assert_eq!(status, InterviewStatus::Completed)
        }
        other => panic!("expected invalid state, got {other:?}"),
    }
}

#[test]
fn schedule_validates_date_and_duration() {
    let fx = fixture(ApplicationStatus::Applied);

    let past = ScheduleInterview::new(APPLICATION, now() - Duration::minutes(1), 60);
    assert!(matches!(
        fx.service.schedule(&recruiter(), past),
        Err(InterviewServiceError::Slot(SlotError::InvalidDate { .. }))
    ));

    for minutes in [14, 481] {
        match fx.service.schedule(&recruiter(), schedule_request(minutes)) {
            Err(err @ InterviewServiceError::Slot(SlotError::DurationOutOfRange { .. })) => {
                assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST)
            }
            other => panic!("expected duration error for {minutes}, got {other:?}"),
        }
    }

    for minutes in [15, 480] {
        let fx = fixture(ApplicationStatus::Applied);
        fx.service
            .schedule(&recruiter(), schedule_request(minutes))
            .expect("boundary duration accepted");
    }
}

#[test]
fn second_schedule_conflicts_until_cancelled() {
    let fx = fixture(ApplicationStatus::InReview);
    let first = fx
        .service
        .schedule(&recruiter(), schedule_request(60))
        .expect("first interview");

    assert!(matches!(
        fx.service.schedule(&recruiter(), schedule_request(30)),
        Err(InterviewServiceError::Conflict { .. })
    ));

    let cancelled = fx
        .service
        .cancel(&recruiter(), first.id)
        .expect("cancel succeeds");
    assert_eq!(cancelled.status, InterviewStatus::Cancelled);

    let second = fx
        .service
        .schedule(&recruiter(), schedule_request(30))
        .expect("slot freed by cancellation");
    assert_ne!(second.id, first.id);

    let current = fx
        .service
        .for_application(&Actor::developer(DEVELOPER), APPLICATION)
        .expect("lookup")
        .expect("interview attached");
    assert_eq!(current.id, second.id);
}

#[test]
fn completed_interview_still_blocks_new_schedule() {
    let fx = fixture(ApplicationStatus::InReview);
    let first = fx
        .service
        .schedule(&recruiter(), schedule_request(60))
        .expect("first interview");
    fx.service
        .complete(&recruiter(), first.id)
        .expect("complete");

    assert!(matches!(
        fx.service.schedule(&recruiter(), schedule_request(60)),
        Err(InterviewServiceError::Conflict { .. })
    ));
}

#[test]
fn cancel_twice_is_invalid_state() {
    let fx = fixture(ApplicationStatus::InReview);
    let interview = fx
        .service
        .schedule(&recruiter(), schedule_request(60))
        .expect("schedule");

    fx.service
        .cancel(&recruiter(), interview.id)
        .expect("first cancel");
    match fx.service.cancel(&recruiter(), interview.id) {
        Err(err @ InterviewServiceError::InvalidState { .. }) => {
            assert_eq!(
                err.status_code(),
                axum::http::StatusCode::UNPROCESSABLE_ENTITY
            )
        }
        other => panic!("expected invalid state, got {other:?}"),
    }
    assert!(matches!(
        fx.service.complete(&recruiter(), interview.id),
        Err(InterviewServiceError::InvalidState { .. })
    ));
}

#[test]
fn rejected_application_cannot_be_scheduled() {
    let fx = fixture(ApplicationStatus::Rejected);
    assert!(matches!(
        fx.service.schedule(&recruiter(), schedule_request(60)),
        Err(InterviewServiceError::ApplicationClosed {
            status: ApplicationStatus::Rejected
        })
    ));
    assert!(fx.interviews.list().unwrap().is_empty());
}

#[test]
fn only_owning_recruiter_may_schedule_or_change() {
    let fx = fixture(ApplicationStatus::Applied);
    for actor in [
        Actor::recruiter(OTHER_RECRUITER),
        Actor::developer(DEVELOPER),
    ] {
        assert!(matches!(
            fx.service.schedule(&actor, schedule_request(60)),
            Err(InterviewServiceError::Forbidden { .. })
        ));
    }

    let interview = fx
        .service
        .schedule(&recruiter(), schedule_request(60))
        .expect("schedule");
    assert!(matches!(
        fx.service
            .cancel(&Actor::recruiter(OTHER_RECRUITER), interview.id),
        Err(InterviewServiceError::Forbidden { .. })
    ));
    assert!(matches!(
        fx.service.get(&Actor::developer(OTHER_DEVELOPER), interview.id),
        Err(InterviewServiceError::Forbidden { .. })
    ));
    fx.service
        .get(&Actor::developer(DEVELOPER), interview.id)
        .expect("applicant can view");
}

#[test]
fn missing_records_are_not_found() {
    let fx = fixture(ApplicationStatus::Applied);
    assert!(matches!(
        fx.service.cancel(&recruiter(), InterviewId(77)),
        Err(InterviewServiceError::NotFound(InterviewId(77)))
    ));

    fx.applications
        .delete(APPLICATION, ApplicationStatus::Applied)
        .expect("withdraw");
    assert!(matches!(
        fx.service.schedule(&recruiter(), schedule_request(60)),
        Err(InterviewServiceError::ApplicationNotFound(_))
    ));
}

#[test]
fn for_application_is_none_without_interviews() {
    let fx = fixture(ApplicationStatus::Applied);
    assert!(fx
        .service
        .for_application(&recruiter(), APPLICATION)
        .expect("lookup")
        .is_none());
}

#[test]
fn listings_scope_to_caller() {
    let fx = fixture(ApplicationStatus::InReview);
    fx.service
        .schedule(&recruiter(), schedule_request(60))
        .expect("schedule");

    let query = InterviewQuery::default();
    assert_eq!(
        fx.service
            .list_for_recruiter(&recruiter(), &query)
            .expect("recruiter list")
            .len(),
        1
    );
    assert!(fx
        .service
        .list_for_recruiter(&Actor::recruiter(OTHER_RECRUITER), &query)
        .expect("other recruiter list")
        .is_empty());
    assert_eq!(
        fx.service
            .list_for_developer(&Actor::developer(DEVELOPER), &query)
            .expect("developer list")
            .len(),
        1
    );
    assert!(matches!(
        fx.service.list_for_developer(&recruiter(), &query),
        Err(InterviewServiceError::Forbidden { .. })
    ));

    fx.clock.advance(Duration::days(2));
    let upcoming = InterviewQuery {
        upcoming: true,
        ..InterviewQuery::default()
    };
    assert!(fx
        .service
        .list_for_recruiter(&recruiter(), &upcoming)
        .expect("recruiter list")
        .is_empty());
}
