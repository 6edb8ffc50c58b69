use chrono::Duration;
use clarity_core::api::{IdeaRequest, MarkStepRequest};
use clarity_core::{ChallengePhase, ChallengeStatus, ChallengeView, ClarityConfig};
use clarity_model::ValidationStep;
use clarity_test_utils::{t0, test_user, ScriptedGenerator, TestHarness, TEST_USER};
use std::sync::Arc;

fn mark(h: &TestHarness, step: &str) -> MarkStepRequest {
    MarkStepRequest {
        idea_id: h.idea_id(),
        step: step.to_string(),
    }
}

async fn current_view(h: &TestHarness) -> ChallengeView {
    let status = h.service.challenge_status(TEST_USER, &h.idea_id()).await.unwrap();
    status.challenge.unwrap()
}

fn start(h: &TestHarness) -> IdeaRequest {
    IdeaRequest { idea_id: h.idea_id() }
}

#[tokio::test]
async fn test_full_challenge_scenario() {
    let h = TestHarness::new();

    let started = h.service.start_challenge(TEST_USER, start(&h)).await.unwrap();
    assert!(started.success);
    assert_eq!(started.message, "48-hour challenge started!");
    assert_eq!(started.challenge.started_at, t0());

    h.service.mark_step(TEST_USER, mark(&h, "landing")).await.unwrap();
    h.service.mark_step(TEST_USER, mark(&h, "tweet")).await.unwrap();

    h.advance(Duration::hours(1));
    let status = h.service.challenge_status(TEST_USER, &h.idea_id()).await.unwrap();
    let view = status.challenge.unwrap();
    assert!(!view.is_completed);
    assert!(!view.success);
    assert_eq!(view.completed_steps, 2);
    assert_eq!(view.time_remaining_seconds, 169_200);

    h.advance(Duration::hours(1));
    h.service.mark_step(TEST_USER, mark(&h, "competitor")).await.unwrap();

    h.advance(Duration::seconds(1));
    let completed_at = t0() + Duration::hours(2) + Duration::seconds(1);
    let view = h
        .service
        .challenge_status(TEST_USER, &h.idea_id())
        .await
        .unwrap()
        .challenge
        .unwrap();
    assert!(view.success);
    assert!(view.is_completed);
    assert_eq!(view.completed_at, Some(completed_at));

    // Persisted, not just reported
    assert_eq!(h.challenges.len(), 1);
    let status = h
        .service
        .challenge_evaluator()
        .status(&test_user(), &h.idea.id)
        .await
        .unwrap();
    assert_eq!(status.phase(), ChallengePhase::Completed);
}

#[tokio::test]
async fn test_start_twice_keeps_timer() {
    let h = TestHarness::new();
    let first = h.service.start_challenge(TEST_USER, start(&h)).await.unwrap();

    h.advance(Duration::hours(5));
    let second = h.service.start_challenge(TEST_USER, start(&h)).await.unwrap();

    assert!(!second.success);
    assert_eq!(second.message, "Challenge already started for this idea");
    assert_eq!(second.challenge.started_at, first.challenge.started_at);
    assert_eq!(second.challenge.id, first.challenge.id);
    assert_eq!(second.challenge.time_remaining_seconds, 43 * 3600);
    assert_eq!(h.challenges.len(), 1);
}

#[tokio::test]
async fn test_start_also_records_completion() {
    let h = TestHarness::new();
    h.service.start_challenge(TEST_USER, start(&h)).await.unwrap();
    for step in ["landing", "tweet", "survey"] {
        h.service.mark_step(TEST_USER, mark(&h, step)).await.unwrap();
    }

    h.advance(Duration::minutes(30));
    let again = h.service.start_challenge(TEST_USER, start(&h)).await.unwrap();
    assert!(!again.success);
    assert_eq!(again.challenge.completed_at, Some(t0() + Duration::minutes(30)));
}

#[tokio::test]
async fn test_window_boundaries() {
    let h = TestHarness::new();
    h.service.start_challenge(TEST_USER, start(&h)).await.unwrap();

    h.advance(Duration::hours(47));
    let view = current_view(&h).await;
    assert!(!view.is_expired);
    assert_eq!(view.time_remaining_seconds, 3600);

    for step in ValidationStep::ALL {
        h.service.mark_step(TEST_USER, mark(&h, step.as_str())).await.unwrap();
    }
    h.advance(Duration::hours(2));
    let view = current_view(&h).await;
    assert!(view.is_expired);
    assert_eq!(view.time_remaining_seconds, 0);
    assert!(!view.is_completed);
    assert!(!view.success);
    assert_eq!(view.completed_steps, 5);
}

#[tokio::test]
async fn test_completion_is_write_once() {
    let h = TestHarness::new();
    h.service.start_challenge(TEST_USER, start(&h)).await.unwrap();
    for step in ["landing", "tweet", "competitor"] {
        h.service.mark_step(TEST_USER, mark(&h, step)).await.unwrap();
    }

    h.advance(Duration::hours(3));
    let first = current_view(&h).await;
    let t2 = t0() + Duration::hours(3);
    assert_eq!(first.completed_at, Some(t2));

    for step in ["discussion", "survey"] {
        h.advance(Duration::hours(1));
        h.service.mark_step(TEST_USER, mark(&h, step)).await.unwrap();
        let later = current_view(&h).await;
        assert_eq!(later.completed_at, Some(t2));
    }

    // Still completed long after the deadline
    h.advance(Duration::days(10));
    let late = current_view(&h).await;
    assert!(late.is_completed);
    assert!(late.is_expired);
    assert!(!late.success);
    assert_eq!(late.completed_at, Some(t2));
}

#[tokio::test]
async fn test_status_before_start() {
    let h = TestHarness::new();
    let status = h.service.challenge_status(TEST_USER, &h.idea_id()).await.unwrap();
    assert!(!status.challenge_started);
    assert!(status.challenge.is_none());
    assert_eq!(status.message.as_deref(), Some("No challenge started for this idea"));

    let direct = h
        .service
        .challenge_evaluator()
        .status(&test_user(), &h.idea.id)
        .await
        .unwrap();
    assert_eq!(direct, ChallengeStatus::NotStarted);
}

#[tokio::test]
async fn test_custom_rules_from_config() {
    let config = ClarityConfig::default()
        .with_challenge_hours(24)
        .with_required_steps(2);
    let h = TestHarness::with_generator(config, Arc::new(ScriptedGenerator::new("m")));

    let started = h.service.start_challenge(TEST_USER, start(&h)).await.unwrap();
    assert_eq!(started.challenge.end_time, t0() + Duration::hours(24));
    assert_eq!(started.challenge.required_steps, 2);

    h.service.mark_step(TEST_USER, mark(&h, "landing")).await.unwrap();
    h.service.mark_step(TEST_USER, mark(&h, "discussion")).await.unwrap();
    let view = current_view(&h).await;
    assert!(view.is_completed);
}

#[tokio::test]
async fn test_unvalidated_huge_window_does_not_overflow() {
    let config = ClarityConfig::default().with_challenge_hours(u32::MAX);
    assert!(config.validate().is_err());
    let h = TestHarness::with_generator(config, Arc::new(ScriptedGenerator::new("m")));

    let started = h.service.start_challenge(TEST_USER, start(&h)).await.unwrap();
    assert_eq!(started.challenge.end_time, chrono::DateTime::<chrono::Utc>::MAX_UTC);
    assert!(!started.challenge.is_expired);

    h.advance(Duration::days(365));
    let view = current_view(&h).await;
    assert!(!view.is_expired);
    assert!(view.time_remaining_seconds > 0);
}
