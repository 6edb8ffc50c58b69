use chrono::Duration;
use clarity_core::{
    allowed_transitions, evaluate, ChallengePhase, ChallengeRules, ChallengeStatus,
    ProgressSnapshot,
};
use clarity_model::{
    Challenge, ChallengeKey, IdeaId, ProgressKey, ProgressRecord, UserId, ValidationStep,
};
use clarity_test_utils::{t0, test_user, TestHarness};
use proptest::prelude::*;

fn snapshot_of(steps: &[ValidationStep]) -> ProgressSnapshot {
    let user = UserId::new("prop-user").unwrap();
    let idea = IdeaId::new_v4();
    let records: Vec<ProgressRecord> = steps
        .iter()
        .map(|s| ProgressRecord::completed(ProgressKey::new(user.clone(), idea, *s), t0()))
        .collect();
    ProgressSnapshot::from_records(&records)
}

fn any_step() -> impl Strategy<Value = ValidationStep> {
    prop_oneof![
        Just(ValidationStep::Landing),
        Just(ValidationStep::Tweet),
        Just(ValidationStep::Competitor),
        Just(ValidationStep::Discussion),
        Just(ValidationStep::Survey),
    ]
}

#[derive(Debug, Clone)]
enum Action {
    Advance(i64),
    Mark(ValidationStep),
    Status,
}

fn any_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        (1i64..20 * 3600).prop_map(Action::Advance),
        any_step().prop_map(Action::Mark),
        Just(Action::Status),
    ]
}

proptest! {
    #[test]
    fn prop_percentage_matches_rounded_ratio(
        steps in proptest::collection::vec(any_step(), 0..12),
    ) {
        let snap = snapshot_of(&steps);
        let distinct = snap.completed_steps;
        prop_assert!(distinct <= 5);
        let expected = match distinct { 0 => 0, 1 => 20, 2 => 40, 3 => 60, 4 => 80, _ => 100 };
        prop_assert_eq!(snap.completion_percentage, expected);
    }

    #[test]
    fn prop_never_completes_below_threshold(
        steps in proptest::collection::vec(any_step(), 0..3),
        offset_secs in 0i64..60 * 3600,
    ) {
        let snap = snapshot_of(&steps);
        prop_assume!(snap.completed_steps < 3);
        let challenge = Challenge::start(ChallengeKey::new(test_user(), IdeaId::new_v4()), t0());
        let now = t0() + Duration::seconds(offset_secs);
        let eval = evaluate(&challenge, &snap, now, &ChallengeRules::default());
        prop_assert!(eval.completion.is_none());
        prop_assert!(!eval.view.success);
        prop_assert!(!eval.view.is_completed);
    }

    #[test]
    fn prop_remaining_time_is_clamped(offset_secs in -3600i64..100 * 3600) {
        let challenge = Challenge::start(ChallengeKey::new(test_user(), IdeaId::new_v4()), t0());
        let now = t0() + Duration::seconds(offset_secs);
        let eval = evaluate(&challenge, &snapshot_of(&[]), now, &ChallengeRules::default());
        prop_assert!(eval.view.time_remaining_seconds >= 0);
        prop_assert!(eval.view.time_remaining_seconds <= 48 * 3600 + 3600);
        prop_assert_eq!(eval.view.is_expired, eval.view.time_remaining_seconds == 0);
    }

    #[test]
    fn prop_observed_phases_follow_state_machine(
        actions in proptest::collection::vec(any_action(), 1..40),
    ) {
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        rt.block_on(async {
            let h = TestHarness::new();
            let user = test_user();
            let evaluator = h.service.challenge_evaluator();
            let tracker = h.service.progress_tracker();

            let mut last = ChallengePhase::NotStarted;
            let initial = evaluator.status(&user, &h.idea.id).await.unwrap();
            prop_assert_eq!(initial, ChallengeStatus::NotStarted);

            evaluator.start(&user, &h.idea.id).await.unwrap();
            let mut completed_at = None;

            for action in actions {
                match action {
                    Action::Advance(secs) => h.advance(Duration::seconds(secs)),
                    Action::Mark(step) => {
                        tracker.mark_completed(&user, &h.idea.id, step).await.unwrap();
                    }
                    Action::Status => {
                        let status = evaluator.status(&user, &h.idea.id).await.unwrap();
                        let ChallengeStatus::Started(view) = status else {
                            return Err(TestCaseError::fail("challenge vanished"));
                        };
                        let phase = view.phase();
                        prop_assert!(
                            phase == last
                                || allowed_transitions(last).contains(&phase)
                                || (last == ChallengePhase::NotStarted
                                    && phase != ChallengePhase::NotStarted),
                            "illegal transition {:?} -> {:?}", last, phase
                        );
                        if phase == ChallengePhase::Completed {
                            prop_assert!(view.completed_steps >= 3);
                            match completed_at {
                                None => completed_at = view.completed_at,
                                Some(at) => prop_assert_eq!(view.completed_at, Some(at)),
                            }
                        }
                        last = phase;
                    }
                }
            }
            Ok(())
        })?;
    }
}
