use chrono::Duration;
use clarity_core::api::{IdeaRequest, MarkStepRequest, RoadmapUpdateRequest};
use clarity_core::{ClarityConfig, ClarityService, ErrorKind, ServiceDeps};
use clarity_model::IdeaId;
use clarity_store::{InMemoryCatalog, ManualClock};
use clarity_test_utils::{sample_ideas, t0, ScriptedGenerator, TestHarness, TEST_USER};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn roadmap_change(h: &TestHarness, step: &str, completed: bool) -> RoadmapUpdateRequest {
    RoadmapUpdateRequest {
        idea_id: h.idea_id(),
        step_name: step.to_string(),
        completed,
        notes: None,
        link: None,
    }
}

#[tokio::test]
async fn test_invalid_step_rejected_before_storage() {
    let h = TestHarness::new();
    let err = h
        .service
        .mark_step(
            TEST_USER,
            MarkStepRequest {
                idea_id: h.idea_id(),
                step: "launch".to_string(),
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.status(), 400);
    assert_eq!(
        serde_json::to_value(&err).unwrap(),
        json!({
            "success": false,
            "kind": "invalid_argument",
            "message": concat!(
                "invalid argument: invalid step 'launch': ",
                "expected one of landing, tweet, competitor, discussion, survey"
            ),
        })
    );
    assert!(h.progress.is_empty());
}

#[tokio::test]
async fn test_malformed_identifiers() {
    let h = TestHarness::new();

    let err = h.service.progress(TEST_USER, "42").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
    assert!(err.message.contains("expected a UUID"));

    let err = h.service.progress("   ", &h.idea_id()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
    assert_eq!(err.message, "invalid argument: user id must not be empty");

    let err = h
        .service
        .update_roadmap(TEST_USER, roadmap_change(&h, " ", true))
        .await
        .unwrap_err();
    assert_eq!(err.status(), 400);
}

#[tokio::test]
async fn test_progress_payload_shape() {
    let h = TestHarness::new();
    let body = h
        .service
        .mark_step(
            TEST_USER,
            MarkStepRequest {
                idea_id: h.idea_id(),
                step: "survey".to_string(),
            },
        )
        .await
        .unwrap();

    let json = serde_json::to_value(&body).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Step marked as completed");
    assert_eq!(json["progress"]["total_steps"], 5);
    assert_eq!(json["progress"]["completed_steps"], 1);
    assert_eq!(json["progress"]["completion_percentage"], 20);
    assert_eq!(json["progress"]["steps"]["survey"]["completed"], true);
    assert_eq!(json["progress"]["steps"]["landing"]["completed"], false);
    assert!(json["progress"]["steps"]["landing"]["completed_at"].is_null());
}

#[tokio::test]
async fn test_status_payload_omits_absent_fields() {
    let h = TestHarness::new();
    let body = h.service.challenge_status(TEST_USER, &h.idea_id()).await.unwrap();
    assert_eq!(
        serde_json::to_value(&body).unwrap(),
        json!({
            "challenge_started": false,
            "message": "No challenge started for this idea",
        })
    );

    h.service
        .start_challenge(TEST_USER, IdeaRequest { idea_id: h.idea_id() })
        .await
        .unwrap();
    let status = h.service.challenge_status(TEST_USER, &h.idea_id()).await.unwrap();
    let json = serde_json::to_value(status).unwrap();
    assert_eq!(json["challenge_started"], true);
    assert!(json.get("message").is_none());
    assert_eq!(json["challenge"]["time_remaining_seconds"], 48 * 3600);
    assert_eq!(json["challenge"]["required_steps"], 3);
}

#[tokio::test]
async fn test_roadmap_payload_and_summary() {
    let h = TestHarness::new();
    h.service
        .update_roadmap(TEST_USER, roadmap_change(&h, "Build MVP", false))
        .await
        .unwrap();
    h.advance(Duration::minutes(1));
    let ack = h
        .service
        .update_roadmap(
            TEST_USER,
            RoadmapUpdateRequest {
                notes: Some("Posted in r/devtools".to_string()),
                link: Some("https://example.com/post".to_string()),
                ..roadmap_change(&h, "Share on Reddit", true)
            },
        )
        .await
        .unwrap();
    assert_eq!(ack.message, "Roadmap step updated successfully");

    let body = h.service.roadmap(TEST_USER, &h.idea_id()).await.unwrap();
    let json = serde_json::to_value(&body).unwrap();
    assert_eq!(
        json["summary"],
        json!({ "total_steps": 2, "completed_steps": 1, "completion_percentage": 50 })
    );
    assert_eq!(json["roadmap"][0]["step_name"], "Build MVP");
    assert_eq!(json["roadmap"][0]["completed"], false);
    assert_eq!(json["roadmap"][1]["notes"], "Posted in r/devtools");
    assert_eq!(body.roadmap[1].completed_at, Some(t0() + Duration::minutes(1)));
}

#[tokio::test]
async fn test_generation_payload_field_names() {
    let generator = Arc::new(
        ScriptedGenerator::new("m")
            .then_ok("Shipping DevLog today!")
            .then_ok(r#"```json
[{"name": "Keep a Changelog", "description": "Manual", "strengths": [], "weaknesses": []}]
```"#),
    );
    let h = TestHarness::with_generator(ClarityConfig::default(), generator);

    let tweet = h
        .service
        .generate(TEST_USER, &h.idea_id(), clarity_model::ArtifactKind::Tweet)
        .await
        .unwrap();
    assert_eq!(
        serde_json::to_value(&tweet).unwrap(),
        json!({ "tweet": "Shipping DevLog today!", "cached": false })
    );

    let competitors = h
        .service
        .generate(TEST_USER, &h.idea_id(), clarity_model::ArtifactKind::Competitors)
        .await
        .unwrap();
    let json = serde_json::to_value(&competitors).unwrap();
    assert_eq!(json["competitors"][0]["name"], "Keep a Changelog");
    assert!(json.get("mock").is_none());

    let again = h
        .service
        .generate(TEST_USER, &h.idea_id(), clarity_model::ArtifactKind::Tweet)
        .await
        .unwrap();
    assert_eq!(serde_json::to_value(&again).unwrap()["cached"], true);
}

#[tokio::test]
async fn test_saved_ideas_flow() {
    let h = TestHarness::new();
    let request = || IdeaRequest { idea_id: h.idea_id() };

    let first = h.service.save_idea(TEST_USER, request()).await.unwrap();
    assert!(first.saved);
    assert_eq!(first.message, "Idea saved successfully");
    let second = h.service.save_idea(TEST_USER, request()).await.unwrap();
    assert!(!second.saved);
    assert_eq!(second.message, "Idea already saved");

    let list = serde_json::to_value(h.service.saved_ideas(TEST_USER).await.unwrap()).unwrap();
    assert_eq!(list["count"], 1);
    assert_eq!(list["ideas"][0]["title"], "DevLog");
    assert_eq!(list["ideas"][0]["saved_at"], json!(t0()));

    let removed = h.service.unsave_idea(TEST_USER, &h.idea_id()).await.unwrap();
    assert!(removed.removed);
    let again = h.service.unsave_idea(TEST_USER, &h.idea_id()).await.unwrap();
    assert!(!again.removed);
    assert_eq!(again.message, "Idea was not saved");
    assert_eq!(h.service.saved_ideas(TEST_USER).await.unwrap().count, 0);

    let err = h
        .service
        .save_idea(
            TEST_USER,
            IdeaRequest {
                idea_id: IdeaId::new_v4().to_string(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(err.status(), 404);
}

#[tokio::test]
async fn test_idea_wall_orders_by_demand() {
    let deps = ServiceDeps::in_memory(
        Arc::new(InMemoryCatalog::with_ideas(sample_ideas())),
        Arc::new(ScriptedGenerator::new("m")),
        Arc::new(ManualClock::new(t0())),
    );
    let service = ClarityService::new(deps, &ClarityConfig::default());

    let wall = service.idea_wall().await.unwrap();
    assert_eq!(wall.count, 3);
    let titles: Vec<&str> = wall.ideas.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["InvoiceBot", "DevLog", "StandupSync"]);
}
