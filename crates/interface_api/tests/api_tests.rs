//! HTTP API tests against the in-memory claim store

use std::str::FromStr;
use std::sync::Arc;

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::{TestRequest, TestServer};
use base64::Engine as _;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use domain_claims::{ClaimStatus, MockDamageAssessor, GENERIC_FAILURE_MESSAGE};
use interface_api::auth::{create_token, permissions};
use interface_api::config::ApiConfig;
use interface_api::create_router;
use test_utils::{AiAssessmentFixtures, InMemoryClaimStore, TestClaimBuilder, UploadFixtures};

struct Harness {
    server: TestServer,
    store: InMemoryClaimStore,
    config: ApiConfig,
}

impl Harness {
    async fn new(claims: Vec<domain_claims::Claim>) -> Self {
        Self::with_config(claims, ApiConfig::default()).await
    }

    async fn with_config(claims: Vec<domain_claims::Claim>, config: ApiConfig) -> Self {
        let store = InMemoryClaimStore::with_claims(claims).await;
        let config = ApiConfig {
            jwt_secret: "api-test-secret".to_string(),
            ..config
        };
        let app = create_router(
            Arc::new(store.clone()),
            Arc::new(MockDamageAssessor::default()),
            config.clone(),
        );
        Self {
            server: TestServer::new(app).unwrap(),
            store,
            config,
        }
    }

    fn token(&self, roles: &[&str]) -> HeaderValue {
        let roles = roles.iter().map(|r| r.to_string()).collect();
        let token = create_token("agent-42", roles, &self.config.jwt_secret, 300).unwrap();
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
    }

    fn agent(&self, request: TestRequest) -> TestRequest {
        request.add_header(
            header::AUTHORIZATION,
            self.token(&[permissions::CLAIM_READ, permissions::CLAIM_WRITE]),
        )
    }

    async fn create_claim(&self) -> String {
        let created = self
            .agent(self.server.post("/api/v1/claims"))
            .json(&new_claim_body())
            .await;
        created.assert_status(StatusCode::CREATED);
        created.json::<Value>()["claim"]["id"].as_str().unwrap().to_string()
    }

    fn approver(&self, request: TestRequest) -> TestRequest {
        request.add_header(
            header::AUTHORIZATION,
            self.token(&[permissions::CLAIM_READ, permissions::CLAIM_APPROVE]),
        )
    }
}

fn new_claim_body() -> Value {
    json!({
        "policy_number": "POL-2024-001234",
        "claimant_name": "Jane Doe",
        "policyholder_email": "jane.doe@example.com",
        "accident_date": "2024-03-14",
        "vehicle_make": "Honda",
        "vehicle_model": "Civic",
        "vehicle_year": 2020,
        "incident_description": "Side-swiped in a parking lot"
    })
}

fn photos_body(uploads: &[domain_claims::PhotoUpload]) -> Value {
    let photos: Vec<Value> = uploads
        .iter()
        .map(|u| {
            json!({
                "file_name": u.file_name,
                "content_type": u.content_type,
                "data": base64::engine::general_purpose::STANDARD.encode(&u.data),
            })
        })
        .collect();
    json!({ "photos": photos })
}

fn decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().expect("decimal as string")).unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let h = Harness::new(vec![]).await;
    h.server.get("/health").await.assert_status_ok();
    h.server.get("/health/ready").await.assert_status_ok();
}

#[tokio::test]
async fn readiness_fails_when_store_is_unhealthy() {
    let h = Harness::new(vec![]).await;
    h.store.fail_reads(true);
    h.server
        .get("/health/ready")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn requests_without_token_are_unauthorized() {
    let h = Harness::new(vec![]).await;
    h.server
        .get("/api/v1/claims")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn full_intake_submits_claim_for_review() {
    let h = Harness::new(vec![]).await;

    let created = h
        .agent(h.server.post("/api/v1/claims"))
        .json(&new_claim_body())
        .await;
    created.assert_status(StatusCode::CREATED);
    let created: Value = created.json();
    assert_eq!(created["claim"]["status"], "in_progress");
    assert_eq!(created["intake"]["stage"], "awaiting_photos");
    let id = created["claim"]["id"].as_str().unwrap().to_string();

    let assessed: Value = h
        .agent(h.server.post(&format!("/api/v1/claims/{}/intake/photos", id)))
        .json(&photos_body(&UploadFixtures::pngs(2)))
        .await
        .json();
    let photos = assessed["photos"].as_array().unwrap();
    assert_eq!(photos.len(), 2);
    for photo in photos {
        assert!(photo["damages"].as_array().unwrap().len() >= 2);
        assert!(photo["displayUrl"].as_str().unwrap().starts_with("data:image/png"));
    }

    let damage_id = photos[0]["damages"][0]["id"].as_str().unwrap().to_string();
    let adjusted: Value = h
        .agent(h.server.put(&format!(
            "/api/v1/claims/{}/intake/photos/0/damages/{}",
            id, damage_id
        )))
        .json(&json!({ "cost": "$1,000", "reason": "Body shop quote" }))
        .await
        .json();
    assert_eq!(adjusted["summary"]["adjusted_count"], 1);
    assert_eq!(decimal(&adjusted["photos"][0]["damages"][0]["adjustedCost"]), Decimal::from(1000));

    let reviewed: Value = h
        .agent(h.server.post(&format!("/api/v1/claims/{}/intake/review", id)))
        .await
        .json();
    assert_eq!(reviewed["stage"], "reviewing");

    let submitted = h
        .agent(h.server.post(&format!("/api/v1/claims/{}/intake/submit", id)))
        .await;
    submitted.assert_status_ok();
    let submitted: Value = submitted.json();
    assert_eq!(submitted["claim"]["status"], "under_review");
    assert_eq!(
        decimal(&submitted["claim"]["estimated_repair_cost"]),
        decimal(&submitted["summary"]["total_adjusted"])
    );

    h.agent(h.server.get(&format!("/api/v1/claims/{}/intake", id)))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let detail: Value = h
        .agent(h.server.get(&format!("/api/v1/claims/{}", id)))
        .await
        .json();
    assert_eq!(detail["history"].as_array().unwrap().len(), 1);
    assert_eq!(detail["assessment"]["photos"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn failed_submission_keeps_draft_in_review() {
    let h = Harness::new(vec![]).await;
    let created: Value = h
        .agent(h.server.post("/api/v1/claims"))
        .json(&new_claim_body())
        .await
        .json();
    let id = created["claim"]["id"].as_str().unwrap().to_string();

    h.agent(h.server.post(&format!("/api/v1/claims/{}/intake/photos", id)))
        .json(&photos_body(&UploadFixtures::pngs(1)))
        .await
        .assert_status_ok();
    h.agent(h.server.post(&format!("/api/v1/claims/{}/intake/review", id)))
        .await
        .assert_status_ok();

    h.store.fail_writes(true);
    let failed = h
        .agent(h.server.post(&format!("/api/v1/claims/{}/intake/submit", id)))
        .await;
    failed.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(failed.json::<Value>()["message"], GENERIC_FAILURE_MESSAGE);

    let draft: Value = h
        .agent(h.server.get(&format!("/api/v1/claims/{}/intake", id)))
        .await
        .json();
    assert_eq!(draft["stage"], "reviewing");
}

#[tokio::test]
async fn non_image_upload_is_rejected() {
    let h = Harness::new(vec![]).await;
    let created: Value = h
        .agent(h.server.post("/api/v1/claims"))
        .json(&new_claim_body())
        .await
        .json();
    let id = created["claim"]["id"].as_str().unwrap().to_string();

    h.agent(h.server.post(&format!("/api/v1/claims/{}/intake/photos", id)))
        .json(&photos_body(&[UploadFixtures::pdf("estimate.pdf")]))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn missing_required_fields_are_rejected() {
    let h = Harness::new(vec![]).await;
    let mut body = new_claim_body();
    body["claimant_name"] = json!("");

    h.agent(h.server.post("/api/v1/claims"))
        .json(&body)
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn approval_requires_approve_role() {
    let claim = TestClaimBuilder::new()
        .with_status(ClaimStatus::UnderReview)
        .build();
    let id = claim.id.as_uuid().to_string();
    let h = Harness::new(vec![claim]).await;
    let path = format!("/api/v1/claims/{}/status", id);

    h.agent(h.server.put(&path))
        .json(&json!({ "status": "approved" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let approved = h.approver(h.server.put(&path)).json(&json!({ "status": "approved" })).await;
    approved.assert_status_ok();
    let approved: Value = approved.json();
    assert_eq!(approved["status"], "approved");
    assert_eq!(approved["reviewed_by"], "agent-42");
}

#[tokio::test]
async fn illegal_transition_is_conflict() {
    let claim = TestClaimBuilder::new().with_status(ClaimStatus::Approved).build();
    let id = claim.id.as_uuid().to_string();
    let h = Harness::new(vec![claim]).await;

    h.agent(h.server.put(&format!("/api/v1/claims/{}/status", id)))
        .json(&json!({ "status": "in_progress" }))
        .await
        .assert_status(StatusCode::CONFLICT);
    assert_eq!(h.store.history_len().await, 0);
}

#[tokio::test]
async fn store_failure_leaves_status_unchanged() {
    let claim = TestClaimBuilder::new().build();
    let id = claim.id.as_uuid().to_string();
    let h = Harness::new(vec![claim]).await;

    h.store.fail_writes(true);
    let failed = h
        .agent(h.server.put(&format!("/api/v1/claims/{}/status", id)))
        .json(&json!({ "status": "under_review" }))
        .await;
    failed.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(failed.json::<Value>()["message"], GENERIC_FAILURE_MESSAGE);

    h.store.fail_writes(false);
    let detail: Value = h
        .agent(h.server.get(&format!("/api/v1/claims/{}", id)))
        .await
        .json();
    assert_eq!(detail["claim"]["status"], "in_progress");
}

#[tokio::test]
async fn actions_reflect_current_status() {
    let claim = TestClaimBuilder::new().with_status(ClaimStatus::Rejected).build();
    let id = claim.id.as_uuid().to_string();
    let h = Harness::new(vec![claim]).await;

    let actions: Value = h
        .agent(h.server.get(&format!("/api/v1/claims/{}/actions", id)))
        .await
        .json();
    assert_eq!(actions["status_label"], "Claim Returned");
    assert_eq!(actions["can_edit"], true);
    assert!(actions["actions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn reopening_returned_claim_records_history() {
    let claim = TestClaimBuilder::new().with_status(ClaimStatus::Rejected).build();
    let id = claim.id.as_uuid().to_string();
    let h = Harness::new(vec![claim]).await;

    let intake = h
        .agent(h.server.post(&format!("/api/v1/claims/{}/intake", id)))
        .await;
    intake.assert_status(StatusCode::CREATED);
    assert_eq!(intake.json::<Value>()["mode"], "edit");

    let history: Value = h
        .agent(h.server.get(&format!("/api/v1/claims/{}/history", id)))
        .await
        .json();
    assert_eq!(history[0]["action"], "assessment_reopened");
}

#[tokio::test]
async fn restarting_open_intake_records_reopen_once() {
    let claim = TestClaimBuilder::new().with_status(ClaimStatus::Rejected).build();
    let id = claim.id.as_uuid().to_string();
    let h = Harness::new(vec![claim]).await;

    for _ in 0..3 {
        h.agent(h.server.post(&format!("/api/v1/claims/{}/intake", id)))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let history: Value = h
        .agent(h.server.get(&format!("/api/v1/claims/{}/history", id)))
        .await
        .json();
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["action"], "assessment_reopened");
}

#[tokio::test]
async fn resubmitting_returned_claim_moves_it_back_to_review() {
    let claim = TestClaimBuilder::new()
        .with_status(ClaimStatus::Rejected)
        .with_estimated_cost(Decimal::from(99))
        .build();
    let id = claim.id.as_uuid().to_string();
    let h = Harness::new(vec![claim]).await;
    let intake = format!("/api/v1/claims/{}/intake", id);

    h.agent(h.server.post(&intake))
        .await
        .assert_status(StatusCode::CREATED);
    h.agent(h.server.post(&format!("{}/photos", intake)))
        .json(&photos_body(&UploadFixtures::pngs(1)))
        .await
        .assert_status_ok();
    let reviewed: Value = h
        .agent(h.server.post(&format!("{}/review", intake)))
        .await
        .json();
    let total = decimal(&reviewed["total"]);

    let submitted = h.agent(h.server.post(&format!("{}/submit", intake))).await;
    submitted.assert_status_ok();
    let submitted: Value = submitted.json();
    assert_eq!(submitted["claim"]["status"], "under_review");
    assert_eq!(decimal(&submitted["claim"]["estimated_repair_cost"]), total);
    assert_ne!(total, Decimal::from(99));

    let history: Value = h
        .agent(h.server.get(&format!("/api/v1/claims/{}/history", id)))
        .await
        .json();
    let actions: Vec<&str> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["action"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["assessment_submitted", "assessment_reopened"]);
}

#[tokio::test]
async fn phone_sized_photo_is_accepted() {
    let h = Harness::new(vec![]).await;
    let id = h.create_claim().await;

    let uploaded = h
        .agent(h.server.post(&format!("/api/v1/claims/{}/intake/photos", id)))
        .json(&photos_body(&[UploadFixtures::large_jpeg("phone.jpg", 3 * 1024 * 1024)]))
        .await;
    uploaded.assert_status_ok();
    let uploaded: Value = uploaded.json();
    assert_eq!(uploaded["photos"].as_array().unwrap().len(), 1);
    assert!(uploaded["photos"][0]["displayUrl"]
        .as_str()
        .unwrap()
        .starts_with("data:image/jpeg"));
}

#[tokio::test]
async fn upload_over_configured_limit_is_rejected() {
    let config = ApiConfig {
        max_upload_bytes: 64 * 1024,
        ..ApiConfig::default()
    };
    let h = Harness::with_config(vec![], config).await;
    let id = h.create_claim().await;

    h.agent(h.server.post(&format!("/api/v1/claims/{}/intake/photos", id)))
        .json(&photos_body(&[UploadFixtures::large_jpeg("phone.jpg", 128 * 1024)]))
        .await
        .assert_status(StatusCode::PAYLOAD_TOO_LARGE);

    let draft: Value = h
        .agent(h.server.get(&format!("/api/v1/claims/{}/intake", id)))
        .await
        .json();
    assert_eq!(draft["stage"], "awaiting_photos");
}

#[tokio::test]
async fn ai_assessments_are_newest_first() {
    let claim = TestClaimBuilder::new().build();
    let claim_id = claim.id;
    let id = claim.id.as_uuid().to_string();
    let h = Harness::new(vec![claim]).await;
    h.store
        .insert_ai_assessment(AiAssessmentFixtures::record(claim_id, "damage-v1", 48))
        .await;
    h.store
        .insert_ai_assessment(AiAssessmentFixtures::record(claim_id, "damage-v2", 1))
        .await;

    let records: Value = h
        .agent(h.server.get(&format!("/api/v1/claims/{}/ai-assessments", id)))
        .await
        .json();
    assert_eq!(records.as_array().unwrap().len(), 2);
    assert_eq!(records[0]["ai_model_version"], "damage-v2");
    assert_eq!(records[1]["ai_model_version"], "damage-v1");

    let detail: Value = h
        .agent(h.server.get(&format!("/api/v1/claims/{}", id)))
        .await
        .json();
    assert_eq!(detail["ai_assessments"][0]["ai_model_version"], "damage-v2");
    assert_eq!(detail["ai_assessments"][0]["damage_severity"], "moderate");
}

#[tokio::test]
async fn approved_claim_cannot_be_edited() {
    let claim = TestClaimBuilder::new().with_status(ClaimStatus::Approved).build();
    let id = claim.id.as_uuid().to_string();
    let h = Harness::new(vec![claim]).await;

    h.agent(h.server.post(&format!("/api/v1/claims/{}/intake", id)))
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn listing_filters_and_counts() {
    let h = Harness::new(vec![
        TestClaimBuilder::new()
            .with_claim_number("CLM-2024-2001")
            .with_vehicle("Honda", "Civic")
            .build(),
        TestClaimBuilder::new()
            .with_claim_number("CLM-2024-2002")
            .with_vehicle("Ford", "Focus")
            .with_status(ClaimStatus::Approved)
            .build(),
    ])
    .await;

    let approved: Value = h
        .agent(h.server.get("/api/v1/claims").add_query_param("status", "approved"))
        .await
        .json();
    assert_eq!(approved.as_array().unwrap().len(), 1);
    assert_eq!(approved[0]["vehicle_make"], "Ford");

    let searched: Value = h
        .agent(h.server.get("/api/v1/claims").add_query_param("search", "CIVIC"))
        .await
        .json();
    assert_eq!(searched[0]["claim_number"], "CLM-2024-2001");

    h.agent(h.server.get("/api/v1/claims").add_query_param("status", "closed"))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let stats: Value = h.agent(h.server.get("/api/v1/claims/stats")).await.json();
    assert_eq!(stats["total"], 2);
}

#[tokio::test]
async fn notes_are_validated_and_listed() {
    let claim = TestClaimBuilder::new().build();
    let id = claim.id.as_uuid().to_string();
    let h = Harness::new(vec![claim]).await;
    let path = format!("/api/v1/claims/{}/notes", id);

    h.agent(h.server.post(&path))
        .json(&json!({ "note_text": "   " }))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let created = h
        .agent(h.server.post(&path))
        .json(&json!({ "note_text": "Called the body shop" }))
        .await;
    created.assert_status(StatusCode::CREATED);
    assert_eq!(created.json::<Value>()["note_type"], "general");

    let notes: Value = h.agent(h.server.get(&path)).await.json();
    assert_eq!(notes.as_array().unwrap().len(), 1);
    assert_eq!(notes[0]["created_by"], "agent-42");
}

#[tokio::test]
async fn unknown_claim_is_not_found() {
    let h = Harness::new(vec![]).await;
    h.agent(h.server.get(&format!("/api/v1/claims/{}", random_claim_id())))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

fn random_claim_id() -> String {
    core_kernel::ClaimId::new().as_uuid().to_string()
}
