//! End-to-end router tests over the in-memory store

mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use common::TestApp;
use diabscreen_core::{RiskClassifier, ScoringStrategy};

#[tokio::test]
async fn health_reports_strategy() {
    let app = TestApp::new();
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["strategy"], "rule_based");

    let (status, body) = app.get("/test-db").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn diagnosis_matches_first_rule() {
    let app = TestApp::new();
    let (status, body) = app
        .post_json(
            "/api/diagnosis/process",
            json!({ "fullName": "Siti Aminah", "age": 52, "symptoms": ["G01", "G02", "G06"] }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["riskTier"], "High");
    assert_eq!(body["matchedRule"], "R1");
    assert_eq!(body["score"].as_f64(), Some(115.0));
    assert_eq!(body["symptoms"], json!(["G01", "G02", "G06"]));
    assert_eq!(
        body["diagnosis"],
        "Based on the reported symptoms, you have a high risk of developing diabetes."
    );
    assert_eq!(body["recommendations"].as_array().map(Vec::len), Some(3));
    assert!(body["diagnosisId"].is_i64());
    assert!(body["userId"].is_i64());
}

#[tokio::test]
async fn missing_symptoms_is_low_risk() {
    let app = TestApp::new();
    let (status, body) = app.post_json("/diagnosis", json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["riskTier"], "Low");
    assert_eq!(body["score"].as_f64(), Some(40.0));
    assert_eq!(body["matchedRule"], serde_json::Value::Null);
    assert_eq!(body["userId"], serde_json::Value::Null);
    assert_eq!(body["symptoms"], json!([]));
}

#[tokio::test]
async fn non_array_symptoms_are_ignored() {
    let app = TestApp::new();
    let (status, body) = app
        .post_json("/diagnosis", json!({ "symptoms": "G01,G02" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["riskTier"], "Low");
    assert_eq!(body["symptoms"], json!([]));
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = TestApp::new();
    let (status, body) = app.post_raw("/api/diagnosis/process", "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());

    let (_, stats) = app.get("/api/stats").await;
    assert_eq!(stats["total_diagnoses"], 0);
}

#[tokio::test]
async fn indonesian_form_fields() {
    let app = TestApp::new();
    let (status, body) = app
        .post_json(
            "/diagnosa",
            json!({
                "nama_lengkap": "Budi",
                "usia": "40",
                "jenis_kelamin": "L",
                "gejala": ["G02", "G03"]
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["riskTier"], "Medium");
    assert_eq!(body["matchedRule"], "R3");

    let (_, users) = app.get("/api/users").await;
    assert_eq!(users[0]["full_name"], "Budi");
    assert_eq!(users[0]["age"], 40);
    assert_eq!(users[0]["gender"], "L");
}

#[tokio::test]
async fn proportional_strategy() {
    let app = TestApp::with_strategy(ScoringStrategy::Proportional);
    let (status, body) = app
        .post_json("/api/diagnosis/process", json!({ "symptoms": ["G01", "G02", "G03"] }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["riskTier"], "Medium");
    assert_eq!(body["score"].as_f64(), Some(60.0));
    assert_eq!(body["strategy"], "proportional");
    assert_eq!(body["matchedRule"], serde_json::Value::Null);
}

#[tokio::test]
async fn declared_count_without_codes_is_low_risk() {
    let app = TestApp::with_strategy(ScoringStrategy::Proportional);
    let (status, body) = app
        .post_json("/diagnosis", json!({ "symptoms": "junk", "symptomCount": 5 }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["riskTier"], "Low");
    assert_eq!(body["score"].as_f64(), Some(0.0));
    assert_eq!(body["symptoms"], json!([]));
}

#[tokio::test]
async fn submitted_codes_reach_classifier_verbatim() {
    let app = TestApp::new();
    let classifier = RiskClassifier::new(ScoringStrategy::RuleBased);

    for codes in [vec![" G01 "], vec!["", "G01"], vec!["G01", " G06", "G02"]] {
        let (status, body) = app
            .post_json("/diagnosis", json!({ "symptoms": codes.clone() }))
            .await;
        let expected = classifier.classify_codes(codes.clone());

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["score"].as_f64(), Some(expected.score), "{:?}", codes);
        assert_eq!(body["riskTier"], expected.risk_tier.as_str(), "{:?}", codes);
        assert_eq!(body["matchedRule"], json!(expected.matched_rule), "{:?}", codes);
        assert_eq!(body["symptoms"], json!(codes));
    }

    let (_, padded) = app.post_json("/diagnosis", json!({ "symptoms": [" G01 "] })).await;
    assert_eq!(padded["riskTier"], "Low");
    assert_eq!(padded["score"].as_f64(), Some(40.0));

    let (_, blank_first) = app.post_json("/diagnosis", json!({ "symptoms": ["", "G01"] })).await;
    assert_eq!(blank_first["matchedRule"], "R5");
    assert_eq!(blank_first["score"].as_f64(), Some(65.0));
}

#[tokio::test]
async fn diagnosis_is_persisted() {
    let app = TestApp::new();
    let (_, first) = app
        .post_json("/api/diagnosis/process", json!({ "fullName": "Ani", "symptoms": ["G01"] }))
        .await;
    let (_, second) = app
        .post_json("/api/diagnosis/process", json!({ "fullName": "Ani", "symptoms": ["G05"] }))
        .await;

    // Same name resolves to the same user
    assert_eq!(first["userId"], second["userId"]);

    let (status, diagnoses) = app.get("/api/diagnoses").await;
    assert_eq!(status, StatusCode::OK);
    let diagnoses = diagnoses.as_array().unwrap();
    assert_eq!(diagnoses.len(), 2);
    assert_eq!(diagnoses[0]["id"], second["diagnosisId"]);
    assert_eq!(diagnoses[1]["risk_tier"], "Medium");

    let (_, limited) = app.get("/api/diagnoses?limit=1").await;
    assert_eq!(limited.as_array().map(Vec::len), Some(1));

    let (_, stats) = app.get("/api/stats").await;
    assert_eq!(stats["total_users"], 1);
    assert_eq!(stats["total_diagnoses"], 2);
    assert_eq!(stats["total_symptoms"], 6);
    assert_eq!(stats["total_recommendations"], 5);

    let id = first["diagnosisId"].as_i64().unwrap();
    let (_, rows) = app
        .get(&format!("/api/user-symptoms?diagnosis_id={}", id))
        .await;
    assert_eq!(rows[0]["symptom_code"], "G01");
}

#[tokio::test]
async fn symptom_crud() {
    let app = TestApp::new();
    let (status, body) = app.get("/gejala").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(6));

    let (status, _) = app
        .post_json(
            "/api/symptoms",
            json!({ "code": "G07", "label": "Tingling in feet", "weight": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.get("/api/symptoms/G07").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["label"], "Tingling in feet");

    let (status, _) = app.delete("/api/symptoms/G07").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/api/symptoms/G07").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Symptom not found: G07");
}

#[tokio::test]
async fn recommendations_by_tier() {
    let app = TestApp::new();
    let (_, all) = app.get("/api/recommendations").await;
    assert_eq!(all.as_array().map(Vec::len), Some(5));

    let (_, high) = app.get("/api/recommendations?risk_tier=high").await;
    assert_eq!(high.as_array().map(Vec::len), Some(3));

    let (status, _) = app.get("/api/recommendations?risk_tier=extreme").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, created) = app
        .post_json(
            "/api/recommendations",
            json!({ "title": "Sleep", "description": "Seven hours a night.", "risk_tier": "Low" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let id = created["id"].as_i64().unwrap();
    let (status, _) = app.delete(&format!("/api/recommendations/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn user_crud() {
    let app = TestApp::new();
    let (status, created) = app
        .post_json("/api/users", json!({ "full_name": "Dewi", "age": 33 }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();

    let (status, body) = app.get(&format!("/api/users/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["full_name"], "Dewi");

    let (status, _) = app.delete(&format!("/api/users/{}", id)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get(&format!("/api/users/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let (status, _) = app.post_json("/api/users", json!({ "full_name": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_diagnosis() {
    let app = TestApp::new();
    let (_, body) = app
        .post_json("/diagnosis", json!({ "symptoms": ["G01", "G06"] }))
        .await;
    let id = body["diagnosisId"].as_i64().unwrap();

    let (status, record) = app.get(&format!("/api/diagnoses/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["matched_rule"], "R2");

    let (status, _) = app.delete(&format!("/api/diagnoses/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&format!("/api/diagnoses/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_login() {
    let app = TestApp::new();
    let (status, body) = app
        .post_json("/admin/login", json!({ "username": "admin", "password": "admin123" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, body) = app
        .post_json("/admin/login", json!({ "username": "admin", "password": "guess" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid username or password");
}
