use aioep_core::gateway::GatewayConfig;
use aioep_core::prompt::default_template;
use aioep_core::types::SubSkill;
use axum::http::StatusCode;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Bootstrap a project root with the default prompt templates.
fn init_project(dir: &TempDir) {
    for s in SubSkill::all() {
        let path = aioep_core::paths::prompt_path(dir.path(), *s);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, default_template(*s)).unwrap();
    }
}

/// Router with no credential configured (mock-mode gateway).
fn offline_app(dir: &TempDir) -> axum::Router {
    aioep_server::build_router(dir.path().to_path_buf(), GatewayConfig::openai())
}

/// Router whose gateway points at a mockito server.
fn app_with_upstream(dir: &TempDir, base_url: String) -> axum::Router {
    let config = GatewayConfig {
        api_key: Some("test-key".to_string()),
        base_url,
        ..GatewayConfig::openai()
    };
    aioep_server::build_router(dir.path().to_path_buf(), config)
}

/// Send a GET request via `oneshot` and return (status, parsed JSON body).
async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// Send a request with a JSON body via `oneshot` and return (status, parsed JSON body).
async fn send_json(
    app: axum::Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

fn elements_json() -> serde_json::Value {
    serde_json::json!([
        {"id": "s1", "type": "Stakeholder", "name": "CEO", "description": ""},
        {"id": "d1", "type": "Driver", "name": "Growth pressure", "description": ""},
        {"id": "g1", "type": "Goal", "name": "Enter two markets", "description": ""}
    ])
}

// ---------------------------------------------------------------------------
// AI generation route
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread")]
async fn ai_requires_sub_skill_and_input() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let (status, json) = send_json(
        offline_app(&dir),
        "POST",
        "/api/strategy/ai",
        serde_json::json!({"input": "some text"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "subSkill and input are required");

    let (status, _) = send_json(
        offline_app(&dir),
        "POST",
        "/api/strategy/ai",
        serde_json::json!({"subSkill": "extract-drivers", "input": ""}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread")]
async fn ai_rejects_unknown_sub_skill() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let (status, json) = send_json(
        offline_app(&dir),
        "POST",
        "/api/strategy/ai",
        serde_json::json!({"subSkill": "invent-features", "input": "text"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("invalid sub-skill"));
}

#[tokio::test(flavor = "multi_thread")]
async fn ai_missing_template_is_configuration_error() {
    let dir = TempDir::new().unwrap();
    // No templates written.

    let (status, json) = send_json(
        offline_app(&dir),
        "POST",
        "/api/strategy/ai",
        serde_json::json!({"subSkill": "extract-drivers", "input": "text"}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("prompt template not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn ai_without_credential_returns_mock_payload() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let (status, json) = send_json(
        offline_app(&dir),
        "POST",
        "/api/strategy/ai",
        serde_json::json!({"subSkill": "extract-drivers", "input": "our vision"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "mock");
    assert_eq!(json["subSkill"], "extract-drivers");
    assert_eq!(json["systemPromptLoaded"], true);
    assert!(json["systemPromptLength"].as_u64().unwrap() > 0);
    assert_eq!(json["feedbackPatternsLoaded"], false);
}

#[tokio::test(flavor = "multi_thread")]
async fn ai_success_returns_extracted_result_with_metadata() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let mut server = mockito::Server::new_async().await;
    let content = "```json\n{\"elements\": [], \"relationships\": []}\n```";
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(
            serde_json::json!({
                "model": "gpt-4o",
                "choices": [{"message": {"role": "assistant", "content": content}}],
                "usage": {"total_tokens": 42}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let app = app_with_upstream(&dir, server.url());
    let (status, json) = send_json(
        app,
        "POST",
        "/api/strategy/ai",
        serde_json::json!({
            "subSkill": "derive-goals",
            "input": "our vision",
            "existingModel": {"elements": elements_json(), "relationships": []}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "success");
    assert_eq!(json["result"]["elements"], serde_json::json!([]));
    assert_eq!(json["metadata"]["model"], "gpt-4o");
    assert_eq!(json["metadata"]["usage"]["total_tokens"], 42);
}

#[tokio::test(flavor = "multi_thread")]
async fn ai_upstream_failure_maps_to_502_with_body() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(429)
        .with_body("rate limited")
        .create_async()
        .await;

    let app = app_with_upstream(&dir, server.url());
    let (status, json) = send_json(
        app,
        "POST",
        "/api/strategy/ai",
        serde_json::json!({"subSkill": "extract-drivers", "input": "our vision"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(json["error"].as_str().unwrap().contains("rate limited"));
}

// ---------------------------------------------------------------------------
// Model document store routes
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread")]
async fn save_model_requires_elements() {
    let dir = TempDir::new().unwrap();

    let (status, json) = send_json(
        offline_app(&dir),
        "POST",
        "/api/strategy/models",
        serde_json::json!({"name": "No elements"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "elements array is required");
}

#[tokio::test(flavor = "multi_thread")]
async fn save_list_get_model_roundtrip() {
    let dir = TempDir::new().unwrap();

    let (status, receipt) = send_json(
        offline_app(&dir),
        "POST",
        "/api/strategy/models",
        serde_json::json!({
            "name": "Q3 strategy",
            "targetYear": 2027,
            "elements": elements_json(),
            "relationships": [
                {"id": "r1", "type": "Influence", "sourceId": "d1", "targetId": "g1"}
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["elementCount"], 3);
    assert_eq!(receipt["relationshipCount"], 1);
    let id = receipt["id"].as_str().unwrap().to_string();

    let (status, list) = get(offline_app(&dir), "/api/strategy/models").await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], id.as_str());
    assert_eq!(list[0]["name"], "Q3 strategy");
    assert_eq!(list[0]["status"], "confirmed");
    assert_eq!(list[0]["targetYear"], 2027);
    assert_eq!(list[0]["elementCount"], 3);

    let (status, model) = get(offline_app(&dir), &format!("/api/strategy/models/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(model["modelType"], "archimate-motivation");
    assert_eq!(model["metadata"]["status"], "confirmed");
    assert_eq!(model["metadata"]["createdBy"], "ai + human");
    assert_eq!(model["elements"].as_array().unwrap().len(), 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn get_unknown_model_is_404() {
    let dir = TempDir::new().unwrap();
    let (status, json) = get(offline_app(&dir), "/api/strategy/models/model-123").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("model not found"));
}

// ---------------------------------------------------------------------------
// Settings routes
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread")]
async fn settings_defaults_then_merge_update() {
    let dir = TempDir::new().unwrap();

    let (status, json) = get(offline_app(&dir), "/api/settings").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["companyName"], "");
    assert_eq!(json["strategicCycle"], "annual");

    let (status, updated) = send_json(
        offline_app(&dir),
        "PUT",
        "/api/settings",
        serde_json::json!({"companyName": "Acme Logistics", "currentYear": 2030}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["companyName"], "Acme Logistics");
    assert_eq!(updated["currentYear"], 2030);
    // Untouched fields keep their values.
    assert_eq!(updated["strategicCycle"], "annual");

    let (_, reread) = get(offline_app(&dir), "/api/settings").await;
    assert_eq!(reread["companyName"], "Acme Logistics");
}
