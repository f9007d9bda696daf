use anyhow::Result;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use httpmock::prelude::*;
use reach_funnel::utils::validation::Validate;
use reach_funnel::{build_router, AppConfig, AppState};
use serde_json::{json, Value};
use std::io::Write;
use tempfile::NamedTempFile;
use tower::ServiceExt;

/// 以 mock server 位址產生完整設定檔，經由 TOML 載入
fn config_for(server: &MockServer, with_keys: bool) -> Result<AppConfig> {
    let keys = if with_keys {
        r#"
[text_generation]
api_key = "gen-key"
endpoint = "BASE/gemini"

[places]
api_key = "places-key"
endpoint = "BASE/places:searchText"

[messaging]
base_url = "BASE/wa"
username = "admin"
password = "s3cret"
"#
    } else {
        r#"
[text_generation]
endpoint = "BASE/gemini"

[places]
endpoint = "BASE/places:searchText"
"#
    };

    let mut file = NamedTempFile::new()?;
    file.write_all(keys.replace("BASE", &server.base_url()).as_bytes())?;

    let config = AppConfig::from_file(file.path())?;
    config.validate()?;
    Ok(config)
}

fn router_for(config: &AppConfig) -> Result<Router> {
    Ok(build_router(AppState::from_config(config)?, &config.server))
}

async fn post_json(router: Router, path: &str, body: Value) -> Result<(StatusCode, Value)> {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))?;
    let response = router.oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes).unwrap_or(Value::Null)))
}

fn gemini_answer(text: &str) -> Value {
    json!({"candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]})
}

#[tokio::test]
async fn test_keywords_then_places_over_http() -> Result<()> {
    let server = MockServer::start_async().await;

    let gemini_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/gemini/models/gemini-2.0-flash:generateContent")
                .header("x-goog-api-key", "gen-key")
                .body_contains("custom websites for local restaurants");
            then.status(200)
                .json_body(gemini_answer("restaurant web designer\nrestaurant marketing agency\n"));
        })
        .await;

    let places_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/places:searchText")
                .header("X-Goog-Api-Key", "places-key")
                .json_body(json!({"textQuery": "restaurant web designer"}));
            then.status(200).json_body(json!({
                "places": [
                    {"displayName": {"text": "Pixel Plate Studio"}},
                    {"displayName": {"text": "Menu Marketing Co"}}
                ]
            }));
        })
        .await;

    let router = router_for(&config_for(&server, true)?)?;
    let (status, body) = post_json(
        router,
        "/api/generate-potential-clients",
        json!({"businessDescription": "We build custom websites for local restaurants."}),
    )
    .await?;

    gemini_mock.assert_async().await;
    places_mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["keywords"],
        json!(["restaurant web designer", "restaurant marketing agency"])
    );
    assert_eq!(body["places"].as_array().map(Vec::len), Some(2));
    Ok(())
}

/// 供應商成功回應但沒有文字 → 404；供應商錯誤 → 500
#[tokio::test]
async fn test_empty_answer_and_provider_error_are_distinct() -> Result<()> {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(POST).body_contains("Empty Answer Bakery");
            then.status(200).json_body(gemini_answer("   \n"));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).body_contains("Broken Provider Bakery");
            then.status(503).body("backend unavailable");
        })
        .await;
    let places_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/places:searchText");
            then.status(200).json_body(json!({}));
        })
        .await;

    let config = config_for(&server, true)?;

    let (status, body) = post_json(
        router_for(&config)?,
        "/api/generate-potential-clients",
        json!({"businessDescription": "Empty Answer Bakery"}),
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "AI did not generate any valid keywords.");

    let (status, body) = post_json(
        router_for(&config)?,
        "/api/generate-potential-clients",
        json!({"businessDescription": "Broken Provider Bakery"}),
    )
    .await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to generate content from AI model.");
    assert!(!body.to_string().contains("backend unavailable"));

    assert_eq!(places_mock.hits_async().await, 0);
    Ok(())
}

#[tokio::test]
async fn test_missing_keys_fail_without_upstream_calls() -> Result<()> {
    let server = MockServer::start_async().await;
    let any_mock = server
        .mock_async(|when, then| {
            when.any_request();
            then.status(200).json_body(gemini_answer("OK"));
        })
        .await;

    let config = config_for(&server, false)?;
    assert_eq!(config.missing_credentials().len(), 5);

    let (status, body) = post_json(
        router_for(&config)?,
        "/api/validate-business-description",
        json!({"businessDescription": "Handmade soap"}),
    )
    .await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "Required setting 'text_generation.api_key' is not configured."
    );

    let (status, body) = post_json(
        router_for(&config)?,
        "/api/send-campaign",
        json!({"data": [{"phoneNumber": "+628111", "message": "Hai"}]}),
    )
    .await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "Required setting 'messaging.base_url' is not configured."
    );

    assert_eq!(any_mock.hits_async().await, 0);
    Ok(())
}

#[tokio::test]
async fn test_campaign_sign_in_then_dispatch_over_http() -> Result<()> {
    let server = MockServer::start_async().await;

    let auth_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/wa/api/auth/sign-in")
                .json_body(json!({"username": "admin", "password": "s3cret"}));
            then.status(201)
                .json_body(json!({"data": {"accessToken": "jwt-from-gateway"}}));
        })
        .await;
    let send_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/wa/api/whatsapp-web/send-many-message")
                .header("authorization", "Bearer jwt-from-gateway");
            then.status(200).json_body(json!({"message": "queued"}));
        })
        .await;

    let router = router_for(&config_for(&server, true)?)?;
    let (status, body) = post_json(
        router,
        "/api/send-campaign",
        json!({"data": [
            {"phoneNumber": "+628111", "message": "Hai"},
            {"phoneNumber": "+628222", "message": "Halo"}
        ]}),
    )
    .await?;

    auth_mock.assert_async().await;
    send_mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["details"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[tokio::test]
async fn test_rejected_sign_in_skips_dispatch_over_http() -> Result<()> {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(POST).path("/wa/api/auth/sign-in");
            then.status(401).json_body(json!({"message": "Unauthorized"}));
        })
        .await;
    let send_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/wa/api/whatsapp-web/send-many-message");
            then.status(200);
        })
        .await;

    let router = router_for(&config_for(&server, true)?)?;
    let (status, body) = post_json(
        router,
        "/api/send-campaign",
        json!({"data": [{"phoneNumber": "+628111", "message": "Hai"}]}),
    )
    .await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to dispatch campaign messages."}));
    assert_eq!(send_mock.hits_async().await, 0);
    Ok(())
}
