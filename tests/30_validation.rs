mod common;

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};

use common::{pikachu, TestApp};

fn error_fields(body: &Value) -> Vec<String> {
    body["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e["field"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn every_violation_is_reported_at_once() -> Result<()> {
    let app = TestApp::new();
    let token = app.login_as("brock", "onix").await?;

    let body = json!({
        "id": 1.5,
        "name": { "english": "   ", "french": 3 },
        "type": ["Rock", 7],
        "base": { "HP": 35, "Attack": "high", "Speed": 90 },
        "isFavorite": "yes"
    });
    let (status, body) = app
        .request(Method::POST, "/api/pokemons", Some(&token), Some(body))
        .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(
        error_fields(&body),
        vec![
            "id",
            "name.english",
            "name.french",
            "type",
            "base.Attack",
            "base.Defense",
            "isFavorite"
        ]
    );
    Ok(())
}

#[tokio::test]
async fn missing_name_and_base_are_required() -> Result<()> {
    let app = TestApp::new();
    let token = app.login_as("brock", "onix").await?;

    let (status, body) = app
        .request(Method::POST, "/api/pokemons", Some(&token), Some(json!({ "id": 74 })))
        .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields = error_fields(&body);
    assert!(fields.contains(&"name".to_string()));
    assert!(fields.contains(&"name.english".to_string()));
    assert!(fields.contains(&"base".to_string()));
    assert!(fields.contains(&"base.Speed".to_string()));
    Ok(())
}

#[tokio::test]
async fn optional_fields_may_be_omitted() -> Result<()> {
    let app = TestApp::new();
    let token = app.login_as("brock", "onix").await?;

    let minimal = json!({
        "id": 95,
        "name": { "english": "Onix" },
        "base": { "HP": 35, "Attack": 45, "Defense": 160, "Speed": 70 }
    });
    let (status, body) = app
        .request(Method::POST, "/api/pokemons", Some(&token), Some(minimal))
        .await?;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["type"], json!([]));
    assert!(body.get("image").is_none());
    Ok(())
}

#[tokio::test]
async fn non_object_body_is_rejected() -> Result<()> {
    let app = TestApp::new();
    let token = app.login_as("brock", "onix").await?;

    let (status, body) = app
        .request(Method::POST, "/api/pokemons", Some(&token), Some(json!([pikachu(25)])))
        .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), vec!["body"]);
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_invalid_json() -> Result<()> {
    let app = TestApp::new();
    let token = app.login_as("brock", "onix").await?;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/pokemons")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"id\": 25,"))?;
    let (status, body) = app.send(request).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_JSON");
    Ok(())
}

#[tokio::test]
async fn rejected_body_does_not_reach_the_store() -> Result<()> {
    let app = TestApp::new();
    let token = app.login_as("brock", "onix").await?;

    let mut invalid = pikachu(25);
    invalid["base"]["HP"] = json!("35");
    app.request(Method::POST, "/api/pokemons", Some(&token), Some(invalid))
        .await?;

    let (status, _) = app.get("/api/pokemons/25").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn out_of_range_stat_is_listed_with_other_violations() -> Result<()> {
    let app = TestApp::new();
    let token = app.login_as("brock", "onix").await?;

    let mut body = pikachu(25);
    body["id"] = json!("one");
    body["base"]["HP"] = json!(3_000_000_000u64);
    let (status, body) = app
        .request(Method::POST, "/api/pokemons", Some(&token), Some(body))
        .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), vec!["id", "base.HP"]);
    Ok(())
}

#[tokio::test]
async fn oversized_body_is_payload_too_large() -> Result<()> {
    let app = TestApp::new();

    // Development preset caps bodies at 1 MiB
    let credentials = json!({ "username": "a".repeat(2 * 1024 * 1024), "password": "onix" });
    let (status, body) = app
        .request(Method::POST, "/api/register", None, Some(credentials))
        .await?;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
    Ok(())
}
