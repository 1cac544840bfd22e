mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use pokedex_api::store::UserStore;

use common::{pikachu, TestApp};

#[tokio::test]
async fn register_then_login_issues_token() -> Result<()> {
    let app = TestApp::new();
    let credentials = json!({ "username": "ash", "password": "pikachu1" });

    let (status, body) = app
        .request(Method::POST, "/api/register", None, Some(credentials.clone()))
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User created");

    let (status, body) = app
        .request(Method::POST, "/api/login", None, Some(credentials))
        .await?;
    assert_eq!(status, StatusCode::OK);

    let token = body["token"].as_str().expect("token string");
    let claims = app.state.tokens.verify(token)?;
    assert_eq!(claims.username, "ash");
    assert_eq!(claims.exp - claims.iat, 3600);
    Ok(())
}

#[tokio::test]
async fn duplicate_registration_keeps_first_password() -> Result<()> {
    let app = TestApp::new();
    app.login_as("ash", "pikachu1").await?;
    let original = app.state.store.find_by_username("ash").await?.expect("user stored");

    let (status, body) = app
        .request(
            Method::POST,
            "/api/register",
            None,
            Some(json!({ "username": "ash", "password": "charizard" })),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User already exists");

    let after = app.state.store.find_by_username("ash").await?.expect("user stored");
    assert_eq!(after.password_hash, original.password_hash);

    let (status, _) = app
        .request(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "username": "ash", "password": "pikachu1" })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn login_failures_are_indistinguishable() -> Result<()> {
    let app = TestApp::new();
    app.login_as("misty", "starmie").await?;

    let (wrong_status, wrong_body) = app
        .request(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "username": "misty", "password": "psyduck" })),
        )
        .await?;
    let (unknown_status, unknown_body) = app
        .request(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "username": "gary", "password": "psyduck" })),
        )
        .await?;

    assert_eq!(wrong_status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown_status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body["message"], "Invalid credentials");
    Ok(())
}

#[tokio::test]
async fn credentials_must_be_non_empty_strings() -> Result<()> {
    let app = TestApp::new();

    let (status, body) = app
        .request(
            Method::POST,
            "/api/register",
            None,
            Some(json!({ "username": "", "password": 42 })),
        )
        .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .expect("errors array")
        .iter()
        .filter_map(|e| e["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["username", "password"]);
    Ok(())
}

#[tokio::test]
async fn token_expires_after_one_hour() -> Result<()> {
    let app = TestApp::new();
    let user_id = Uuid::new_v4();

    let fresh = app
        .state
        .tokens
        .issue_at(user_id, "ash", Utc::now() - Duration::seconds(3590))?;
    let (status, _) = app
        .request(Method::POST, "/api/pokemons", Some(&fresh), Some(pikachu(25)))
        .await?;
    assert_eq!(status, StatusCode::CREATED);

    let stale = app
        .state
        .tokens
        .issue_at(user_id, "ash", Utc::now() - Duration::seconds(3601))?;
    let (status, body) = app
        .request(Method::POST, "/api/pokemons", Some(&stale), Some(pikachu(26)))
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn token_signed_with_other_secret_is_rejected() -> Result<()> {
    let app = TestApp::new();
    let foreign = pokedex_api::auth::TokenService::new("someone-else")?.issue(Uuid::new_v4(), "ash")?;

    let (status, _) = app
        .request(Method::POST, "/api/pokemons", Some(&foreign), Some(pikachu(25)))
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}
