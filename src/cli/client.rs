use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::store::Pokemon;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid server url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message} ({status})")]
    Api { status: StatusCode, message: String },

    #[error("not logged in; run `pokedex login` first")]
    NotLoggedIn,
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct TokenBody {
    token: String,
}

#[derive(Deserialize)]
struct MessageBody {
    message: String,
}

/// Thin typed wrapper over the catalog HTTP API.
pub struct PokedexClient {
    http: reqwest::Client,
    base: Url,
    token: Option<String>,
}

impl PokedexClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            http: reqwest::Client::new(),
            base: Url::parse(base_url)?,
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<String, ClientError> {
        let body = serde_json::json!({ "username": username, "password": password });
        let reply: MessageBody = self.send(self.request(Method::POST, "/api/register")?.json(&body)).await?;
        Ok(reply.message)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<String, ClientError> {
        let body = serde_json::json!({ "username": username, "password": password });
        let reply: TokenBody = self.send(self.request(Method::POST, "/api/login")?.json(&body)).await?;
        Ok(reply.token)
    }

    pub async fn list(&self) -> Result<Vec<Pokemon>, ClientError> {
        self.send(self.request(Method::GET, "/api/pokemons")?).await
    }

    pub async fn get(&self, id: i64) -> Result<Pokemon, ClientError> {
        self.send(self.request(Method::GET, &format!("/api/pokemons/{}", id))?).await
    }

    pub async fn create(&self, record: &Value) -> Result<Pokemon, ClientError> {
        self.send(self.authed(Method::POST, "/api/pokemons")?.json(record)).await
    }

    pub async fn update(&self, id: i64, record: &Value) -> Result<Pokemon, ClientError> {
        self.send(self.authed(Method::PUT, &format!("/api/pokemons/{}", id))?.json(record))
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        let response = self
            .authed(Method::DELETE, &format!("/api/pokemons/{}", id))?
            .send()
            .await?;
        check_status(response).await.map(|_| ())
    }

    pub async fn toggle_favorite(&self, id: i64) -> Result<Pokemon, ClientError> {
        self.send(self.authed(Method::PATCH, &format!("/api/pokemons/{}/favorite", id))?)
            .await
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = self.base.join(path)?;
        Ok(self.http.request(method, url))
    }

    fn authed(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let token = self.token.as_deref().ok_or(ClientError::NotLoggedIn)?;
        Ok(self.request(method, path)?.bearer_auth(token))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = check_status(request.send().await?).await?;
        Ok(response.json().await?)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    // Error bodies carry a `message`; fall back to the reason phrase
    let message = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

    Err(ClientError::Api { status, message })
}
