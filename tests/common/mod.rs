#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use pokedex_api::auth::{PasswordHasher, TokenService};
use pokedex_api::config::AppConfig;
use pokedex_api::store::MemoryStore;
use pokedex_api::{app, AppState};

pub const TEST_SECRET: &str = "integration-test-secret";

/// In-process application over a fresh memory store.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        let mut config = AppConfig::development();
        config.api.enable_request_logging = false;

        let state = AppState::new(
            Arc::new(MemoryStore::new()),
            TokenService::new(TEST_SECRET).expect("non-empty secret"),
            // Minimum cost keeps hashing fast
            PasswordHasher::new(4),
        );

        Self {
            router: app(state.clone(), &config),
            state,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> Result<(StatusCode, Value)> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).context("response body is not JSON")?
        };
        Ok((status, body))
    }

    pub async fn get(&self, uri: &str) -> Result<(StatusCode, Value)> {
        self.request(Method::GET, uri, None, None).await
    }

    /// Registers and logs in, returning the bearer token.
    pub async fn login_as(&self, username: &str, password: &str) -> Result<String> {
        let credentials = json!({ "username": username, "password": password });

        let (status, _) = self
            .request(Method::POST, "/api/register", None, Some(credentials.clone()))
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "register returned {}", status);

        let (status, body) = self
            .request(Method::POST, "/api/login", None, Some(credentials))
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "login returned {}", status);

        body["token"]
            .as_str()
            .map(str::to_string)
            .context("login response has no token")
    }
}

pub fn pikachu(id: i64) -> Value {
    json!({
        "id": id,
        "name": { "english": "Pikachu", "french": "Pikachu", "japanese": "ピカチュウ" },
        "type": ["Electric"],
        "base": {
            "HP": 35,
            "Attack": 55,
            "Defense": 40,
            "Sp. Attack": 50,
            "Sp. Defense": 50,
            "Speed": 90
        },
        "image": "/assets/025.png"
    })
}

/// The server binary on a free port, backed by the memory store.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        let server = Self::spawn()?;
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let child = Command::new(env!("CARGO_BIN_EXE_pokedex-api"))
            .env("APP_ENV", "development")
            .env("HOST", "127.0.0.1")
            .env("POKEDEX_API_PORT", port.to_string())
            .env("STORE_BACKEND", "memory")
            .env("JWT_SECRET", TEST_SECRET)
            .env("BCRYPT_COST", "4")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        let url = format!("{}/health", self.base_url);

        while Instant::now() < deadline {
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
