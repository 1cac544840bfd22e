use serde_json::json;

use crate::cli::client::PokedexClient;
use crate::cli::config::{self, Session};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

pub async fn register(
    url: &str,
    username: &str,
    password: &str,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let client = PokedexClient::new(url)?;
    let message = client.register(username, password).await?;

    output_success(
        &output_format,
        &format!("{} ('{}')", message, username),
        Some(json!({ "username": username })),
    )
}

pub async fn login(
    url: &str,
    username: &str,
    password: &str,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let client = PokedexClient::new(url)?;
    let token = client.login(username, password).await?;

    config::save_session(&Session::new(url, username, token))?;

    output_success(
        &output_format,
        &format!("Logged in to {} as '{}'", url, username),
        Some(json!({ "username": username, "url": url })),
    )
}

pub async fn logout(output_format: OutputFormat) -> anyhow::Result<()> {
    let removed = config::clear_session()?;
    let message = if removed {
        "Logged out"
    } else {
        "No saved session"
    };

    output_success(&output_format, message, Some(json!({ "removed": removed })))
}

/// Client for `url`, carrying the saved token when it was issued by that server.
pub fn session_client(url: &str) -> anyhow::Result<PokedexClient> {
    let client = PokedexClient::new(url)?;

    match config::load_session()? {
        Some(session) if session.matches(url) => Ok(client.with_token(session.token)),
        Some(session) => {
            tracing::debug!("Saved session belongs to {}, not {}", session.url, url);
            Ok(client)
        }
        None => Ok(client),
    }
}
