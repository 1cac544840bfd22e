// handlers/public/auth.rs - POST /api/login, POST /api/register

use axum::extract::State;
use serde::Serialize;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, ValidatedJson};
use crate::state::AppState;
use crate::store::{StoreError, User, UserStore};
use crate::types::Credentials;

/// Same message for unknown user and wrong password.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /api/login - verify credentials and issue a one-hour bearer token
pub async fn login_post(
    State(state): State<AppState>,
    ValidatedJson(credentials): ValidatedJson<Credentials>,
) -> ApiResult<TokenResponse> {
    let Some(user) = state.store.find_by_username(&credentials.username).await? else {
        tracing::info!("Login rejected: unknown user '{}'", credentials.username);
        return Err(ApiError::bad_request(INVALID_CREDENTIALS));
    };

    if !state.passwords.verify(&credentials.password, &user.password_hash).await? {
        tracing::info!("Login rejected: wrong password for '{}'", user.username);
        return Err(ApiError::bad_request(INVALID_CREDENTIALS));
    }

    let token = state.tokens.issue(user.id, &user.username)?;
    tracing::info!("User '{}' logged in", user.username);

    Ok(ApiResponse::success(TokenResponse { token }))
}

/// POST /api/register - create an account with a bcrypt-hashed password
pub async fn register_post(
    State(state): State<AppState>,
    ValidatedJson(credentials): ValidatedJson<Credentials>,
) -> ApiResult<MessageResponse> {
    if state.store.find_by_username(&credentials.username).await?.is_some() {
        return Err(ApiError::bad_request("User already exists"));
    }

    let password_hash = state.passwords.hash(&credentials.password).await?;

    match state.store.create_user(User::new(&credentials.username, password_hash)).await {
        Ok(user) => {
            tracing::info!("Registered user '{}' ({})", user.username, user.id);
            Ok(ApiResponse::created(MessageResponse {
                message: "User created".to_string(),
            }))
        }
        // Lost a race with a concurrent registration of the same name
        Err(StoreError::Conflict(_)) => Err(ApiError::bad_request("User already exists")),
        Err(e) => Err(e.into()),
    }
}
