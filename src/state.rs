use std::sync::Arc;

use crate::auth::{AuthError, PasswordHasher, TokenService};
use crate::config::AppConfig;
use crate::store::{self, Store, StoreError};

/// Shared, read-only request state. Cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: Arc<TokenService>,
    pub passwords: PasswordHasher,
}

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, tokens: TokenService, passwords: PasswordHasher) -> Self {
        Self {
            store,
            tokens: Arc::new(tokens),
            passwords,
        }
    }

    /// Opens the configured store and builds the auth services.
    pub async fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let tokens = TokenService::new(&config.security.jwt_secret)?;
        let passwords = PasswordHasher::new(config.security.bcrypt_cost);
        let store = store::open(&config.store).await?;
        Ok(Self::new(store, tokens, passwords))
    }
}
