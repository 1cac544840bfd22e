pub mod memory;
pub mod models;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::config::{StoreBackend, StoreConfig};

pub use memory::MemoryStore;
pub use models::{BaseStats, Pokemon, PokemonName, User};
pub use postgres::PgStore;

/// Errors from the store adapters
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Pokemon catalog persistence.
#[async_trait]
pub trait PokemonStore: Send + Sync {
    /// All records, ordered by id.
    async fn list(&self) -> Result<Vec<Pokemon>, StoreError>;

    async fn get(&self, id: i64) -> Result<Option<Pokemon>, StoreError>;

    /// Inserts a new record. Fails with [`StoreError::Conflict`] if the id is taken.
    async fn create(&self, pokemon: Pokemon) -> Result<Pokemon, StoreError>;

    /// Replaces an existing record. `None` if the id is unknown.
    async fn update(&self, pokemon: Pokemon) -> Result<Option<Pokemon>, StoreError>;

    /// Returns whether a record was removed. A missing id is not an error.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;

    /// Flips `is_favorite`. Read-modify-write: concurrent toggles are last-write-wins.
    async fn toggle_favorite(&self, id: i64) -> Result<Option<Pokemon>, StoreError> {
        let Some(mut pokemon) = self.get(id).await? else {
            return Ok(None);
        };
        pokemon.is_favorite = !pokemon.is_favorite;
        self.update(pokemon).await
    }
}

/// Credential persistence.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Fails with [`StoreError::Conflict`] if the username is taken.
    async fn create_user(&self, user: User) -> Result<User, StoreError>;
}

/// A complete backend: both adapters plus lifecycle.
#[async_trait]
pub trait Store: PokemonStore + UserStore {
    fn backend(&self) -> StoreBackend;

    async fn health_check(&self) -> Result<(), StoreError>;

    async fn close(&self);
}

/// Open the configured backend. The caller owns the handle and must `close` it on shutdown.
pub async fn open(config: &StoreConfig) -> Result<Arc<dyn Store>, StoreError> {
    match config.backend {
        StoreBackend::Memory => {
            info!("Using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or(StoreError::ConfigMissing("DATABASE_URL"))?;
            let store = PgStore::connect(url, config).await?;
            store.ensure_schema().await?;
            Ok(Arc::new(store))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn postgres_backend_requires_database_url() {
        let config = StoreConfig {
            backend: StoreBackend::Postgres,
            database_url: None,
            max_connections: 1,
            connection_timeout: 1,
        };
        let err = open(&config).await.err().expect("expected missing url error");
        assert!(matches!(err, StoreError::ConfigMissing("DATABASE_URL")));
    }

    #[tokio::test]
    async fn opens_memory_backend() {
        let config = StoreConfig {
            backend: StoreBackend::Memory,
            database_url: None,
            max_connections: 1,
            connection_timeout: 1,
        };
        let store = open(&config).await.unwrap();
        assert_eq!(store.backend(), StoreBackend::Memory);
        store.health_check().await.unwrap();
        store.close().await;
    }
}
