use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, types::Json, FromRow, PgPool};
use tracing::{debug, info};

use super::{BaseStats, Pokemon, PokemonName, PokemonStore, Store, StoreError, User, UserStore};
use crate::config::{StoreBackend, StoreConfig};

const CREATE_POKEMONS: &str = r#"
    CREATE TABLE IF NOT EXISTS pokemons (
        id          BIGINT PRIMARY KEY,
        name        JSONB NOT NULL,
        types       JSONB NOT NULL DEFAULT '[]'::jsonb,
        base        JSONB NOT NULL,
        image       TEXT,
        is_favorite BOOLEAN NOT NULL DEFAULT FALSE
    )
"#;

const CREATE_USERS: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id            UUID PRIMARY KEY,
        username      TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
"#;

const POKEMON_COLUMNS: &str = "id, name, types, base, image, is_favorite";

/// PostgreSQL backend. Nested parts of a record are kept as JSONB documents.
pub struct PgStore {
    pool: PgPool,
}

#[derive(FromRow)]
struct PokemonRow {
    id: i64,
    name: Json<PokemonName>,
    types: Json<Vec<String>>,
    base: Json<BaseStats>,
    image: Option<String>,
    is_favorite: bool,
}

impl From<PokemonRow> for Pokemon {
    fn from(row: PokemonRow) -> Self {
        Pokemon {
            id: row.id,
            name: row.name.0,
            types: row.types.0,
            base: row.base.0,
            image: row.image,
            is_favorite: row.is_favorite,
        }
    }
}

impl PgStore {
    pub async fn connect(url: &str, config: &StoreConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!("Created database pool (max {} connections)", config.max_connections);
        Ok(Self { pool })
    }

    /// Creates the tables if they do not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_POKEMONS).execute(&self.pool).await?;
        sqlx::query(CREATE_USERS).execute(&self.pool).await?;
        debug!("Database schema ready");
        Ok(())
    }

    async fn pokemon_exists(&self, id: i64) -> Result<bool, StoreError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pokemons WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}

/// Racing inserts surface as unique violations; report them like the pre-check does.
fn conflict_or(err: sqlx::Error, message: String) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict(message),
        _ => StoreError::Sqlx(err),
    }
}

#[async_trait]
impl PokemonStore for PgStore {
    async fn list(&self) -> Result<Vec<Pokemon>, StoreError> {
        let sql = format!("SELECT {} FROM pokemons ORDER BY id", POKEMON_COLUMNS);
        let rows = sqlx::query_as::<_, PokemonRow>(&sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Pokemon::from).collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Pokemon>, StoreError> {
        let sql = format!("SELECT {} FROM pokemons WHERE id = $1", POKEMON_COLUMNS);
        let row = sqlx::query_as::<_, PokemonRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Pokemon::from))
    }

    async fn create(&self, pokemon: Pokemon) -> Result<Pokemon, StoreError> {
        if self.pokemon_exists(pokemon.id).await? {
            return Err(StoreError::Conflict(format!("pokemon {} already exists", pokemon.id)));
        }

        let sql = format!(
            "INSERT INTO pokemons ({}) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            POKEMON_COLUMNS, POKEMON_COLUMNS
        );
        let row = sqlx::query_as::<_, PokemonRow>(&sql)
            .bind(pokemon.id)
            .bind(Json(&pokemon.name))
            .bind(Json(&pokemon.types))
            .bind(Json(&pokemon.base))
            .bind(&pokemon.image)
            .bind(pokemon.is_favorite)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_or(e, format!("pokemon {} already exists", pokemon.id)))?;

        Ok(row.into())
    }

    async fn update(&self, pokemon: Pokemon) -> Result<Option<Pokemon>, StoreError> {
        let sql = format!(
            "UPDATE pokemons SET name = $2, types = $3, base = $4, image = $5, is_favorite = $6 \
             WHERE id = $1 RETURNING {}",
            POKEMON_COLUMNS
        );
        let row = sqlx::query_as::<_, PokemonRow>(&sql)
            .bind(pokemon.id)
            .bind(Json(&pokemon.name))
            .bind(Json(&pokemon.types))
            .bind(Json(&pokemon.base))
            .bind(&pokemon.image)
            .bind(pokemon.is_favorite)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Pokemon::from))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM pokemons WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create_user(&self, user: User) -> Result<User, StoreError> {
        if self.find_by_username(&user.username).await?.is_some() {
            return Err(StoreError::Conflict(format!("user '{}' already exists", user.username)));
        }

        let created = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, username, password_hash, created_at) VALUES ($1, $2, $3, $4) \
             RETURNING id, username, password_hash, created_at",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or(e, format!("user '{}' already exists", user.username)))?;

        Ok(created)
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> StoreBackend {
        StoreBackend::Postgres
    }

    /// Pings the pool to ensure connectivity
    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}
