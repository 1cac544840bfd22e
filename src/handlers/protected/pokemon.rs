// handlers/protected/pokemon.rs - catalog mutations

use axum::{
    extract::{Path, State},
    Extension,
};

use crate::error::ApiError;
use crate::handlers::parse_pokemon_id;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, ValidatedJson};
use crate::state::AppState;
use crate::store::{Pokemon, PokemonStore};
use crate::types::{CreatePokemon, UpdatePokemon};

fn not_found(id: i64) -> ApiError {
    ApiError::not_found(format!("Pokemon {} not found", id))
}

/// POST /api/pokemons - insert a new record; 409 when the id is taken
pub async fn pokemon_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<CreatePokemon>,
) -> ApiResult<Pokemon> {
    let created = state.store.create(Pokemon::from(body)).await?;
    tracing::info!("'{}' created pokemon {}", user.username, created.id);
    Ok(ApiResponse::created(created))
}

/// PUT /api/pokemons/:id - replace the stored fields of an existing record
pub async fn pokemon_put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdatePokemon>,
) -> ApiResult<Pokemon> {
    let id = parse_pokemon_id(&id)?;
    body.check_id(id)
        .map_err(|violation| ApiError::validation_error(vec![violation]))?;

    let current = state.store.get(id).await?.ok_or_else(|| not_found(id))?;
    let updated = state
        .store
        .update(body.apply_to(current))
        .await?
        // Deleted between the read and the write
        .ok_or_else(|| not_found(id))?;

    tracing::info!("'{}' updated pokemon {}", user.username, id);
    Ok(ApiResponse::success(updated))
}

/// DELETE /api/pokemons/:id - idempotent; 204 whether or not the record existed
pub async fn pokemon_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_pokemon_id(&id)?;
    let removed = state.store.delete(id).await?;
    if removed {
        tracing::info!("'{}' deleted pokemon {}", user.username, id);
    } else {
        tracing::debug!("'{}' deleted absent pokemon {}", user.username, id);
    }
    Ok(ApiResponse::no_content())
}

/// PATCH /api/pokemons/:id/favorite - flip `isFavorite`, last write wins
pub async fn pokemon_favorite(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Pokemon> {
    let id = parse_pokemon_id(&id)?;
    let pokemon = state
        .store
        .toggle_favorite(id)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(
        "'{}' set favorite={} on pokemon {}",
        user.username,
        pokemon.is_favorite,
        id
    );
    Ok(ApiResponse::success(pokemon))
}
