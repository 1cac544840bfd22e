// handlers/public/pokemon.rs - catalog reads

use axum::extract::{Path, State};

use crate::error::ApiError;
use crate::handlers::parse_pokemon_id;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::store::{Pokemon, PokemonStore};

/// GET /api/pokemons - every record, ordered by id
pub async fn pokemon_list(State(state): State<AppState>) -> ApiResult<Vec<Pokemon>> {
    let pokemons = state.store.list().await?;
    Ok(ApiResponse::success(pokemons))
}

/// GET /api/pokemons/:id - single record by numeric id
pub async fn pokemon_get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Pokemon> {
    let id = parse_pokemon_id(&id)?;
    state
        .store
        .get(id)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found(format!("Pokemon {} not found", id)))
}
