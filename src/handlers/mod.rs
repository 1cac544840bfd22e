// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (bearer token required)
pub mod protected; // POST/PUT/DELETE/PATCH /api/pokemons*
pub mod public;    // /, /health, /api-docs, GET /api/pokemons*, /api/login, /api/register

use crate::error::ApiError;

/// Parses the `:id` path segment of `/api/pokemons/:id`.
pub(crate) fn parse_pokemon_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::bad_request(format!("Invalid pokemon id '{}': expected an integer", raw)))
}
