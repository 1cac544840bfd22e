// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Every route here sits behind `middleware::require_auth`, which runs before
// body validation, so an unauthenticated request is a 401 even when its body
// is also invalid. Handlers receive the caller as `Extension<AuthUser>`.

pub mod pokemon; // POST, PUT, DELETE, PATCH /favorite on /api/pokemons

pub use pokemon::{pokemon_delete, pokemon_favorite, pokemon_post, pokemon_put};
