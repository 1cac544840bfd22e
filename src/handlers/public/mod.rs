// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Catalog reads, token acquisition, service metadata and API description.

pub mod auth;    // POST /api/login, POST /api/register
pub mod docs;    // GET /api-docs
pub mod pokemon; // GET /api/pokemons, GET /api/pokemons/:id
pub mod service; // GET /, GET /health

pub use auth::{login_post, register_post};
pub use docs::openapi_get;
pub use pokemon::{pokemon_get, pokemon_list};
pub use service::{health, root};
