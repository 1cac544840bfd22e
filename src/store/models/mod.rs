pub mod pokemon;
pub mod user;

pub use pokemon::{BaseStats, Pokemon, PokemonName};
pub use user::User;
