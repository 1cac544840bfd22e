pub mod auth;
pub mod pokemon;
