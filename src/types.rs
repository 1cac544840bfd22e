//! Request bodies accepted by the API. Each one is only constructed after its rule set passes.

use serde::Deserialize;

use crate::store::{BaseStats, Pokemon, PokemonName};
use crate::validation::{FieldKind, FieldRule, Validate, Violation};

/// Rules shared by create and update; `id` is handled per DTO.
macro_rules! pokemon_body_rules {
    ($id_rule:expr) => {
        &[
            $id_rule,
            FieldRule::required(&["name"], FieldKind::Object),
            FieldRule::required(&["name", "english"], FieldKind::String).non_empty(),
            FieldRule::optional(&["name", "french"], FieldKind::String),
            FieldRule::optional(&["name", "japanese"], FieldKind::String),
            FieldRule::optional(&["type"], FieldKind::StringList),
            FieldRule::required(&["base"], FieldKind::Object),
            FieldRule::required(&["base", "HP"], FieldKind::Stat),
            FieldRule::required(&["base", "Attack"], FieldKind::Stat),
            FieldRule::required(&["base", "Defense"], FieldKind::Stat),
            FieldRule::optional(&["base", "Sp. Attack"], FieldKind::Stat),
            FieldRule::optional(&["base", "Sp. Defense"], FieldKind::Stat),
            FieldRule::required(&["base", "Speed"], FieldKind::Stat),
            FieldRule::optional(&["image"], FieldKind::String),
            FieldRule::optional(&["isFavorite"], FieldKind::Boolean),
        ]
    };
}

/// Body of `POST /api/pokemons`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePokemon {
    pub id: i64,
    pub name: PokemonName,
    #[serde(rename = "type")]
    pub types: Option<Vec<String>>,
    pub base: BaseStats,
    pub image: Option<String>,
    #[serde(rename = "isFavorite")]
    pub is_favorite: Option<bool>,
}

impl Validate for CreatePokemon {
    const RULES: &'static [FieldRule] =
        pokemon_body_rules!(FieldRule::required(&["id"], FieldKind::Integer));
}

impl From<CreatePokemon> for Pokemon {
    fn from(body: CreatePokemon) -> Self {
        Pokemon {
            id: body.id,
            name: body.name,
            types: body.types.unwrap_or_default(),
            base: body.base,
            image: body.image,
            is_favorite: body.is_favorite.unwrap_or(false),
        }
    }
}

/// Body of `PUT /api/pokemons/:id`. The path id is authoritative.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePokemon {
    pub id: Option<i64>,
    pub name: PokemonName,
    #[serde(rename = "type")]
    pub types: Option<Vec<String>>,
    pub base: BaseStats,
    pub image: Option<String>,
    #[serde(rename = "isFavorite")]
    pub is_favorite: Option<bool>,
}

impl Validate for UpdatePokemon {
    const RULES: &'static [FieldRule] =
        pokemon_body_rules!(FieldRule::optional(&["id"], FieldKind::Integer));
}

impl UpdatePokemon {
    pub fn check_id(&self, path_id: i64) -> Result<(), Violation> {
        match self.id {
            Some(id) if id != path_id => Err(Violation::new(
                "id",
                format!("must match the id in the path ({})", path_id),
            )),
            _ => Ok(()),
        }
    }

    /// Applies the body onto `current`; an absent `isFavorite` keeps the stored flag.
    pub fn apply_to(self, current: Pokemon) -> Pokemon {
        Pokemon {
            id: current.id,
            name: self.name,
            types: self.types.unwrap_or_default(),
            base: self.base,
            image: self.image,
            is_favorite: self.is_favorite.unwrap_or(current.is_favorite),
        }
    }
}

/// Body of `POST /api/login` and `POST /api/register`.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Validate for Credentials {
    const RULES: &'static [FieldRule] = &[
        FieldRule::required(&["username"], FieldKind::String).non_empty(),
        FieldRule::required(&["password"], FieldKind::String).non_empty(),
    ];
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
