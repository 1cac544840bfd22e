use serde::{Deserialize, Serialize};

/// Catalog entry as stored and as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: i64,
    pub name: PokemonName,
    #[serde(rename = "type", default)]
    pub types: Vec<String>,
    pub base: BaseStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "isFavorite", default)]
    pub is_favorite: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonName {
    pub english: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub french: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub japanese: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseStats {
    #[serde(rename = "HP")]
    pub hp: i32,
    #[serde(rename = "Attack")]
    pub attack: i32,
    #[serde(rename = "Defense")]
    pub defense: i32,
    #[serde(rename = "Sp. Attack", default, skip_serializing_if = "Option::is_none")]
    pub sp_attack: Option<i32>,
    #[serde(rename = "Sp. Defense", default, skip_serializing_if = "Option::is_none")]
    pub sp_defense: Option<i32>,
    #[serde(rename = "Speed")]
    pub speed: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn uses_catalog_field_names() {
        let pokemon: Pokemon = serde_json::from_value(json!({
            "id": 25,
            "name": { "english": "Pikachu", "japanese": "ピカチュウ" },
            "type": ["Electric"],
            "base": { "HP": 35, "Attack": 55, "Defense": 40, "Sp. Attack": 50, "Speed": 90 },
            "image": "/assets/025.png"
        }))
        .unwrap();

        assert_eq!(pokemon.base.sp_attack, Some(50));
        assert_eq!(pokemon.base.sp_defense, None);
        assert!(!pokemon.is_favorite);

        let value = serde_json::to_value(&pokemon).unwrap();
        assert_eq!(value["isFavorite"], json!(false));
        assert_eq!(value["type"], json!(["Electric"]));
        assert_eq!(value["base"]["Sp. Attack"], json!(50));
        assert!(value["base"].get("Sp. Defense").is_none());
        assert!(value["name"].get("french").is_none());
    }
}
