use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Pokemon, PokemonStore, Store, StoreError, User, UserStore};
use crate::config::StoreBackend;

/// Process-local backend. Used for local runs (`STORE_BACKEND=memory`) and tests.
#[derive(Default)]
pub struct MemoryStore {
    pokemons: RwLock<BTreeMap<i64, Pokemon>>,
    users: RwLock<HashMap<String, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PokemonStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Pokemon>, StoreError> {
        Ok(self.pokemons.read().await.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Pokemon>, StoreError> {
        Ok(self.pokemons.read().await.get(&id).cloned())
    }

    async fn create(&self, pokemon: Pokemon) -> Result<Pokemon, StoreError> {
        let mut pokemons = self.pokemons.write().await;
        if pokemons.contains_key(&pokemon.id) {
            return Err(StoreError::Conflict(format!("pokemon {} already exists", pokemon.id)));
        }
        pokemons.insert(pokemon.id, pokemon.clone());
        Ok(pokemon)
    }

    async fn update(&self, pokemon: Pokemon) -> Result<Option<Pokemon>, StoreError> {
        let mut pokemons = self.pokemons.write().await;
        match pokemons.get_mut(&pokemon.id) {
            Some(slot) => {
                *slot = pokemon.clone();
                Ok(Some(pokemon))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.pokemons.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn create_user(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(StoreError::Conflict(format!("user '{}' already exists", user.username)));
        }
        users.insert(user.username.clone(), user.clone());
        Ok(user)
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> StoreBackend {
        StoreBackend::Memory
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn close(&self) {
        self.pokemons.write().await.clear();
        self.users.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{BaseStats, PokemonName};

    fn bulbasaur(id: i64) -> Pokemon {
        Pokemon {
            id,
            name: PokemonName {
                english: "Bulbasaur".to_string(),
                french: Some("Bulbizarre".to_string()),
                japanese: None,
            },
            types: vec!["Grass".to_string(), "Poison".to_string()],
            base: BaseStats {
                hp: 45,
                attack: 49,
                defense: 49,
                sp_attack: Some(65),
                sp_defense: Some(65),
                speed: 45,
            },
            image: None,
            is_favorite: false,
        }
    }

    #[tokio::test]
    async fn create_rejects_duplicate_id_without_mutation() {
        let store = MemoryStore::new();
        store.create(bulbasaur(1)).await.unwrap();

        let mut other = bulbasaur(1);
        other.name.english = "Impostor".to_string();
        let err = store.create(other).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        let stored = store.get(1).await.unwrap().unwrap();
        assert_eq!(stored.name.english, "Bulbasaur");
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let store = MemoryStore::new();
        for id in [7, 1, 4] {
            store.create(bulbasaur(id)).await.unwrap();
        }
        let ids: Vec<i64> = store.list().await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 4, 7]);
    }

    #[tokio::test]
    async fn delete_missing_id_is_not_an_error() {
        let store = MemoryStore::new();
        assert!(!store.delete(42).await.unwrap());
        store.create(bulbasaur(42)).await.unwrap();
        assert!(store.delete(42).await.unwrap());
        assert!(store.get(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn toggle_favorite_flips_once_per_call() {
        let store = MemoryStore::new();
        store.create(bulbasaur(1)).await.unwrap();

        let first = store.toggle_favorite(1).await.unwrap().unwrap();
        assert!(first.is_favorite);
        let second = store.toggle_favorite(1).await.unwrap().unwrap();
        assert!(!second.is_favorite);

        assert!(store.toggle_favorite(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_unknown_id_returns_none() {
        let store = MemoryStore::new();
        assert!(store.update(bulbasaur(3)).await.unwrap().is_none());
        assert!(store.get(3).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_keeps_first_hash() {
        let store = MemoryStore::new();
        store.create_user(User::new("ash", "hash-one".to_string())).await.unwrap();
        let err = store
            .create_user(User::new("ash", "hash-two".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        let user = store.find_by_username("ash").await.unwrap().unwrap();
        assert_eq!(user.password_hash, "hash-one");
    }
}
