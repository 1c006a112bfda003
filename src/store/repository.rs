//! Store trait definition and the in-memory implementation.
//!
//! Trait-based abstraction over tournament persistence, enabling
//! dependency injection: the manager works the same over an in-memory map,
//! a flat file, or anything else that can round-trip a [`Tournament`].

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::bracket::{GuildId, Tournament};

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Store document contains a key that is not a guild id
    #[error("Invalid guild key '{0}' in store document")]
    InvalidGuildKey(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Keyed tournament persistence.
#[async_trait]
pub trait TournamentStore: Send + Sync {
    /// Fetch a tournament by guild and name.
    async fn get(&self, guild_id: GuildId, name: &str) -> StoreResult<Option<Tournament>>;

    /// Persist a tournament, replacing any previous snapshot.
    async fn save(&self, tournament: &Tournament) -> StoreResult<()>;

    /// All tournaments for a guild.
    async fn list(&self, guild_id: GuildId) -> StoreResult<Vec<Tournament>>;

    /// Remove a tournament. Returns whether anything was removed.
    async fn delete(&self, guild_id: GuildId, name: &str) -> StoreResult<bool>;
}

/// In-memory store backed by a guarded map.
#[derive(Default)]
pub struct MemoryStore {
    tournaments: RwLock<HashMap<(GuildId, String), Tournament>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TournamentStore for MemoryStore {
    async fn get(&self, guild_id: GuildId, name: &str) -> StoreResult<Option<Tournament>> {
        let tournaments = self.tournaments.read().await;
        Ok(tournaments.get(&(guild_id, name.to_string())).cloned())
    }

    async fn save(&self, tournament: &Tournament) -> StoreResult<()> {
        let mut tournaments = self.tournaments.write().await;
        tournaments.insert(
            (tournament.guild_id, tournament.name.clone()),
            tournament.clone(),
        );
        Ok(())
    }

    async fn list(&self, guild_id: GuildId) -> StoreResult<Vec<Tournament>> {
        let tournaments = self.tournaments.read().await;
        Ok(tournaments
            .values()
            .filter(|t| t.guild_id == guild_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, guild_id: GuildId, name: &str) -> StoreResult<bool> {
        let mut tournaments = self.tournaments.write().await;
        Ok(tournaments.remove(&(guild_id, name.to_string())).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tournament(guild_id: GuildId, name: &str) -> Tournament {
        Tournament::new(guild_id, name, 4, 1).unwrap()
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryStore::new();

        assert!(store.get(1, "Cup").await.unwrap().is_none());

        store.save(&tournament(1, "Cup")).await.unwrap();
        let loaded = store.get(1, "Cup").await.unwrap().unwrap();
        assert_eq!(loaded.name, "Cup");
        assert_eq!(loaded.matches.len(), 3);
    }

    #[tokio::test]
    async fn test_memory_store_save_replaces() {
        let store = MemoryStore::new();
        let mut t = tournament(1, "Cup");
        store.save(&t).await.unwrap();

        t.add_participant(20, "Ash", "a").unwrap();
        store.save(&t).await.unwrap();

        let loaded = store.get(1, "Cup").await.unwrap().unwrap();
        assert_eq!(loaded.participants.len(), 1);
    }

    #[tokio::test]
    async fn test_memory_store_list_scoped_to_guild() {
        let store = MemoryStore::new();
        store.save(&tournament(1, "Cup")).await.unwrap();
        store.save(&tournament(1, "Open")).await.unwrap();
        store.save(&tournament(2, "Cup")).await.unwrap();

        assert_eq!(store.list(1).await.unwrap().len(), 2);
        assert_eq!(store.list(2).await.unwrap().len(), 1);
        assert!(store.list(3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_memory_store_delete() {
        let store = MemoryStore::new();
        store.save(&tournament(1, "Cup")).await.unwrap();

        assert!(store.delete(1, "Cup").await.unwrap());
        assert!(!store.delete(1, "Cup").await.unwrap());
        assert!(store.get(1, "Cup").await.unwrap().is_none());
    }
}
