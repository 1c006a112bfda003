//! Flat-file JSON store.
//!
//! All tournaments live in one JSON document keyed
//! `guild_id -> tournament name -> tournament`. The whole document is read
//! once when the store opens and rewritten after every mutation, which is
//! plenty for the handful of concurrent tournaments a guild runs.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use super::repository::{StoreError, StoreResult, TournamentStore};
use crate::bracket::{GuildId, Tournament};

/// On-disk document shape. Guild ids become string keys in JSON.
type Document = BTreeMap<String, BTreeMap<String, Tournament>>;

/// JSON-file-backed tournament store.
pub struct JsonFileStore {
    path: PathBuf,
    tournaments: RwLock<HashMap<(GuildId, String), Tournament>>,
}

impl JsonFileStore {
    /// Open a store at the given path, creating an empty document (and any
    /// missing parent directories) when the file does not exist yet.
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        let tournaments = if tokio::fs::try_exists(&path).await? {
            let bytes = tokio::fs::read(&path).await?;
            let document: Document = serde_json::from_slice(&bytes)?;

            let mut tournaments = HashMap::new();
            for (guild_key, guild_tournaments) in document {
                let guild_id: GuildId = guild_key
                    .parse()
                    .map_err(|_| StoreError::InvalidGuildKey(guild_key))?;
                for (name, tournament) in guild_tournaments {
                    tournaments.insert((guild_id, name), tournament);
                }
            }
            log::info!(
                "Loaded {} tournament(s) from {}",
                tournaments.len(),
                path.display()
            );
            tournaments
        } else {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&path, b"{}").await?;
            log::info!("Created empty tournament store at {}", path.display());
            HashMap::new()
        };

        Ok(Self {
            path,
            tournaments: RwLock::new(tournaments),
        })
    }

    /// Rewrite the whole document from the in-memory map.
    async fn persist(
        &self,
        tournaments: &HashMap<(GuildId, String), Tournament>,
    ) -> StoreResult<()> {
        let mut document = Document::new();
        for ((guild_id, name), tournament) in tournaments {
            document
                .entry(guild_id.to_string())
                .or_default()
                .insert(name.clone(), tournament.clone());
        }

        let bytes = serde_json::to_vec_pretty(&document)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl TournamentStore for JsonFileStore {
    async fn get(&self, guild_id: GuildId, name: &str) -> StoreResult<Option<Tournament>> {
        let tournaments = self.tournaments.read().await;
        Ok(tournaments.get(&(guild_id, name.to_string())).cloned())
    }

    async fn save(&self, tournament: &Tournament) -> StoreResult<()> {
        let mut tournaments = self.tournaments.write().await;
        let key = (tournament.guild_id, tournament.name.clone());
        let previous = tournaments.insert(key.clone(), tournament.clone());

        // Roll the map back when the write fails, so a failed save leaves
        // nothing behind for later reads to observe.
        if let Err(err) = self.persist(&tournaments).await {
            match previous {
                Some(previous) => tournaments.insert(key, previous),
                None => tournaments.remove(&key),
            };
            return Err(err);
        }
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
        let key = (guild_id, name.to_string());
        let Some(removed) = tournaments.remove(&key) else {
            return Ok(false);
        };
        if let Err(err) = self.persist(&tournaments).await {
            tournaments.insert(key, removed);
            return Err(err);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "guild_brackets_{}_{}.json",
            tag,
            std::process::id()
        ))
    }

    #[tokio::test]
    async fn test_open_creates_empty_document() {
        let path = temp_store_path("create");
        let _ = tokio::fs::remove_file(&path).await;

        let store = JsonFileStore::open(&path).await.unwrap();
        assert!(store.list(1).await.unwrap().is_empty());

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(contents, "{}");

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_survives_reopen() {
        let path = temp_store_path("reopen");
        let _ = tokio::fs::remove_file(&path).await;

        {
            let store = JsonFileStore::open(&path).await.unwrap();
            let mut t = Tournament::new(5, "Cup", 4, 1).unwrap();
            t.add_participant(20, "Ash", "a").unwrap();
            store.save(&t).await.unwrap();
        }

        let store = JsonFileStore::open(&path).await.unwrap();
        let loaded = store.get(5, "Cup").await.unwrap().unwrap();
        assert_eq!(loaded.participants.len(), 1);
        assert_eq!(loaded.participants[0].display_name, "Ash");
        assert_eq!(loaded.matches.len(), 3);

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_delete_rewrites_document() {
        let path = temp_store_path("delete");
        let _ = tokio::fs::remove_file(&path).await;

        let store = JsonFileStore::open(&path).await.unwrap();
        store
            .save(&Tournament::new(1, "Cup", 2, 1).unwrap())
            .await
            .unwrap();
        assert!(store.delete(1, "Cup").await.unwrap());
        assert!(!store.delete(1, "Cup").await.unwrap());

        let store = JsonFileStore::open(&path).await.unwrap();
        assert!(store.get(1, "Cup").await.unwrap().is_none());

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_failed_write_rolls_back_map() {
        let dir = std::env::temp_dir().join(format!(
            "guild_brackets_rollback_{}",
            std::process::id()
        ));
        let path = dir.join("store.json");
        let _ = tokio::fs::remove_dir_all(&dir).await;

        let store = JsonFileStore::open(&path).await.unwrap();
        let mut cup = Tournament::new(1, "Cup", 4, 1).unwrap();
        store.save(&cup).await.unwrap();

        // Pull the document out from under the store; writes now fail.
        tokio::fs::remove_dir_all(&dir).await.unwrap();

        // A failed insert leaves no trace for later reads.
        assert!(
            store
                .save(&Tournament::new(1, "Open", 4, 1).unwrap())
                .await
                .is_err()
        );
        assert!(store.get(1, "Open").await.unwrap().is_none());

        // A failed replace restores the previous snapshot.
        cup.add_participant(20, "Ash", "a").unwrap();
        assert!(store.save(&cup).await.is_err());
        let kept = store.get(1, "Cup").await.unwrap().unwrap();
        assert!(kept.participants.is_empty());

        // A failed delete keeps the entry.
        assert!(store.delete(1, "Cup").await.is_err());
        assert!(store.get(1, "Cup").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_invalid_guild_key_rejected() {
        let path = temp_store_path("badkey");
        tokio::fs::write(&path, br#"{"not-a-guild": {}}"#)
            .await
            .unwrap();

        let result = JsonFileStore::open(&path).await;
        assert!(matches!(result, Err(StoreError::InvalidGuildKey(_))));

        let _ = tokio::fs::remove_file(&path).await;
    }
}
