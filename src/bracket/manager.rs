//! Tournament manager: guild-scoped registry over an injected store.
//!
//! The manager owns no tournament state itself. Every operation loads the
//! tournament from the store, applies a synchronous engine mutation, and
//! saves back only when the mutation succeeded, so a rejected operation
//! never touches persisted state.

use std::sync::Arc;

use super::engine::Tournament;
use super::errors::{BracketError, BracketResult};
use super::models::{GuildId, MatchId, UserId};
use crate::store::TournamentStore;

/// Manager for all tournaments across guilds.
#[derive(Clone)]
pub struct TournamentManager {
    store: Arc<dyn TournamentStore>,
}

impl TournamentManager {
    /// Create a manager over the given store.
    pub fn new(store: Arc<dyn TournamentStore>) -> Self {
        Self { store }
    }

    /// Create a tournament with a pre-built bracket skeleton.
    ///
    /// Fails when the size is out of range or a tournament with this name
    /// already exists in the guild.
    pub async fn create_tournament(
        &self,
        guild_id: GuildId,
        name: &str,
        size: usize,
        creator_id: UserId,
    ) -> BracketResult<Tournament> {
        if self.store.get(guild_id, name).await?.is_some() {
            return Err(BracketError::NameTaken(name.to_string()));
        }

        let tournament = Tournament::new(guild_id, name, size, creator_id)?;
        self.store.save(&tournament).await?;
        log::info!(
            "Created tournament '{}' (size {}) in guild {}",
            name,
            size,
            guild_id
        );
        Ok(tournament)
    }

    /// Fetch a tournament by guild and name.
    pub async fn get_tournament(
        &self,
        guild_id: GuildId,
        name: &str,
    ) -> BracketResult<Tournament> {
        self.store
            .get(guild_id, name)
            .await?
            .ok_or_else(|| BracketError::TournamentNotFound(name.to_string()))
    }

    /// All tournaments in a guild.
    pub async fn list_tournaments(&self, guild_id: GuildId) -> BracketResult<Vec<Tournament>> {
        Ok(self.store.list(guild_id).await?)
    }

    /// Tournament names in a guild matching a case-insensitive substring
    /// filter. An empty filter matches everything.
    pub async fn tournament_names(
        &self,
        guild_id: GuildId,
        filter: &str,
    ) -> BracketResult<Vec<String>> {
        let needle = filter.to_lowercase();
        let names = self
            .store
            .list(guild_id)
            .await?
            .into_iter()
            .map(|t| t.name)
            .filter(|name| name.to_lowercase().contains(&needle))
            .collect();
        Ok(names)
    }

    /// Delete a tournament. Tournaments never expire on their own; this is
    /// the only way one goes away.
    pub async fn delete_tournament(&self, guild_id: GuildId, name: &str) -> BracketResult<()> {
        if !self.store.delete(guild_id, name).await? {
            return Err(BracketError::TournamentNotFound(name.to_string()));
        }
        log::info!("Deleted tournament '{}' in guild {}", name, guild_id);
        Ok(())
    }

    /// Register a player for a tournament.
    pub async fn register_player(
        &self,
        guild_id: GuildId,
        name: &str,
        user_id: UserId,
        display_name: &str,
        avatar_ref: &str,
    ) -> BracketResult<()> {
        let mut tournament = self.get_tournament(guild_id, name).await?;
        tournament.add_participant(user_id, display_name, avatar_ref)?;
        self.store.save(&tournament).await?;
        Ok(())
    }

    /// Remove a player from a tournament that has not started.
    pub async fn unregister_player(
        &self,
        guild_id: GuildId,
        name: &str,
        user_id: UserId,
    ) -> BracketResult<()> {
        let mut tournament = self.get_tournament(guild_id, name).await?;
        tournament.remove_participant(user_id)?;
        self.store.save(&tournament).await?;
        Ok(())
    }

    /// Seed and start a tournament.
    pub async fn start_tournament(&self, guild_id: GuildId, name: &str) -> BracketResult<()> {
        let mut tournament = self.get_tournament(guild_id, name).await?;
        tournament.start()?;
        self.store.save(&tournament).await?;
        log::info!(
            "Started tournament '{}' in guild {} with {} participants",
            name,
            guild_id,
            tournament.participants.len()
        );
        Ok(())
    }

    /// Record a match result and advance the winner.
    pub async fn record_match_result(
        &self,
        guild_id: GuildId,
        name: &str,
        match_id: MatchId,
        winner_user_id: UserId,
    ) -> BracketResult<()> {
        let mut tournament = self.get_tournament(guild_id, name).await?;
        tournament.record_match_result(match_id, winner_user_id)?;
        self.store.save(&tournament).await?;
        if tournament.completed {
            log::info!(
                "Tournament '{}' in guild {} completed; champion is user {:?}",
                name,
                guild_id,
                tournament.champion().map(|p| p.user_id)
            );
        }
        Ok(())
    }
}
