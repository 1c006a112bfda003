//! Single-elimination tournament engine.
//!
//! A [`Tournament`] owns its participants and the full match graph. All
//! operations are synchronous, all-or-nothing state transitions: every
//! public method validates first and either applies the whole transition or
//! returns a [`BracketError`] leaving the tournament untouched. The caller
//! is expected to serialize mutations per tournament; persistence happens
//! outside the engine.

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::errors::{BracketError, BracketResult};
use super::models::{GuildId, Match, MatchId, Participant, Slot, UserId};

/// Smallest allowed tournament size
pub const MIN_SIZE: usize = 2;
/// Largest allowed tournament size
pub const MAX_SIZE: usize = 64;
/// Participants required before a tournament may start
pub const MIN_PARTICIPANTS: usize = 2;

/// A single-elimination tournament.
///
/// The bracket skeleton is built at construction time for the declared
/// `size`: a complete binary tree with `ceil(log2(size))` rounds. When
/// `size` is not a power of two the excess leaf slots stay empty and
/// resolve as byes during seeding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    /// Guild the tournament belongs to; `(guild_id, name)` is the identity
    pub guild_id: GuildId,
    /// Tournament name, unique per guild
    pub name: String,
    /// Maximum participant count (2..=64)
    pub size: usize,
    /// User who created the tournament
    pub creator_id: UserId,
    /// Earliest round with an incomplete match (informational)
    pub current_round: u32,
    /// Whether seeding has happened; freezes the participant list
    pub started: bool,
    /// Whether the final has been scored
    pub completed: bool,
    /// Lifecycle timestamps
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Registered participants, in registration order until seeded
    pub participants: Vec<Participant>,
    /// Match graph keyed by match id; the final is match 1
    pub matches: BTreeMap<MatchId, Match>,
}

impl Tournament {
    /// Create a tournament with an empty, pre-built bracket skeleton.
    pub fn new(
        guild_id: GuildId,
        name: impl Into<String>,
        size: usize,
        creator_id: UserId,
    ) -> BracketResult<Self> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(BracketError::InvalidSize(size));
        }

        let mut tournament = Self {
            guild_id,
            name: name.into(),
            size,
            creator_id,
            current_round: 1,
            started: false,
            completed: false,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            participants: Vec::new(),
            matches: BTreeMap::new(),
        };
        tournament.initialize_bracket();
        Ok(tournament)
    }

    /// Build the empty match tree.
    ///
    /// The final gets match id 1; earlier rounds are built from the
    /// semifinal round down to round 1, positions ascending, ids increasing
    /// in construction order. A match at position `p` feeds the match at
    /// position `ceil(p / 2)` in the next round.
    fn initialize_bracket(&mut self) {
        let rounds = self.num_rounds();

        let mut match_id: MatchId = 1;
        self.matches.insert(match_id, Match::new(match_id, rounds, 1));

        for round_num in (1..rounds).rev() {
            let matches_in_round = 1u32 << (rounds - round_num);
            for position in 1..=matches_in_round {
                match_id += 1;
                let mut m = Match::new(match_id, round_num, position);

                let parent_position = position.div_ceil(2);
                m.next_match_id = self
                    .matches
                    .values()
                    .find(|parent| {
                        parent.round_num == round_num + 1 && parent.position == parent_position
                    })
                    .map(|parent| parent.match_id);
                self.matches.insert(match_id, m);
            }
        }
    }

    /// Number of rounds in the bracket, derived from `size`.
    pub fn num_rounds(&self) -> u32 {
        // ceil(log2(size)); size >= 2 is enforced at construction
        (self.size as u32 - 1).ilog2() + 1
    }

    /// Whether registration has reached the declared size.
    pub fn is_full(&self) -> bool {
        self.participants.len() >= self.size
    }

    /// Register a participant. Rejected once the tournament is full,
    /// started, or the user is already registered.
    pub fn add_participant(
        &mut self,
        user_id: UserId,
        display_name: impl Into<String>,
        avatar_ref: impl Into<String>,
    ) -> BracketResult<()> {
        if self.started {
            return Err(BracketError::AlreadyStarted);
        }
        if self.is_full() {
            return Err(BracketError::TournamentFull { size: self.size });
        }
        if self.participants.iter().any(|p| p.user_id == user_id) {
            return Err(BracketError::AlreadyRegistered(user_id));
        }

        self.participants
            .push(Participant::new(user_id, display_name, avatar_ref));
        Ok(())
    }

    /// Remove a participant. Rejected after the tournament has started.
    pub fn remove_participant(&mut self, user_id: UserId) -> BracketResult<()> {
        if self.started {
            return Err(BracketError::AlreadyStarted);
        }
        let index = self
            .participants
            .iter()
            .position(|p| p.user_id == user_id)
            .ok_or(BracketError::ParticipantNotFound(user_id))?;
        self.participants.remove(index);
        Ok(())
    }

    /// Start the tournament: shuffle participants (pure random seeding),
    /// assign them pairwise into round-1 slots, and resolve byes.
    pub fn start(&mut self) -> BracketResult<()> {
        self.start_with_rng(&mut rand::rng())
    }

    /// [`Tournament::start`] with a caller-provided RNG, so tests can seed
    /// the shuffle deterministically.
    pub fn start_with_rng<R: Rng>(&mut self, rng: &mut R) -> BracketResult<()> {
        if self.started {
            return Err(BracketError::AlreadyStarted);
        }
        if self.participants.len() < MIN_PARTICIPANTS {
            return Err(BracketError::InsufficientParticipants {
                needed: MIN_PARTICIPANTS,
                current: self.participants.len(),
            });
        }

        self.participants.shuffle(rng);

        // Round-1 match ids in ascending position order.
        let mut first_round: Vec<MatchId> = self
            .matches
            .values()
            .filter(|m| m.round_num == 1)
            .map(|m| m.match_id)
            .collect();
        first_round.sort_by_key(|id| self.matches[id].position);

        // Participant at shuffled index i goes to match i / 2, upper slot
        // when i is even.
        let seeded: Vec<UserId> = self.participants.iter().map(|p| p.user_id).collect();
        for (i, user_id) in seeded.into_iter().enumerate() {
            let match_id = first_round[i / 2];
            let slot = if i % 2 == 0 { Slot::Upper } else { Slot::Lower };
            if let Some(m) = self.matches.get_mut(&match_id) {
                m.set_slot(slot, user_id);
            }
        }

        // Matches left with a single occupant resolve immediately as byes;
        // advancement can chain byes across several rounds.
        for match_id in first_round {
            let is_bye = self
                .matches
                .get(&match_id)
                .is_some_and(|m| !m.completed && m.lone_participant().is_some());
            if is_bye {
                self.resolve_bye(match_id);
            }
        }

        self.started = true;
        self.started_at = Some(Utc::now());
        self.refresh_current_round();
        Ok(())
    }

    /// Record a match result and advance the winner.
    ///
    /// Completing the maximum-round match completes the tournament.
    pub fn record_match_result(
        &mut self,
        match_id: MatchId,
        winner_user_id: UserId,
    ) -> BracketResult<()> {
        if !self.started {
            return Err(BracketError::NotStarted);
        }
        if self.completed {
            return Err(BracketError::AlreadyCompleted);
        }

        let m = self
            .matches
            .get(&match_id)
            .ok_or(BracketError::MatchNotFound(match_id))?;
        if m.completed {
            return Err(BracketError::MatchAlreadyScored(match_id));
        }
        let (Some(upper), Some(lower)) = (m.participant1, m.participant2) else {
            return Err(BracketError::MatchNotReady(match_id));
        };

        let loser_id = if winner_user_id == upper {
            lower
        } else if winner_user_id == lower {
            upper
        } else {
            return Err(BracketError::NotInMatch {
                match_id,
                user_id: winner_user_id,
            });
        };

        let round_num = m.round_num;
        if let Some(m) = self.matches.get_mut(&match_id) {
            m.winner = Some(winner_user_id);
            m.loser = Some(loser_id);
            m.completed = true;
        }
        if let Some(winner) = self.participant_mut(winner_user_id) {
            winner.wins += 1;
        }
        if let Some(loser) = self.participant_mut(loser_id) {
            loser.losses += 1;
        }

        self.advance_winner(match_id);

        if round_num == self.num_rounds() {
            self.completed = true;
            self.completed_at = Some(Utc::now());
        }
        self.refresh_current_round();
        Ok(())
    }

    /// Place a completed match's winner into the next match, auto-resolving
    /// the next match as a bye when its other slot can never be filled.
    fn advance_winner(&mut self, match_id: MatchId) {
        let Some(m) = self.matches.get(&match_id) else {
            return;
        };
        let (Some(winner), Some(next_match_id)) = (m.winner, m.next_match_id) else {
            // The final, or an unresolved match; nothing to advance.
            return;
        };
        let slot = Slot::for_feeder_position(m.position);

        if let Some(next) = self.matches.get_mut(&next_match_id) {
            next.set_slot(slot, winner);
        }

        let open_slot = self
            .matches
            .get(&next_match_id)
            .filter(|next| !next.completed)
            .and_then(|next| next.open_slot());
        if let Some(open) = open_slot
            && !self.slot_can_fill(next_match_id, open)
        {
            self.resolve_bye(next_match_id);
        }
    }

    /// Complete a single-occupant match as a bye and advance its winner.
    ///
    /// A bye chain can reach all the way up to the final; resolving the
    /// final completes the tournament just like a recorded result would.
    fn resolve_bye(&mut self, match_id: MatchId) {
        let Some(m) = self.matches.get_mut(&match_id) else {
            return;
        };
        let Some((_, user_id)) = m.lone_participant() else {
            return;
        };
        m.winner = Some(user_id);
        m.completed = true;
        let is_final = m.next_match_id.is_none();
        log::debug!(
            "Tournament '{}': match {} resolved as a bye for user {}",
            self.name,
            match_id,
            user_id
        );
        if is_final {
            self.completed = true;
            self.completed_at = Some(Utc::now());
            return;
        }
        self.advance_winner(match_id);
    }

    /// Whether the given slot of a match can still receive a participant,
    /// i.e. the feeder subtree for that slot can still produce a winner.
    ///
    /// Callers can use this to tell a pending opponent ("TBD") apart from
    /// a side of the bracket that will never produce one. Slots that can
    /// never fill opposite a lone participant are resolved as byes
    /// internally, so they only persist in fully empty matches.
    pub fn slot_can_fill(&self, match_id: MatchId, slot: Slot) -> bool {
        self.matches
            .values()
            .filter(|m| {
                m.next_match_id == Some(match_id) && Slot::for_feeder_position(m.position) == slot
            })
            .any(|feeder| self.can_produce_winner(feeder))
    }

    /// Whether a match will eventually have a winner: it already resolved,
    /// holds at least one participant, or some match below it does.
    fn can_produce_winner(&self, m: &Match) -> bool {
        if m.completed {
            return m.winner.is_some();
        }
        if m.participant1.is_some() || m.participant2.is_some() {
            return true;
        }
        self.matches
            .values()
            .filter(|feeder| feeder.next_match_id == Some(m.match_id))
            .any(|feeder| self.can_produce_winner(feeder))
    }

    /// Earliest round that still has an incomplete match; the final round
    /// once everything is resolved.
    fn refresh_current_round(&mut self) {
        self.current_round = self
            .matches
            .values()
            .filter(|m| !m.completed)
            .map(|m| m.round_num)
            .min()
            .unwrap_or_else(|| self.num_rounds());
    }

    /// Matches that are currently playable: both slots filled, no result
    /// yet. Empty unless the tournament is running.
    pub fn current_matches(&self) -> Vec<&Match> {
        if !self.started || self.completed {
            return Vec::new();
        }
        self.matches.values().filter(|m| m.is_playable()).collect()
    }

    /// All matches referencing the given participant, any state.
    pub fn participant_matches(&self, user_id: UserId) -> Vec<&Match> {
        self.matches
            .values()
            .filter(|m| m.involves(user_id))
            .collect()
    }

    /// Playable matches of the earliest round that still has one.
    pub fn next_round_matches(&self) -> Vec<&Match> {
        if !self.started || self.completed {
            return Vec::new();
        }
        let Some(round) = self
            .matches
            .values()
            .filter(|m| m.is_playable())
            .map(|m| m.round_num)
            .min()
        else {
            return Vec::new();
        };
        self.matches
            .values()
            .filter(|m| m.round_num == round && m.is_playable())
            .collect()
    }

    /// The final match (id 1).
    pub fn final_match(&self) -> Option<&Match> {
        self.matches.values().find(|m| m.next_match_id.is_none())
    }

    /// Look up a participant by id.
    pub fn participant(&self, user_id: UserId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.user_id == user_id)
    }

    fn participant_mut(&mut self, user_id: UserId) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.user_id == user_id)
    }

    /// The winner of the final, once the tournament has completed.
    pub fn champion(&self) -> Option<&Participant> {
        if !self.completed {
            return None;
        }
        self.final_match()
            .and_then(|m| m.winner)
            .and_then(|user_id| self.participant(user_id))
    }
}
