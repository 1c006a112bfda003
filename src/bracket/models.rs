//! Bracket entity types: participants and matches.
//!
//! Matches reference participants by `user_id` rather than holding them
//! directly, so the whole object graph serializes flat and reconstructs by
//! key lookup into the tournament's participant list.

use serde::{Deserialize, Serialize};

/// Guild ID type (external identity of the community server)
pub type GuildId = u64;

/// User ID type (external identity key, unique within a tournament)
pub type UserId = u64;

/// Match ID type, unique within a tournament. The final is always match 1.
pub type MatchId = u32;

/// A registered tournament participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// External identity key
    pub user_id: UserId,
    /// Name shown in bracket listings
    pub display_name: String,
    /// Opaque avatar reference for renderers (URL or asset key)
    pub avatar_ref: String,
    /// Matches won through recorded results (byes do not count)
    pub wins: u32,
    /// Matches lost through recorded results
    pub losses: u32,
}

impl Participant {
    pub fn new(user_id: UserId, display_name: impl Into<String>, avatar_ref: impl Into<String>) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            avatar_ref: avatar_ref.into(),
            wins: 0,
            losses: 0,
        }
    }
}

/// Which of a match's two slots a participant occupies.
///
/// A feeder match at an odd position fills the upper slot of its parent,
/// an even position fills the lower slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slot {
    Upper,
    Lower,
}

impl Slot {
    /// Slot fed by a child match at the given position.
    pub fn for_feeder_position(position: u32) -> Self {
        if position % 2 == 1 { Slot::Upper } else { Slot::Lower }
    }
}

/// A single node of the elimination tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Unique within the tournament
    pub match_id: MatchId,
    /// 1 = earliest round, the maximum round is the final
    pub round_num: u32,
    /// 1-based slot index within the round
    pub position: u32,
    /// Upper participant slot
    pub participant1: Option<UserId>,
    /// Lower participant slot
    pub participant2: Option<UserId>,
    /// Set when the match resolves (result or bye)
    pub winner: Option<UserId>,
    /// Set when the match resolves with both slots filled
    pub loser: Option<UserId>,
    /// Match the winner advances into; `None` only for the final
    pub next_match_id: Option<MatchId>,
    /// Whether the match has resolved
    pub completed: bool,
}

impl Match {
    pub fn new(match_id: MatchId, round_num: u32, position: u32) -> Self {
        Self {
            match_id,
            round_num,
            position,
            participant1: None,
            participant2: None,
            winner: None,
            loser: None,
            next_match_id: None,
            completed: false,
        }
    }

    /// Both slots assigned and no result recorded yet.
    pub fn is_playable(&self) -> bool {
        !self.completed && self.participant1.is_some() && self.participant2.is_some()
    }

    /// Whether the given user occupies either slot.
    pub fn involves(&self, user_id: UserId) -> bool {
        self.participant1 == Some(user_id) || self.participant2 == Some(user_id)
    }

    /// The occupant of a slot.
    pub fn slot(&self, slot: Slot) -> Option<UserId> {
        match slot {
            Slot::Upper => self.participant1,
            Slot::Lower => self.participant2,
        }
    }

    /// Assign a participant to a slot.
    pub fn set_slot(&mut self, slot: Slot, user_id: UserId) {
        match slot {
            Slot::Upper => self.participant1 = Some(user_id),
            Slot::Lower => self.participant2 = Some(user_id),
        }
    }

    /// The single occupant when exactly one slot is filled.
    pub fn lone_participant(&self) -> Option<(Slot, UserId)> {
        match (self.participant1, self.participant2) {
            (Some(user_id), None) => Some((Slot::Upper, user_id)),
            (None, Some(user_id)) => Some((Slot::Lower, user_id)),
            _ => None,
        }
    }

    /// The empty slot when exactly one slot is filled.
    pub fn open_slot(&self) -> Option<Slot> {
        self.lone_participant().map(|(taken, _)| match taken {
            Slot::Upper => Slot::Lower,
            Slot::Lower => Slot::Upper,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_for_feeder_position() {
        assert_eq!(Slot::for_feeder_position(1), Slot::Upper);
        assert_eq!(Slot::for_feeder_position(2), Slot::Lower);
        assert_eq!(Slot::for_feeder_position(3), Slot::Upper);
        assert_eq!(Slot::for_feeder_position(4), Slot::Lower);
    }

    #[test]
    fn test_match_playable_requires_both_slots() {
        let mut m = Match::new(2, 1, 1);
        assert!(!m.is_playable());

        m.set_slot(Slot::Upper, 10);
        assert!(!m.is_playable());
        assert_eq!(m.lone_participant(), Some((Slot::Upper, 10)));
        assert_eq!(m.open_slot(), Some(Slot::Lower));

        m.set_slot(Slot::Lower, 20);
        assert!(m.is_playable());
        assert_eq!(m.lone_participant(), None);
        assert_eq!(m.open_slot(), None);

        m.completed = true;
        assert!(!m.is_playable());
    }

    #[test]
    fn test_match_involves() {
        let mut m = Match::new(3, 1, 2);
        m.set_slot(Slot::Upper, 7);
        assert!(m.involves(7));
        assert!(!m.involves(8));
    }
}
