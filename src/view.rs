//! Read-model for bracket renderers.
//!
//! The engine does not draw anything; it exposes a serializable view with
//! everything an external renderer needs (display names, avatar
//! references, round and slot layout, winner flags). Rounds come out
//! ascending, matches within a round ordered by position.

use serde::Serialize;

use crate::bracket::{MatchId, Slot, Tournament, UserId};

/// One participant slot of a match, resolved to display data.
#[derive(Debug, Clone, Serialize)]
pub struct SlotView {
    pub user_id: UserId,
    pub display_name: String,
    pub avatar_ref: String,
    /// Whether this participant won the match
    pub is_winner: bool,
}

/// One match of the bracket.
#[derive(Debug, Clone, Serialize)]
pub struct MatchView {
    pub match_id: MatchId,
    pub position: u32,
    pub participant1: Option<SlotView>,
    pub participant2: Option<SlotView>,
    pub completed: bool,
    pub next_match_id: Option<MatchId>,
}

/// One round of the bracket, matches ordered by position.
#[derive(Debug, Clone, Serialize)]
pub struct RoundView {
    pub round_num: u32,
    pub matches: Vec<MatchView>,
}

/// Complete renderable snapshot of a tournament bracket.
#[derive(Debug, Clone, Serialize)]
pub struct BracketView {
    pub name: String,
    pub current_round: u32,
    pub started: bool,
    pub completed: bool,
    pub champion: Option<SlotView>,
    pub rounds: Vec<RoundView>,
}

impl BracketView {
    /// Build a view from the live tournament state.
    pub fn from_tournament(tournament: &Tournament) -> Self {
        let num_rounds = tournament.num_rounds();
        let rounds = (1..=num_rounds)
            .map(|round_num| {
                let mut matches: Vec<MatchView> = tournament
                    .matches
                    .values()
                    .filter(|m| m.round_num == round_num)
                    .map(|m| MatchView {
                        match_id: m.match_id,
                        position: m.position,
                        participant1: slot_view(tournament, m.slot(Slot::Upper), m.winner),
                        participant2: slot_view(tournament, m.slot(Slot::Lower), m.winner),
                        completed: m.completed,
                        next_match_id: m.next_match_id,
                    })
                    .collect();
                matches.sort_by_key(|m| m.position);
                RoundView { round_num, matches }
            })
            .collect();

        Self {
            name: tournament.name.clone(),
            current_round: tournament.current_round,
            started: tournament.started,
            completed: tournament.completed,
            champion: tournament
                .champion()
                .and_then(|p| slot_view(tournament, Some(p.user_id), Some(p.user_id))),
            rounds,
        }
    }
}

fn slot_view(
    tournament: &Tournament,
    occupant: Option<UserId>,
    winner: Option<UserId>,
) -> Option<SlotView> {
    let user_id = occupant?;
    let participant = tournament.participant(user_id)?;
    Some(SlotView {
        user_id,
        display_name: participant.display_name.clone(),
        avatar_ref: participant.avatar_ref.clone(),
        is_winner: winner == Some(user_id),
    })
}
