//! Single-elimination bracket engine.
//!
//! This module provides the tournament lifecycle:
//! - Bracket skeleton construction for sizes 2..=64
//! - Participant registration and removal
//! - Random seeding with recursive bye auto-advancement
//! - Match result recording and winner advancement
//! - Completion detection and playable-match queries
//!
//! ## Example
//!
//! ```
//! use guild_brackets::bracket::Tournament;
//!
//! let mut cup = Tournament::new(1, "Weekly Cup", 4, 10)?;
//! cup.add_participant(10, "Ash", "avatars/ash.png")?;
//! cup.add_participant(11, "Misty", "avatars/misty.png")?;
//! cup.start()?;
//!
//! let playable = cup.current_matches();
//! assert_eq!(playable.len(), 1);
//! # Ok::<(), guild_brackets::bracket::BracketError>(())
//! ```

pub mod engine;
pub mod errors;
pub mod manager;
pub mod models;

pub use engine::{MAX_SIZE, MIN_PARTICIPANTS, MIN_SIZE, Tournament};
pub use errors::{BracketError, BracketResult};
pub use manager::TournamentManager;
pub use models::{GuildId, Match, MatchId, Participant, Slot, UserId};
