//! # Guild Brackets
//!
//! A single-elimination tournament bracket engine for guild community bots.
//!
//! This library owns the tournament lifecycle: registration, random
//! seeding, match graph construction, result recording, winner advancement
//! (including recursive bye auto-advancement), and completion detection.
//! The chat/command layer, HTTP plumbing, and image rendering live outside
//! this crate; persistence goes through an injected store trait and
//! presentation through a serializable read-model.
//!
//! ## Architecture
//!
//! A tournament moves through three lifecycle phases:
//!
//! - **Registration**: the bracket skeleton exists, participants join and
//!   leave freely up to the declared size
//! - **Running**: participants are shuffled into round-1 slots, byes
//!   auto-resolve, and results recorded per match advance winners toward
//!   the final
//! - **Completed**: the final has been scored; the bracket is read-only
//!
//! ## Core Modules
//!
//! - [`bracket`]: tournament engine, manager, and error taxonomy
//! - [`store`]: persistence boundary (in-memory and JSON-file stores)
//! - [`view`]: renderable bracket snapshot
//!
//! ## Example
//!
//! ```
//! use guild_brackets::Tournament;
//!
//! let mut cup = Tournament::new(1, "Badge Cup", 4, 10)?;
//! for (user_id, name) in [(10, "Ash"), (11, "Misty"), (12, "Brock"), (13, "May")] {
//!     cup.add_participant(user_id, name, "")?;
//! }
//! cup.start()?;
//!
//! while !cup.completed {
//!     let next = cup.current_matches()[0];
//!     let (match_id, winner) = (next.match_id, next.participant1.unwrap());
//!     cup.record_match_result(match_id, winner)?;
//! }
//! assert!(cup.champion().is_some());
//! # Ok::<(), guild_brackets::BracketError>(())
//! ```

/// Bracket engine: tournament lifecycle, match graph, and manager.
pub mod bracket;
pub use bracket::{
    BracketError, BracketResult, GuildId, MAX_SIZE, MIN_PARTICIPANTS, MIN_SIZE, Match, MatchId,
    Participant, Slot, Tournament, TournamentManager, UserId,
};

/// Persistence boundary: store trait and bundled implementations.
pub mod store;
pub use store::{JsonFileStore, MemoryStore, StoreError, StoreResult, TournamentStore};

/// Presentation boundary: renderable bracket snapshot.
pub mod view;
pub use view::{BracketView, MatchView, RoundView, SlotView};
