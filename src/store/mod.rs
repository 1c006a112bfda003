//! Persistence boundary for tournaments.
//!
//! The engine itself never performs I/O; callers persist through the
//! [`TournamentStore`] trait, keyed by `(guild_id, name)`. Two
//! implementations ship with the crate:
//! - [`MemoryStore`]: in-process map, for tests and ephemeral deployments
//! - [`JsonFileStore`]: a single JSON document on disk, rewritten on every
//!   mutation

pub mod json_file;
pub mod repository;

pub use json_file::JsonFileStore;
pub use repository::{MemoryStore, StoreError, StoreResult, TournamentStore};
