//! Best-score persistence
//!
//! Two scalar keys, each stored as a single base-10 integer. Reads never
//! fail (missing or corrupt data reads as 0); writes are best-effort.

pub mod store;

pub use store::{FileScoreStore, MemoryScoreStore, ScoreStore};

/// Best Endless score
pub const ENDLESS_BEST_KEY: &str = "endless_best";
/// Best Rogue score
pub const ROGUE_BEST_KEY: &str = "rogue_best";
