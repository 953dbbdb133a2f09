pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{Grade, LuckRating, TransactionType};
pub use error::CoreError;
pub use structs::{DraftPick, League, Matchup, Member, Season, TeamSeason, Transaction};
