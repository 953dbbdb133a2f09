//! Route handlers, one module per API area.
//!
//! Each handler validates its parameters first, then loads a snapshot and
//! hands it to the analytics engine, so malformed requests never touch the
//! database.

pub mod ai;
pub mod drafts;
pub mod league;
pub mod matchups;
pub mod members;
pub mod nfl;
pub mod players;
pub mod records;
