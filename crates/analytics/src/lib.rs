//! # Commish Analytics
//!
//! Every derived statistic the dashboard shows: standings, record books,
//! power rankings, luck, head-to-head, draft grades and the NFL, player and
//! transaction rollups.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** This crate has no knowledge of the database or the web. It
//!   depends only on `core-types` and on `configuration` for the power ranking
//!   weights.
//! - **Snapshot In, Views Out:** Callers load a [`LeagueHistory`] once and the
//!   aggregations reduce over it. Every view is `Serialize` and is the wire
//!   shape the API returns.
//! - **Deterministic:** Rows are put into a canonical order when the snapshot is
//!   built and every sort carries an explicit tiebreak.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: Resolves seasons and members and runs the aggregations.
//! - `LeagueHistory` / `HistoryData`: The indexed league snapshot.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

pub mod draft;
pub mod engine;
pub mod error;
pub mod h2h;
pub mod history;
pub mod league;
pub mod luck;
pub mod matchups;
pub(crate) mod math;
pub mod members;
pub mod nfl;
pub mod players;
pub mod power;
pub mod records;
pub mod standings;
pub mod transactions;

#[cfg(test)]
mod testing;

pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use history::{HistoryData, LeagueHistory};
