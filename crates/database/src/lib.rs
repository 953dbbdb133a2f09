//! # Commish Database Crate
//!
//! This crate is the league's permanent archive on PostgreSQL: the imported
//! history and the narrative cache.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** Encapsulates all database-specific logic. The rest of the
//!   application sees core types and a [`HistoryData`](analytics::HistoryData)
//!   snapshot, never SQL.
//! - **Runtime-Checked Queries:** Uses `sqlx::query_as` with `FromRow` row types, so
//!   the workspace builds without a live database. The schema lives in the embedded
//!   migrations.
//! - **Asynchronous & Pooled:** All operations are asynchronous over a shared
//!   `PgPool`; the history snapshot loads every table concurrently.
//!
//! ## Public API
//!
//! - `connect`: The async function to establish the database connection pool.
//! - `run_migrations`: Applies the embedded migrations.
//! - `DbRepository`: Holds the pool; loads history, imports exports and implements
//!   the narrative cache store.
//! - `LeagueExport`: The JSON export accepted by the importer.
//! - `DbError`: The specific error types that can be returned from this crate.

pub mod cache;
pub mod connection;
pub mod error;
pub mod import;
pub mod repository;

pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use import::{ImportSummary, LeagueExport};
pub use repository::DbRepository;
