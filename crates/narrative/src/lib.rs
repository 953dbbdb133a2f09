//! # Commish Narrative
//!
//! LLM-written commentary for dashboard pages and blocks.
//!
//! ## Architectural Principles
//!
//! - **Trait Seams:** The LLM sits behind [`NarrativeClient`] and the cache behind
//!   [`NarrativeStore`]. The database crate implements the store on Postgres;
//!   tests use fakes.
//! - **Never Fails the Page:** A missing key, a timeout or an upstream error turns
//!   into `available: false`, not an error.
//! - **Content-Addressed Cache:** Narratives are cached under
//!   `"{kind}:{tone}:{context_hash}"`, so the same context in the same tone is only
//!   generated once.
//!
//! ## Public API
//!
//! - `Narrator`: Entry point for summaries, block insights (single or batched) and cache clearing.
//! - `Tone`, `PageKind`, `BlockKind`: The voices and prompt kinds on offer.
//! - `NarrativeError`: The specific error types that can be returned from this crate.

pub mod cache;
pub mod client;
pub mod error;
pub mod hashing;
pub mod narrator;
pub mod prompts;
pub mod tone;

pub use cache::{CachedNarrative, MemoryStore, NarrativeStore};
pub use client::{AnthropicClient, Completion, NarrativeClient};
pub use error::NarrativeError;
pub use narrator::{AiStatus, BatchResponse, BlockRequest, NarrativeResponse, Narrator};
pub use prompts::{BlockKind, PageKind};
pub use tone::{Tone, ToneOption};
