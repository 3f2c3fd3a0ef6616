#![forbid(unsafe_code)]

//! Core domain model and business logic for the Eternal Quest goal tracker.
//!
//! This crate provides:
//! - Goal variants (simple, eternal, checklist) and their event semantics
//! - The ledger (ordered goals plus running score and level)
//! - The tagged line format and file persistence
//! - Event journal and CSV rollup
//! - Quote selection, configuration and logging

pub mod error;
pub mod goal;
pub mod ledger;
pub mod codec;
pub mod quotes;
pub mod config;
pub mod logging;
pub mod store;
pub mod journal;
pub mod rollup;

// Re-export commonly used types
pub use error::{Error, Result};
pub use goal::{Goal, GoalDraft, GoalKind, GoalState, RecordOutcome};
pub use ledger::{level_for_score, EventReport, GoalDetail, Ledger, POINTS_PER_LEVEL};
pub use quotes::{FixedQuote, QuoteSource, RandomQuotes};
pub use config::Config;
pub use store::{load_ledger, load_or_default, save_ledger};
pub use journal::{read_events, EventRecord, EventSink, JsonlJournal};
