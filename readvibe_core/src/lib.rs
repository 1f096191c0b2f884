#![forbid(unsafe_code)]

//! Core domain model and business logic for the ReadVibe reading tracker.
//!
//! This crate provides:
//! - Domain types (books, claims, stats, sessions)
//! - PDF page access and text metrics
//! - Read-time estimation and session plausibility validation
//! - Points and reward tiers
//! - Persistence (account state, WAL, CSV, history)

pub mod types;
pub mod error;
pub mod document;
pub mod metrics;
pub mod estimator;
pub mod validator;
pub mod points;
pub mod ledger;
pub mod rewards;
pub mod library;
pub mod config;
pub mod logging;
pub mod state;
pub mod wal;
pub mod csv_rollup;
pub mod history;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use document::{PageSource, PdfBook, Unavailable};
pub use estimator::{estimate_page, estimate_range, DEFAULT_WORDS_PER_MINUTE};
pub use ledger::apply_session;
pub use library::register_book;
pub use points::calc_points;
pub use rewards::{tier_for_points, GoalReport};
pub use state::AccountState;
pub use validator::{evaluate_claim, validate, ValidationPolicy};
pub use wal::{JsonlSink, SessionSink};
pub use history::load_recent_sessions;
