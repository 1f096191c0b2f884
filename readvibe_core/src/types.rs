//! Core domain types for the ReadVibe reading tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Per-page text metrics
//! - Reading profile and goals
//! - Session claims and outcomes
//! - Cumulative account statistics and per-book progress
//! - The persisted reading session record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

// ============================================================================
// Page Metrics
// ============================================================================

/// Word statistics for a single page of text
///
/// Derived on demand by the metrics extractor; never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct PageMetrics {
    pub word_count: usize,
    pub average_word_length: f64,
    /// Fraction of words longer than the long-word cutoff, in [0, 1]
    pub long_word_ratio: f64,
}

// ============================================================================
// Profile and Goals
// ============================================================================

/// Per-account reading speed used by the read-time estimator
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadingProfile {
    #[serde(default = "default_words_per_minute")]
    pub words_per_minute: u32,
}

impl Default for ReadingProfile {
    fn default() -> Self {
        Self {
            words_per_minute: default_words_per_minute(),
        }
    }
}

fn default_words_per_minute() -> u32 {
    200
}

/// Page targets for goal tracking and reward eligibility
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadingGoals {
    #[serde(default = "default_daily_goal")]
    pub daily: u32,
    #[serde(default = "default_weekly_goal")]
    pub weekly: u32,
    #[serde(default = "default_monthly_goal")]
    pub monthly: u32,
}

impl Default for ReadingGoals {
    fn default() -> Self {
        Self {
            daily: default_daily_goal(),
            weekly: default_weekly_goal(),
            monthly: default_monthly_goal(),
        }
    }
}

fn default_daily_goal() -> u32 {
    30
}

fn default_weekly_goal() -> u32 {
    200
}

fn default_monthly_goal() -> u32 {
    800
}

// ============================================================================
// Session Claim and Outcome
// ============================================================================

/// A user-submitted reading session pending validation
///
/// The claimed span covers the 1-based pages `[start_page, end_page)`.
/// Transient: created per logging action and discarded after validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionClaim {
    pub book_id: Uuid,
    pub start_page: u32,
    pub end_page: u32,
    pub minutes_spent: u32,
}

impl SessionClaim {
    /// Number of pages the claim covers (0 when the span is empty or inverted)
    pub fn pages_read(&self) -> u32 {
        self.end_page.saturating_sub(self.start_page)
    }
}

/// Computed result of validating one claim
#[derive(Clone, Debug, PartialEq)]
pub struct SessionOutcome {
    pub accepted: bool,
    pub points_awarded: u32,
    /// Total estimated minutes for the claimed span, when estimation produced one
    pub estimated_minutes: Option<f64>,
}

impl SessionOutcome {
    pub fn rejected(estimated_minutes: Option<f64>) -> Self {
        Self {
            accepted: false,
            points_awarded: 0,
            estimated_minutes,
        }
    }
}

// ============================================================================
// Account Statistics and Book Progress
// ============================================================================

/// Cumulative per-account statistics
///
/// Mutated only by the session ledger on accepted sessions. The weekly and
/// monthly counters are plain accumulators; rollover is not handled here.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UserStats {
    pub total_pages: u64,
    /// Total minutes spent reading
    pub total_time: u64,
    pub points: u64,
    pub weekly_pages: u64,
    pub monthly_pages: u64,
}

/// Reading position within a single book
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct BookProgress {
    pub current_page: u32,
    pub pages_read: u64,
}

/// A registered book in the library
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub pages: u32,
    pub pdf_path: PathBuf,
    pub added_at: DateTime<Utc>,
    #[serde(default)]
    pub progress: BookProgress,
}

// ============================================================================
// Persisted Session Record
// ============================================================================

/// An accepted reading session, as appended to the WAL and archived to CSV
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ReadingSession {
    pub id: Uuid,
    pub book_id: Uuid,
    pub logged_at: DateTime<Utc>,
    pub start_page: u32,
    pub end_page: u32,
    pub minutes_spent: u32,
    pub points_awarded: u32,
    pub estimated_minutes: Option<f64>,
}
