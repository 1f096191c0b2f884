//! Session history loading.
//!
//! Merges recent session history from both the WAL and the CSV archive so
//! the stats surface sees every logged session regardless of rollup timing.

use crate::{ReadingSession, Result};
use chrono::{DateTime, Duration, Utc};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use uuid::Uuid;

/// CSV row format for reading archived sessions
#[derive(Debug, Deserialize)]
struct CsvRow {
    id: String,
    book_id: String,
    logged_at: String,
    start_page: u32,
    end_page: u32,
    minutes_spent: u32,
    points_awarded: u32,
    estimated_minutes: Option<f64>,
}

impl TryFrom<CsvRow> for ReadingSession {
    type Error = crate::Error;

    fn try_from(row: CsvRow) -> Result<Self> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| crate::Error::Other(format!("Invalid UUID: {}", e)))?;
        let book_id = Uuid::parse_str(&row.book_id)
            .map_err(|e| crate::Error::Other(format!("Invalid UUID: {}", e)))?;

        let logged_at = DateTime::parse_from_rfc3339(&row.logged_at)
            .map_err(|e| crate::Error::Other(format!("Invalid date: {}", e)))?
            .with_timezone(&Utc);

        Ok(ReadingSession {
            id,
            book_id,
            logged_at,
            start_page: row.start_page,
            end_page: row.end_page,
            minutes_spent: row.minutes_spent,
            points_awarded: row.points_awarded,
            estimated_minutes: row.estimated_minutes,
        })
    }
}

/// Load sessions from the last N days from both WAL and CSV
///
/// Returns sessions sorted by logged_at (newest first), deduplicated by id
/// for sessions that appear in both WAL and CSV.
pub fn load_recent_sessions(
    wal_path: &Path,
    csv_path: &Path,
    days: i64,
) -> Result<Vec<ReadingSession>> {
    let cutoff = Utc::now() - Duration::days(days);
    let mut sessions = Vec::new();
    let mut seen_ids = HashSet::new();

    if wal_path.exists() {
        let wal_sessions = crate::wal::read_sessions(wal_path)?;
        for session in wal_sessions {
            if session.logged_at >= cutoff {
                seen_ids.insert(session.id);
                sessions.push(session);
            }
        }
        tracing::debug!("Loaded {} sessions from WAL", sessions.len());
    }

    if csv_path.exists() {
        let csv_sessions = load_sessions_from_csv(csv_path)?;
        let mut csv_count = 0;
        for session in csv_sessions {
            if session.logged_at >= cutoff && !seen_ids.contains(&session.id) {
                seen_ids.insert(session.id);
                sessions.push(session);
                csv_count += 1;
            }
        }
        tracing::debug!("Loaded {} sessions from CSV", csv_count);
    }

    sessions.sort_by(|a, b| b.logged_at.cmp(&a.logged_at));

    tracing::info!(
        "Loaded {} total sessions from last {} days",
        sessions.len(),
        days
    );

    Ok(sessions)
}

/// Load all sessions from a CSV file
///
/// Rows that fail to parse are skipped with a warning.
fn load_sessions_from_csv(path: &Path) -> Result<Vec<ReadingSession>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;

    let mut sessions = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        match result {
            Ok(row) => match ReadingSession::try_from(row) {
                Ok(session) => sessions.push(session),
                Err(e) => {
                    tracing::warn!("Failed to parse CSV row: {}", e);
                }
            },
            Err(e) => {
                tracing::warn!("Failed to deserialize CSV row: {}", e);
            }
        }
    }

    Ok(sessions)
}

/// Total pages covered by a set of sessions
pub fn total_pages(sessions: &[ReadingSession]) -> u64 {
    sessions
        .iter()
        .map(|s| u64::from(s.end_page.saturating_sub(s.start_page)))
        .sum()
}
