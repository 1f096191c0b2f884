//! CSV rollup functionality for archiving WAL sessions.
//!
//! Implements atomic WAL-to-CSV conversion with proper error handling to
//! prevent data loss.

use crate::{ReadingSession, Result};
use std::fs::OpenOptions;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
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

impl From<&ReadingSession> for CsvRow {
    fn from(session: &ReadingSession) -> Self {
        CsvRow {
            id: session.id.to_string(),
            book_id: session.book_id.to_string(),
            logged_at: session.logged_at.to_rfc3339(),
            start_page: session.start_page,
            end_page: session.end_page,
            minutes_spent: session.minutes_spent,
            points_awarded: session.points_awarded,
            estimated_minutes: session.estimated_minutes,
        }
    }
}

/// Roll up WAL sessions into CSV and archive the WAL atomically
///
/// Reads all sessions from the WAL, appends them to the CSV file (headers on
/// first write), fsyncs the CSV, then renames the WAL to `.wal.processed`.
/// The WAL is renamed rather than deleted so manual recovery stays possible.
pub fn wal_to_csv_and_archive(wal_path: &Path, csv_path: &Path) -> Result<usize> {
    let sessions = crate::wal::read_sessions(wal_path)?;

    if sessions.is_empty() {
        tracing::info!("No sessions in WAL to roll up");
        return Ok(0);
    }

    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)?;

    // Only the first write to the file gets headers
    let needs_headers = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    for session in &sessions {
        writer.serialize(CsvRow::from(session))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Wrote {} sessions to CSV", sessions.len());

    // CSV is synced; now the WAL can be archived
    let processed_path = wal_path.with_extension("wal.processed");
    std::fs::rename(wal_path, &processed_path)?;

    tracing::info!("Archived WAL to {:?}", processed_path);

    Ok(sessions.len())
}

/// Clean up old processed WAL files
///
/// Removes all `.wal.processed` files in the given directory.
pub fn cleanup_processed_wals(dir: &Path) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if let Some(extension) = path.extension() {
            if extension == "processed" {
                std::fs::remove_file(&path)?;
                tracing::debug!("Removed processed WAL: {:?}", path);
                count += 1;
            }
        }
    }

    if count > 0 {
        tracing::info!("Cleaned up {} processed WAL files", count);
    }

    Ok(count)
}
