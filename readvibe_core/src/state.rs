//! Account state persistence with file locking.
//!
//! The whole account (profile, goals, statistics, library) lives in one JSON
//! file, written atomically and guarded with file locks so concurrent
//! invocations for the same account cannot interleave partial writes. The
//! [`AccountState::update`] helper is the read-modify-write boundary every
//! ledger commit goes through.

use crate::{Book, Error, ReadingGoals, ReadingProfile, Result, UserStats};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Everything persisted for one account
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct AccountState {
    #[serde(default)]
    pub profile: ReadingProfile,

    #[serde(default)]
    pub goals: ReadingGoals,

    #[serde(default)]
    pub stats: UserStats,

    #[serde(default)]
    pub books: Vec<Book>,
}

impl AccountState {
    /// Find a book by id prefix or exact (case-insensitive) title
    pub fn find_book(&self, key: &str) -> Option<&Book> {
        let key_lower = key.to_lowercase();
        self.books
            .iter()
            .find(|b| b.id.to_string().starts_with(&key_lower))
            .or_else(|| {
                self.books
                    .iter()
                    .find(|b| b.title.to_lowercase() == key_lower)
            })
    }

    /// Mutable variant of [`find_book`](Self::find_book)
    pub fn find_book_mut(&mut self, key: &str) -> Option<&mut Book> {
        let key_lower = key.to_lowercase();
        if let Some(idx) = self
            .books
            .iter()
            .position(|b| b.id.to_string().starts_with(&key_lower))
        {
            return self.books.get_mut(idx);
        }
        let idx = self
            .books
            .iter()
            .position(|b| b.title.to_lowercase() == key_lower)?;
        self.books.get_mut(idx)
    }

    /// Remove a book from the library, returning it if found
    ///
    /// The PDF file on disk is left in place.
    pub fn remove_book(&mut self, key: &str) -> Option<Book> {
        let id = self.find_book(key)?.id;
        let idx = self.books.iter().position(|b| b.id == id)?;
        Some(self.books.remove(idx))
    }

    /// Load account state from a file with shared locking
    ///
    /// Returns default state if the file doesn't exist.
    /// If the file is corrupted, logs a warning and returns default state.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No account file found, using default state");
            return Ok(Self::default());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open account file {:?}: {}. Using defaults.", path, e);
                return Ok(Self::default());
            }
        };

        // Acquire shared lock for reading
        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock account file {:?}: {}. Using defaults.", path, e);
            return Ok(Self::default());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!("Failed to read account file {:?}: {}. Using defaults.", path, e);
            return Ok(Self::default());
        }

        file.unlock()?;

        match serde_json::from_str::<AccountState>(&contents) {
            Ok(state) => {
                tracing::debug!("Loaded account state from {:?}", path);
                Ok(state)
            }
            Err(e) => {
                tracing::warn!("Failed to parse account file {:?}: {}. Using defaults.", path, e);
                Ok(Self::default())
            }
        }
    }

    /// Save account state to a file with exclusive locking
    ///
    /// Atomically writes state by writing to a temp file, syncing to disk,
    /// and renaming over the original.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Unique temp file in the same directory for atomic rename
        let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "account path missing parent")
        })?)?;

        // Exclusive lock on the temp file serializes concurrent writers
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved account state to {:?}", path);
        Ok(())
    }

    /// Load state, modify it, and save it back atomically
    ///
    /// The read-modify-write pattern every ledger commit uses: state for a
    /// single account is only ever mutated inside this boundary.
    pub fn update<F>(path: &Path, f: F) -> Result<Self>
    where
        F: FnOnce(&mut AccountState) -> Result<()>,
    {
        let mut state = Self::load(path)?;
        f(&mut state)?;
        state.save(path)?;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BookProgress;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_book(title: &str) -> Book {
        Book {
            id: Uuid::new_v4(),
            title: title.into(),
            author: "Unknown".into(),
            pages: 120,
            pdf_path: "/tmp/sample.pdf".into(),
            added_at: Utc::now(),
            progress: BookProgress::default(),
        }
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state_path = temp_dir.path().join("account.json");

        let mut state = AccountState::default();
        state.profile.words_per_minute = 250;
        state.stats.points = 42;
        state.books.push(sample_book("Dune"));

        state.save(&state_path).unwrap();
        let loaded = AccountState::load(&state_path).unwrap();

        assert_eq!(loaded.profile.words_per_minute, 250);
        assert_eq!(loaded.stats.points, 42);
        assert_eq!(loaded.books.len(), 1);
        assert_eq!(loaded.books[0].title, "Dune");
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state = AccountState::load(&temp_dir.path().join("nonexistent.json")).unwrap();
        assert_eq!(state.profile.words_per_minute, 200);
        assert!(state.books.is_empty());
    }

    #[test]
    fn test_corrupted_state_degrades_to_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state_path = temp_dir.path().join("corrupted.json");
        std::fs::write(&state_path, "{ invalid json }").unwrap();

        let state = AccountState::load(&state_path).unwrap();
        assert!(state.books.is_empty());
        assert_eq!(state.stats, UserStats::default());
    }

    #[test]
    fn test_update_pattern() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state_path = temp_dir.path().join("account.json");

        AccountState::default().save(&state_path).unwrap();

        AccountState::update(&state_path, |state| {
            state.goals.weekly = 300;
            Ok(())
        })
        .unwrap();

        let loaded = AccountState::load(&state_path).unwrap();
        assert_eq!(loaded.goals.weekly, 300);
    }

    #[test]
    fn test_find_book_by_title_and_id_prefix() {
        let mut state = AccountState::default();
        state.books.push(sample_book("Dune"));
        state.books.push(sample_book("Emma"));

        assert!(state.find_book("dune").is_some());
        assert!(state.find_book("Emma").is_some());
        assert!(state.find_book("missing").is_none());

        let id = state.books[1].id.to_string();
        let found = state.find_book(&id[..8]).unwrap();
        assert_eq!(found.title, "Emma");
    }

    #[test]
    fn test_remove_book() {
        let mut state = AccountState::default();
        state.books.push(sample_book("Dune"));

        let removed = state.remove_book("Dune").unwrap();
        assert_eq!(removed.title, "Dune");
        assert!(state.books.is_empty());
        assert!(state.remove_book("Dune").is_none());
    }

    #[test]
    fn test_atomic_save_leaves_no_stray_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state_path = temp_dir.path().join("account.json");

        AccountState::default().save(&state_path).unwrap();

        assert!(state_path.exists());
        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "account.json")
            .collect();
        assert!(extras.is_empty(), "Expected only account.json, found: {:?}", extras);
    }
}
