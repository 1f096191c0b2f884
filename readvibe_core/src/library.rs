//! Book registration.
//!
//! A book enters the library only after its PDF opens and reports a page
//! count, so every registered book is readable by the estimator.

use crate::document::{PageSource, PdfBook};
use crate::{Book, BookProgress, Error, Result};
use chrono::Utc;
use std::path::Path;
use uuid::Uuid;

/// Open the PDF at `path` and build a library entry for it
///
/// Fails with a typed error before any state change when the file cannot be
/// parsed or contains no pages.
pub fn register_book(path: &Path, title: &str, author: &str) -> Result<Book> {
    let pdf = PdfBook::open(path)?;
    let pages = pdf.page_count();
    if pages == 0 {
        return Err(Error::Book(format!(
            "{} contains no pages",
            path.display()
        )));
    }

    tracing::info!("Registered book {:?} ({} pages)", title, pages);

    Ok(Book {
        id: Uuid::new_v4(),
        title: title.to_string(),
        author: author.to_string(),
        pages: pages as u32,
        pdf_path: path.to_path_buf(),
        added_at: Utc::now(),
        progress: BookProgress::default(),
    })
}

/// Derive a book title from a file name, as a default for registration
pub fn title_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Untitled".to_string())
}
