//! Text metrics extraction.
//!
//! Turns raw page text into the word statistics consumed by the read-time
//! estimator. Tokens are whitespace-separated and must be entirely
//! alphanumeric to count as words, so stray punctuation and PDF control
//! residue never inflate the word count.

use crate::document::{PageSource, Unavailable};
use crate::PageMetrics;

/// Words longer than this many characters count as "long"
const LONG_WORD_CHARS: usize = 7;

impl PageMetrics {
    /// Compute word statistics for one page of text
    pub fn from_text(text: &str) -> Self {
        let words: Vec<&str> = text
            .split_whitespace()
            .filter(|w| w.chars().all(char::is_alphanumeric))
            .collect();

        let word_count = words.len();
        if word_count == 0 {
            return Self {
                word_count: 0,
                average_word_length: 0.0,
                long_word_ratio: 0.0,
            };
        }

        let total_chars: usize = words.iter().map(|w| w.chars().count()).sum();
        let long_words = words
            .iter()
            .filter(|w| w.chars().count() > LONG_WORD_CHARS)
            .count();

        Self {
            word_count,
            average_word_length: total_chars as f64 / word_count as f64,
            long_word_ratio: long_words as f64 / word_count as f64,
        }
    }
}

/// Extract metrics for a single page of a source
///
/// Propagates the source's [`Unavailable`] reason so callers can decide
/// whether to skip the page or surface the failure.
pub fn page_metrics(
    source: &dyn PageSource,
    page_index: usize,
) -> Result<PageMetrics, Unavailable> {
    let text = source.page_text(page_index)?;
    Ok(PageMetrics::from_text(&text))
}
