//! Read-time estimation from page text metrics.
//!
//! A page's estimate scales the word count by the reader's speed and a
//! difficulty factor derived from word-length statistics. Range estimates sum
//! per-page estimates, skipping pages whose text is unavailable.

use crate::document::PageSource;
use crate::metrics::page_metrics;
use crate::PageMetrics;

/// Reading speed assumed when the caller supplies none
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 200;

/// Token time cost for a page with no extractable words
///
/// Keeps empty pages from being free: a zero-cost page would let any claim
/// over it pass the ratio check.
pub const EMPTY_PAGE_MINUTES: f64 = 0.1;

/// Estimate minutes to read one page
///
/// `words_per_minute` of 0 falls back to [`DEFAULT_WORDS_PER_MINUTE`].
pub fn estimate_page(metrics: &PageMetrics, words_per_minute: u32) -> f64 {
    if metrics.word_count == 0 {
        return EMPTY_PAGE_MINUTES;
    }

    let wpm = if words_per_minute == 0 {
        DEFAULT_WORDS_PER_MINUTE
    } else {
        words_per_minute
    };

    // Long words and a high average word length slow reading down
    let difficulty = 1.0
        + 0.35 * metrics.long_word_ratio
        + ((metrics.average_word_length - 5.0) / 10.0).max(0.0);

    metrics.word_count as f64 / wpm as f64 * difficulty
}

/// Estimate total minutes for the 0-based page indices `[start, end)`
///
/// Pages whose text is unavailable contribute 0 and are skipped; the sum
/// never aborts. A result of exactly 0.0 means estimation was unavailable for
/// the whole range (empty span or no readable page), not that the range is
/// free to read — the validator treats it as a missing estimate.
pub fn estimate_range(
    source: &dyn PageSource,
    start_index: usize,
    end_index: usize,
    words_per_minute: u32,
) -> f64 {
    let mut total = 0.0;

    for page_index in start_index..end_index {
        match page_metrics(source, page_index) {
            Ok(metrics) => total += estimate_page(&metrics, words_per_minute),
            Err(reason) => {
                tracing::debug!("Skipping page {} in range estimate: {}", page_index, reason);
            }
        }
    }

    total
}
