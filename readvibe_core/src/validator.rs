//! Plausibility validation for reading session claims.
//!
//! A claim is compared against the text-derived estimate for its page span.
//! A real reader is never faster than the estimate but may be up to 3x
//! slower, so the accepted band is asymmetric. When no estimate is available
//! the behavior is governed by an explicit policy rather than an implicit
//! "missing data passes" path.

use crate::document::PageSource;
use crate::estimator::estimate_range;
use crate::points::calc_points;
use crate::{ReadingProfile, SessionClaim, SessionOutcome};
use serde::{Deserialize, Serialize};

/// Lower bound of the accepted minutes-to-estimate ratio
pub const MIN_PLAUSIBLE_RATIO: f64 = 1.0;

/// Upper bound of the accepted minutes-to-estimate ratio
pub const MAX_PLAUSIBLE_RATIO: f64 = 3.0;

// Speed fallback used when no estimate is available
const FALLBACK_MIN_MINUTES: u32 = 2;
const FALLBACK_MIN_PAGES_PER_MINUTE: f64 = 0.3;
const FALLBACK_MAX_PAGES_PER_MINUTE: f64 = 0.7;

/// What to do with a claim when estimation is unavailable
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// Accept claims unconditionally when the range estimate is unavailable.
    /// Off by default: the speed fallback applies instead.
    #[serde(default)]
    pub permissive_on_estimation_failure: bool,
}

/// Decide whether a claim is believable given its range estimate
///
/// `estimated_total_minutes == 0.0` is treated as "estimation unavailable",
/// never as "zero time required".
pub fn validate(
    claim: &SessionClaim,
    estimated_total_minutes: f64,
    policy: &ValidationPolicy,
) -> bool {
    if claim.minutes_spent < 1 {
        return false;
    }

    let pages = claim.pages_read();
    if pages == 0 {
        return false;
    }

    if estimated_total_minutes > 0.0 {
        let ratio = claim.minutes_spent as f64 / estimated_total_minutes;
        return (MIN_PLAUSIBLE_RATIO..=MAX_PLAUSIBLE_RATIO).contains(&ratio);
    }

    if policy.permissive_on_estimation_failure {
        tracing::debug!("No estimate for claim; permissive policy accepts");
        return true;
    }

    // Speed fallback: pages per minute within a plausible band
    if claim.minutes_spent < FALLBACK_MIN_MINUTES {
        return false;
    }
    let speed = pages as f64 / claim.minutes_spent as f64;
    (FALLBACK_MIN_PAGES_PER_MINUTE..=FALLBACK_MAX_PAGES_PER_MINUTE).contains(&speed)
}

/// Evaluate a claim end to end: estimate the claimed span, validate, and
/// compute the point award
///
/// Each page of the span is extracted exactly once. The claimed 1-based span
/// `[start_page, end_page)` maps to the 0-based indices
/// `[start_page - 1, end_page - 1)`.
pub fn evaluate_claim(
    source: &dyn PageSource,
    claim: &SessionClaim,
    profile: &ReadingProfile,
    policy: &ValidationPolicy,
) -> SessionOutcome {
    // Cheap structural rejections before any extraction work
    if claim.minutes_spent < 1 || claim.start_page < 1 || claim.pages_read() == 0 {
        return SessionOutcome::rejected(None);
    }

    let estimated = estimate_range(
        source,
        (claim.start_page - 1) as usize,
        (claim.end_page - 1) as usize,
        profile.words_per_minute,
    );
    let estimated_minutes = (estimated > 0.0).then_some(estimated);

    if !validate(claim, estimated, policy) {
        tracing::info!(
            "Rejected session claim for book {}: {} pages in {} min (estimate {:?})",
            claim.book_id,
            claim.pages_read(),
            claim.minutes_spent,
            estimated_minutes
        );
        return SessionOutcome::rejected(estimated_minutes);
    }

    SessionOutcome {
        accepted: true,
        points_awarded: calc_points(claim.pages_read(), claim.minutes_spent),
        estimated_minutes,
    }
}
