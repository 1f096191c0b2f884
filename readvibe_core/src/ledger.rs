//! Session ledger: commits accepted sessions into account state.
//!
//! An accepted [`SessionOutcome`] is the only path through which
//! [`UserStats`] and [`BookProgress`] change. The ledger refuses rejected
//! outcomes and empty spans outright, so a failed validation can never leave
//! a partial update behind.

use crate::{BookProgress, Error, Result, SessionClaim, SessionOutcome, UserStats};

/// Apply an accepted session to the account statistics and book progress
///
/// Not idempotent: applying the same claim twice double-counts every counter.
/// At-most-once application is the caller's responsibility (one confirmed
/// user action before persistence).
pub fn apply_session(
    claim: &SessionClaim,
    outcome: &SessionOutcome,
    stats: &mut UserStats,
    progress: &mut BookProgress,
) -> Result<()> {
    if !outcome.accepted {
        return Err(Error::Ledger(
            "refusing to apply a session that was not accepted".into(),
        ));
    }

    let pages_read = claim.pages_read();
    if pages_read == 0 {
        return Err(Error::Ledger("refusing to apply an empty page span".into()));
    }

    stats.total_pages += u64::from(pages_read);
    stats.total_time += u64::from(claim.minutes_spent);
    stats.points += u64::from(outcome.points_awarded);
    stats.weekly_pages += u64::from(pages_read);
    stats.monthly_pages += u64::from(pages_read);

    progress.current_page = claim.end_page;
    progress.pages_read += u64::from(pages_read);

    tracing::info!(
        "Applied session for book {}: {} pages, {} min, {} points",
        claim.book_id,
        pages_read,
        claim.minutes_spent,
        outcome.points_awarded
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn accepted_outcome(points: u32) -> SessionOutcome {
        SessionOutcome {
            accepted: true,
            points_awarded: points,
            estimated_minutes: Some(4.0),
        }
    }

    fn claim(start_page: u32, end_page: u32, minutes_spent: u32) -> SessionClaim {
        SessionClaim {
            book_id: Uuid::new_v4(),
            start_page,
            end_page,
            minutes_spent,
        }
    }

    #[test]
    fn test_apply_updates_all_counters() {
        let mut stats = UserStats::default();
        let mut progress = BookProgress::default();

        apply_session(&claim(1, 13, 25), &accepted_outcome(5), &mut stats, &mut progress)
            .unwrap();

        assert_eq!(stats.total_pages, 12);
        assert_eq!(stats.total_time, 25);
        assert_eq!(stats.points, 5);
        assert_eq!(stats.weekly_pages, 12);
        assert_eq!(stats.monthly_pages, 12);
        assert_eq!(progress.current_page, 13);
        assert_eq!(progress.pages_read, 12);
    }

    #[test]
    fn test_apply_twice_double_counts() {
        let mut stats = UserStats::default();
        let mut progress = BookProgress::default();
        let c = claim(1, 6, 10);
        let outcome = accepted_outcome(0);

        apply_session(&c, &outcome, &mut stats, &mut progress).unwrap();
        apply_session(&c, &outcome, &mut stats, &mut progress).unwrap();

        // Documented caller responsibility: the ledger itself does not dedupe
        assert_eq!(stats.total_pages, 10);
        assert_eq!(progress.pages_read, 10);
        assert_eq!(progress.current_page, 6);
    }

    #[test]
    fn test_rejected_outcome_is_refused_without_mutation() {
        let mut stats = UserStats::default();
        let mut progress = BookProgress::default();

        let result = apply_session(
            &claim(1, 6, 10),
            &SessionOutcome::rejected(None),
            &mut stats,
            &mut progress,
        );

        assert!(result.is_err());
        assert_eq!(stats, UserStats::default());
        assert_eq!(progress, BookProgress::default());
    }

    #[test]
    fn test_empty_span_is_refused() {
        let mut stats = UserStats::default();
        let mut progress = BookProgress::default();

        let result = apply_session(
            &claim(4, 4, 10),
            &accepted_outcome(0),
            &mut stats,
            &mut progress,
        );

        assert!(result.is_err());
        assert_eq!(stats, UserStats::default());
    }
}
