//! Reward tiers and goal eligibility.
//!
//! Lifetime points place an account in a tier ladder; weekly and monthly
//! page goals gate gift-card eligibility.

use crate::{ReadingGoals, UserStats};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// A rung of the reward ladder
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tier {
    pub name: String,
    pub min_points: u64,
    /// Upper bound (inclusive); None for the open-ended top tier
    pub max_points: Option<u64>,
    pub reward: String,
}

/// Cached reward ladder - built once and reused across all operations
static TIER_LADDER: Lazy<Vec<Tier>> = Lazy::new(build_tier_ladder);

/// Get a reference to the cached tier ladder, ordered bottom to top
pub fn get_tier_ladder() -> &'static [Tier] {
    &TIER_LADDER
}

fn build_tier_ladder() -> Vec<Tier> {
    vec![
        Tier {
            name: "Bronze".into(),
            min_points: 0,
            max_points: Some(200),
            reward: "Avatar Pack".into(),
        },
        Tier {
            name: "Silver".into(),
            min_points: 201,
            max_points: Some(500),
            reward: "Theme + Avatar".into(),
        },
        Tier {
            name: "Gold".into(),
            min_points: 501,
            max_points: Some(1000),
            reward: "$2.50 Card".into(),
        },
        Tier {
            name: "Platinum".into(),
            min_points: 1001,
            max_points: None,
            reward: "$5 Card".into(),
        },
    ]
}

/// Find the tier a point total falls into
pub fn tier_for_points(points: u64) -> &'static Tier {
    get_tier_ladder()
        .iter()
        .rev()
        .find(|t| points >= t.min_points)
        .unwrap_or(&get_tier_ladder()[0])
}

/// Goal progress snapshot for the rewards surface
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoalReport {
    pub weekly_met: bool,
    pub monthly_met: bool,
    /// Pages still needed to reach the weekly goal (0 when met)
    pub weekly_remaining: u64,
    /// Pages still needed to reach the monthly goal (0 when met)
    pub monthly_remaining: u64,
}

impl GoalReport {
    pub fn evaluate(stats: &UserStats, goals: &ReadingGoals) -> Self {
        let weekly_goal = u64::from(goals.weekly);
        let monthly_goal = u64::from(goals.monthly);

        Self {
            weekly_met: stats.weekly_pages >= weekly_goal,
            monthly_met: stats.monthly_pages >= monthly_goal,
            weekly_remaining: weekly_goal.saturating_sub(stats.weekly_pages),
            monthly_remaining: monthly_goal.saturating_sub(stats.monthly_pages),
        }
    }

    /// Gift card eligibility requires both the weekly and monthly goal
    pub fn gift_card_eligible(&self) -> bool {
        self.weekly_met && self.monthly_met
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ladder_is_ordered_and_contiguous() {
        let ladder = get_tier_ladder();
        assert_eq!(ladder.len(), 4);
        for pair in ladder.windows(2) {
            let upper = pair[0].max_points.unwrap();
            assert_eq!(pair[1].min_points, upper + 1);
        }
        assert!(ladder.last().unwrap().max_points.is_none());
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(tier_for_points(0).name, "Bronze");
        assert_eq!(tier_for_points(200).name, "Bronze");
        assert_eq!(tier_for_points(201).name, "Silver");
        assert_eq!(tier_for_points(500).name, "Silver");
        assert_eq!(tier_for_points(501).name, "Gold");
        assert_eq!(tier_for_points(1000).name, "Gold");
        assert_eq!(tier_for_points(1001).name, "Platinum");
        assert_eq!(tier_for_points(50_000).name, "Platinum");
    }

    #[test]
    fn test_goal_report_requires_both_goals() {
        let goals = ReadingGoals::default();
        let mut stats = UserStats {
            weekly_pages: 200,
            monthly_pages: 100,
            ..UserStats::default()
        };

        let report = GoalReport::evaluate(&stats, &goals);
        assert!(report.weekly_met);
        assert!(!report.monthly_met);
        assert!(!report.gift_card_eligible());
        assert_eq!(report.weekly_remaining, 0);
        assert_eq!(report.monthly_remaining, 700);

        stats.monthly_pages = 800;
        let report = GoalReport::evaluate(&stats, &goals);
        assert!(report.gift_card_eligible());
    }
}
