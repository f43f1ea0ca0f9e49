use chrono::{Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::domain::RiskTier;

/// Review cadence per risk tier, in whole years, plus the reminder lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSchedule {
    pub low_interval_years: u32,
    pub medium_interval_years: u32,
    pub high_interval_years: u32,
    pub reminder_lead_days: u32,
}

impl Default for ReviewSchedule {
    fn default() -> Self {
        Self {
            low_interval_years: 3,
            medium_interval_years: 2,
            high_interval_years: 1,
            reminder_lead_days: 30,
        }
    }
}

impl ReviewSchedule {
    pub const fn interval_years(&self, tier: RiskTier) -> u32 {
        match tier {
            RiskTier::Low => self.low_interval_years,
            RiskTier::Medium => self.medium_interval_years,
            RiskTier::High => self.high_interval_years,
        }
    }

    /// Completion date plus the tier's interval, day and month preserved.
    /// Chrono clamps impossible dates (Feb 29 plus one year becomes Feb 28),
    /// and an out-of-range addition falls back to the completion date
    /// itself, so the result is never before `completed_on`.
    pub fn next_review_on(&self, tier: RiskTier, completed_on: NaiveDate) -> NaiveDate {
        let months = self.interval_years(tier).saturating_mul(12);
        completed_on
            .checked_add_months(Months::new(months))
            .unwrap_or(completed_on)
    }

    /// Notification trigger date; derived, never authoritative state.
    pub fn reminder_on(&self, next_review_on: NaiveDate) -> NaiveDate {
        next_review_on - Duration::days(i64::from(self.reminder_lead_days))
    }
}
