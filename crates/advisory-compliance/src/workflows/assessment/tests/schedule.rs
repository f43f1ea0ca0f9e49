use chrono::NaiveDate;

use crate::workflows::assessment::domain::RiskTier;
use crate::workflows::assessment::schedule::ReviewSchedule;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

#[test]
fn high_tier_reviews_annually() {
    let schedule = ReviewSchedule::default();
    let next = schedule.next_review_on(RiskTier::High, date(2024, 1, 15));
    assert_eq!(next, date(2025, 1, 15));
}

#[test]
fn medium_and_low_tiers_use_their_own_intervals() {
    let schedule = ReviewSchedule::default();
    assert_eq!(
        schedule.next_review_on(RiskTier::Medium, date(2024, 1, 15)),
        date(2026, 1, 15)
    );
    assert_eq!(
        schedule.next_review_on(RiskTier::Low, date(2024, 1, 15)),
        date(2027, 1, 15)
    );
}

#[test]
fn leap_day_completion_clamps_to_end_of_february() {
    let schedule = ReviewSchedule::default();
    let next = schedule.next_review_on(RiskTier::High, date(2024, 2, 29));
    assert_eq!(next, date(2025, 2, 28));
}

#[test]
fn recomputation_is_idempotent_and_never_before_completion() {
    let schedule = ReviewSchedule::default();
    let completed = date(2024, 7, 1);

    for tier in [RiskTier::Low, RiskTier::Medium, RiskTier::High] {
        let first = schedule.next_review_on(tier, completed);
        let second = schedule.next_review_on(tier, completed);
        assert_eq!(first, second);
        assert!(first >= completed);
    }
}

#[test]
fn zero_year_interval_reviews_on_the_completion_date() {
    let schedule = ReviewSchedule {
        high_interval_years: 0,
        ..ReviewSchedule::default()
    };
    let completed = date(2024, 3, 31);
    assert_eq!(schedule.next_review_on(RiskTier::High, completed), completed);
}

#[test]
fn reminder_precedes_the_review_by_the_configured_lead() {
    let schedule = ReviewSchedule::default();
    let next = schedule.next_review_on(RiskTier::High, date(2024, 1, 15));
    assert_eq!(schedule.reminder_on(next), date(2024, 12, 16));

    let short_lead = ReviewSchedule {
        reminder_lead_days: 7,
        ..ReviewSchedule::default()
    };
    assert_eq!(short_lead.reminder_on(date(2025, 1, 15)), date(2025, 1, 8));
}
