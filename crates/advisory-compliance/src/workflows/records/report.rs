use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{
    BreachStatus, ComplianceRecord, OverallStatus, RecordDetail, SubjectId,
};
use crate::workflows::assessment::domain::RiskTier;
use crate::workflows::assessment::schedule::ReviewSchedule;

/// One AML review falling due, for the reminder and overdue panels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewDue {
    pub subject_id: SubjectId,
    pub tier: RiskTier,
    pub next_review_on: NaiveDate,
}

#[derive(Debug, Default, Serialize)]
pub struct AmlSummary {
    pub assessed: usize,
    pub unassessed: usize,
    pub by_tier: BTreeMap<RiskTier, usize>,
    pub overdue_reviews: Vec<ReviewDue>,
    pub upcoming_reminders: Vec<ReviewDue>,
}

#[derive(Debug, Default, Serialize)]
pub struct DutySummary {
    pub by_overall: BTreeMap<OverallStatus, usize>,
    pub non_compliant_subjects: Vec<SubjectId>,
}

#[derive(Debug, Default, Serialize)]
pub struct BreachSummary {
    pub by_status: BTreeMap<BreachStatus, usize>,
    pub unresolved: usize,
}

/// Aggregated dashboard headline built from reconciled record sets.
#[derive(Debug, Serialize)]
pub struct ComplianceOverview {
    pub today: NaiveDate,
    pub aml: AmlSummary,
    pub consumer_duty: DutySummary,
    pub breaches: BreachSummary,
}

impl ComplianceOverview {
    /// Pure aggregation; expects each slice to already be reconciled (one
    /// record per subject). Virtual AML rows count as unassessed regardless
    /// of field values, which is where the dashboard distinguishes "never
    /// assessed" from a genuinely low-risk client.
    pub fn build(
        aml: &[ComplianceRecord],
        consumer_duty: &[ComplianceRecord],
        breaches: &[ComplianceRecord],
        schedule: &ReviewSchedule,
        today: NaiveDate,
    ) -> Self {
        let mut aml_summary = AmlSummary::default();
        for record in aml {
            let tier = match &record.detail {
                RecordDetail::Aml { risk_tier, .. } if !record.is_virtual() => *risk_tier,
                _ => None,
            };

            let Some(tier) = tier else {
                aml_summary.unassessed += 1;
                continue;
            };

            aml_summary.assessed += 1;
            *aml_summary.by_tier.entry(tier).or_default() += 1;

            if let RecordDetail::Aml {
                next_review_on: Some(next_review_on),
                ..
            } = &record.detail
            {
                let due = ReviewDue {
                    subject_id: record.subject_id.clone(),
                    tier,
                    next_review_on: *next_review_on,
                };
                if *next_review_on < today {
                    aml_summary.overdue_reviews.push(due);
                } else if schedule.reminder_on(*next_review_on) <= today {
                    aml_summary.upcoming_reminders.push(due);
                }
            }
        }
        aml_summary
            .overdue_reviews
            .sort_by(|a, b| a.next_review_on.cmp(&b.next_review_on));
        aml_summary
            .upcoming_reminders
            .sort_by(|a, b| a.next_review_on.cmp(&b.next_review_on));

        let mut duty_summary = DutySummary::default();
        for record in consumer_duty {
            if let RecordDetail::ConsumerDuty { overall, .. } = &record.detail {
                *duty_summary.by_overall.entry(*overall).or_default() += 1;
                if *overall == OverallStatus::NonCompliant {
                    duty_summary
                        .non_compliant_subjects
                        .push(record.subject_id.clone());
                }
            }
        }

        let mut breach_summary = BreachSummary::default();
        for record in breaches {
            // Virtual breach rows are placeholders, not logged breaches.
            if record.is_virtual() {
                continue;
            }
            if let RecordDetail::Breach { status } = &record.detail {
                *breach_summary.by_status.entry(*status).or_default() += 1;
                if matches!(status, BreachStatus::Open | BreachStatus::Investigating) {
                    breach_summary.unresolved += 1;
                }
            }
        }

        Self {
            today,
            aml: aml_summary,
            consumer_duty: duty_summary,
            breaches: breach_summary,
        }
    }
}
