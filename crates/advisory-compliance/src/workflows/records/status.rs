use chrono::{DateTime, Utc};

use super::domain::{
    ComplianceRecord, DutyOutcome, OutcomeStatus, OverallStatus, RecordDetail, RecordError,
    RecordPatch, RecordType,
};

/// Derives the aggregate Consumer Duty position from per-outcome statuses.
///
/// The checks run in a fixed order and the order is load-bearing: several
/// conditions can hold at once (e.g. a set that is both "contains
/// partially_compliant" and "contains not_assessed"), and the first match
/// wins.
pub fn derive_overall(statuses: &[OutcomeStatus]) -> OverallStatus {
    if statuses.is_empty() {
        return OverallStatus::NotAssessed;
    }
    if statuses
        .iter()
        .any(|status| *status == OutcomeStatus::NonCompliant)
    {
        return OverallStatus::NonCompliant;
    }
    if statuses
        .iter()
        .all(|status| *status == OutcomeStatus::Compliant)
    {
        return OverallStatus::FullyCompliant;
    }
    if statuses
        .iter()
        .any(|status| *status == OutcomeStatus::PartiallyCompliant)
    {
        return OverallStatus::NeedsAttention;
    }
    if statuses
        .iter()
        .all(|status| *status == OutcomeStatus::NotAssessed)
    {
        return OverallStatus::NotAssessed;
    }
    OverallStatus::MostlyCompliant
}

impl RecordPatch {
    /// Whether this patch targets a field the given record type carries.
    pub fn applies_to(&self, record_type: RecordType) -> bool {
        match self {
            RecordPatch::Note(_) | RecordPatch::Evidence(_) => true,
            RecordPatch::Outcome { .. } => record_type == RecordType::ConsumerDuty,
            RecordPatch::IdentityCheck(_) | RecordPatch::RiskProfile { .. } => {
                record_type == RecordType::Aml
            }
            RecordPatch::BreachStatus(_) => record_type == RecordType::Breach,
        }
    }
}

impl ComplianceRecord {
    /// Applies one field edit: unconditional overwrite of the targeted value,
    /// then aggregate recomputation where the record carries one.
    pub fn apply(&mut self, patch: &RecordPatch, now: DateTime<Utc>) -> Result<(), RecordError> {
        if !patch.applies_to(self.record_type) {
            return Err(RecordError::IncompatiblePatch {
                record_type: self.record_type,
                patch: patch.clone(),
            });
        }

        match patch {
            RecordPatch::Note(text) => self.notes = Some(text.clone()),
            RecordPatch::Evidence(reference) => self.evidence = Some(reference.clone()),
            RecordPatch::Outcome { outcome, status } => {
                if let RecordDetail::ConsumerDuty { outcomes, overall } = &mut self.detail {
                    outcomes.insert(*outcome, *status);
                    let statuses: Vec<OutcomeStatus> = outcomes.values().copied().collect();
                    *overall = derive_overall(&statuses);
                }
            }
            RecordPatch::IdentityCheck(status) => {
                if let RecordDetail::Aml { identity_check, .. } = &mut self.detail {
                    *identity_check = *status;
                }
            }
            RecordPatch::BreachStatus(new_status) => {
                if let RecordDetail::Breach { status } = &mut self.detail {
                    *status = *new_status;
                }
            }
            RecordPatch::RiskProfile {
                tier,
                assessed_on,
                next_review_on,
            } => {
                if let RecordDetail::Aml {
                    risk_tier,
                    last_assessed_on,
                    next_review_on: next,
                    ..
                } = &mut self.detail
                {
                    *risk_tier = Some(*tier);
                    *last_assessed_on = Some(*assessed_on);
                    *next = Some(*next_review_on);
                }
            }
        }

        self.updated_at = now;
        Ok(())
    }

    /// Convenience wrapper for the common per-outcome status edit.
    pub fn set_outcome(
        &mut self,
        outcome: DutyOutcome,
        status: OutcomeStatus,
        now: DateTime<Utc>,
    ) -> Result<(), RecordError> {
        self.apply(&RecordPatch::Outcome { outcome, status }, now)
    }

    /// The derived aggregate, where the record type has one.
    pub fn overall(&self) -> Option<OverallStatus> {
        match &self.detail {
            RecordDetail::ConsumerDuty { overall, .. } => Some(*overall),
            _ => None,
        }
    }
}
