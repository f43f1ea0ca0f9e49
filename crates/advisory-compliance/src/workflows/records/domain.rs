use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::assessment::domain::RiskTier;

/// Identifier wrapper for compliance subjects (clients of the firm).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubjectId(pub String);

/// A client the dashboard tracks, whether or not any record has been written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    pub onboarded_on: Option<NaiveDate>,
}

const VIRTUAL_PREFIX: &str = "virtual-";

/// Identifier wrapper for compliance records. Virtual records carry a
/// deterministic `virtual-<subject>` id until their first durable write.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn virtual_for(subject: &SubjectId) -> Self {
        Self(format!("{VIRTUAL_PREFIX}{}", subject.0))
    }

    pub fn is_virtual(&self) -> bool {
        self.0.starts_with(VIRTUAL_PREFIX)
    }

    /// Recovers the subject id encoded in a virtual record id.
    pub fn virtual_subject(&self) -> Option<SubjectId> {
        self.0
            .strip_prefix(VIRTUAL_PREFIX)
            .map(|subject| SubjectId(subject.to_string()))
    }
}

/// The record collections tracked by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    Aml,
    ConsumerDuty,
    Breach,
}

impl RecordType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Aml => "aml",
            Self::ConsumerDuty => "consumer_duty",
            Self::Breach => "breach",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value {
            "aml" => Some(Self::Aml),
            "consumer_duty" => Some(Self::ConsumerDuty),
            "breach" => Some(Self::Breach),
            _ => None,
        }
    }
}

/// Remediation workflow for logged breaches. Labels only: any state may be
/// set from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreachStatus {
    Open,
    Investigating,
    Remediated,
    Closed,
}

impl BreachStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Investigating => "investigating",
            Self::Remediated => "remediated",
            Self::Closed => "closed",
        }
    }
}

/// Identity verification leg of an AML check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityCheckStatus {
    NotStarted,
    Pending,
    Verified,
    Failed,
    Expired,
}

impl IdentityCheckStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::Failed => "failed",
            Self::Expired => "expired",
        }
    }
}

/// Per-outcome Consumer Duty assessment state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    NotAssessed,
    UnderReview,
    Compliant,
    PartiallyCompliant,
    NonCompliant,
}

impl OutcomeStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotAssessed => "not_assessed",
            Self::UnderReview => "under_review",
            Self::Compliant => "compliant",
            Self::PartiallyCompliant => "partially_compliant",
            Self::NonCompliant => "non_compliant",
        }
    }
}

/// Aggregate Consumer Duty position derived from the four outcome statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    NotAssessed,
    NonCompliant,
    NeedsAttention,
    MostlyCompliant,
    FullyCompliant,
}

impl OverallStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotAssessed => "not_assessed",
            Self::NonCompliant => "non_compliant",
            Self::NeedsAttention => "needs_attention",
            Self::MostlyCompliant => "mostly_compliant",
            Self::FullyCompliant => "fully_compliant",
        }
    }
}

/// The four FCA Consumer Duty outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DutyOutcome {
    ProductsAndServices,
    PriceAndValue,
    ConsumerUnderstanding,
    ConsumerSupport,
}

impl DutyOutcome {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::ProductsAndServices,
            Self::PriceAndValue,
            Self::ConsumerUnderstanding,
            Self::ConsumerSupport,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ProductsAndServices => "products_and_services",
            Self::PriceAndValue => "price_and_value",
            Self::ConsumerUnderstanding => "consumer_understanding",
            Self::ConsumerSupport => "consumer_support",
        }
    }

    /// Key of the wizard question that assesses this outcome.
    pub const fn question_key(self) -> &'static str {
        match self {
            Self::ProductsAndServices => "products_and_services",
            Self::PriceAndValue => "price_and_value",
            Self::ConsumerUnderstanding => "consumer_understanding",
            Self::ConsumerSupport => "consumer_support",
        }
    }
}

/// Type-specific state carried by a compliance record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordDetail {
    Aml {
        identity_check: IdentityCheckStatus,
        risk_tier: Option<RiskTier>,
        last_assessed_on: Option<NaiveDate>,
        next_review_on: Option<NaiveDate>,
    },
    ConsumerDuty {
        outcomes: BTreeMap<DutyOutcome, OutcomeStatus>,
        overall: OverallStatus,
    },
    Breach {
        status: BreachStatus,
    },
}

impl RecordDetail {
    /// Not-assessed defaults for a freshly synthesized record.
    pub fn defaults(record_type: RecordType) -> Self {
        match record_type {
            RecordType::Aml => Self::Aml {
                identity_check: IdentityCheckStatus::NotStarted,
                risk_tier: None,
                last_assessed_on: None,
                next_review_on: None,
            },
            RecordType::ConsumerDuty => Self::ConsumerDuty {
                outcomes: DutyOutcome::ordered()
                    .into_iter()
                    .map(|outcome| (outcome, OutcomeStatus::NotAssessed))
                    .collect(),
                overall: OverallStatus::NotAssessed,
            },
            RecordType::Breach => Self::Breach {
                status: BreachStatus::Open,
            },
        }
    }

    pub const fn record_type(&self) -> RecordType {
        match self {
            Self::Aml { .. } => RecordType::Aml,
            Self::ConsumerDuty { .. } => RecordType::ConsumerDuty,
            Self::Breach { .. } => RecordType::Breach,
        }
    }
}

/// A single field-level edit to a compliance record. Statuses are plain
/// enumerated values: a patch overwrites unconditionally, there are no
/// guarded transitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum RecordPatch {
    Outcome {
        outcome: DutyOutcome,
        status: OutcomeStatus,
    },
    IdentityCheck(IdentityCheckStatus),
    BreachStatus(BreachStatus),
    RiskProfile {
        tier: RiskTier,
        assessed_on: NaiveDate,
        next_review_on: NaiveDate,
    },
    Note(String),
    Evidence(String),
}

/// Errors raised when manipulating records outside the storage layer.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RecordError {
    #[error("record id {0:?} is not a virtual record")]
    NotVirtual(RecordId),
    #[error("patch {patch:?} does not apply to {record_type:?} records")]
    IncompatiblePatch {
        record_type: RecordType,
        patch: RecordPatch,
    },
}

/// One row of the compliance dashboard: either persisted ("real") or an
/// ephemeral overlay synthesized from the subject list ("virtual").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceRecord {
    pub id: RecordId,
    pub subject_id: SubjectId,
    pub record_type: RecordType,
    pub detail: RecordDetail,
    pub notes: Option<String>,
    pub evidence: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ComplianceRecord {
    /// Ephemeral default record for a subject with no persisted row.
    pub fn virtual_for(record_type: RecordType, subject: &SubjectId, now: DateTime<Utc>) -> Self {
        Self {
            id: RecordId::virtual_for(subject),
            subject_id: subject.clone(),
            record_type,
            detail: RecordDetail::defaults(record_type),
            notes: None,
            evidence: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Default-valued real record, ready for insertion on first edit.
    pub fn materialized(
        id: RecordId,
        record_type: RecordType,
        subject: &SubjectId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            subject_id: subject.clone(),
            record_type,
            detail: RecordDetail::defaults(record_type),
            notes: None,
            evidence: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_virtual(&self) -> bool {
        self.id.is_virtual()
    }
}
