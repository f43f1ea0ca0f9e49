use serde::{Deserialize, Serialize};

/// Identifier wrapper for risk assessments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssessmentId(pub String);

/// The wizard questionnaires shipped with the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionnaireKind {
    AmlRisk,
    ConsumerDuty,
}

impl QuestionnaireKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::AmlRisk => "aml_risk",
            Self::ConsumerDuty => "consumer_duty",
        }
    }
}

/// Qualitative risk attached to a single answer option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLabel {
    Low,
    Medium,
    High,
}

/// Coarse classification derived from a completed questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// One selectable answer: an ordinal value, its weight, and its risk label.
#[derive(Debug, Clone)]
pub struct AnswerOption {
    pub value: u8,
    pub label: &'static str,
    pub score: u32,
    pub risk: RiskLabel,
}

/// Static questionnaire entry with its mutually exclusive options.
#[derive(Debug, Clone)]
pub struct Question {
    pub key: &'static str,
    pub prompt: &'static str,
    pub options: Vec<AnswerOption>,
}

impl Question {
    pub fn option_for(&self, value: u8) -> Option<&AnswerOption> {
        self.options.iter().find(|option| option.value == value)
    }
}

/// An operator's answer to one question, captured during the wizard flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question: String,
    pub value: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
}
