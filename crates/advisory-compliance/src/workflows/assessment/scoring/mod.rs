mod config;
mod rules;

pub use config::ScoringThresholds;

use super::domain::{Answer, RiskTier};
use super::questionnaire::Questionnaire;
use serde::{Deserialize, Serialize};

/// Stateless scorer applying the tier thresholds to a questionnaire walk.
pub struct ScoringEngine {
    thresholds: ScoringThresholds,
}

impl ScoringEngine {
    pub fn new(thresholds: ScoringThresholds) -> Self {
        Self { thresholds }
    }

    /// Scores a (possibly partial) answer set. Unanswered questions
    /// contribute zero, so an untouched assessment lands in the low tier
    /// with a zero total; the dashboard reports such clients as unassessed
    /// rather than low-risk, which is where that distinction surfaces.
    ///
    /// A single high-risk answer forces the high tier regardless of the
    /// total: one severe factor (a confirmed sanctions match, say) must not
    /// be diluted by otherwise benign answers.
    pub fn score(&self, questionnaire: &Questionnaire, answers: &[Answer]) -> ScoreOutcome {
        let (components, total, severe) = rules::score_answers(questionnaire.questions(), answers);

        let tier = if severe.is_some() || total >= self.thresholds.high_threshold {
            RiskTier::High
        } else if total >= self.thresholds.medium_threshold {
            RiskTier::Medium
        } else {
            RiskTier::Low
        };

        ScoreOutcome {
            total,
            tier,
            components,
            severe,
        }
    }
}

/// Discrete contribution of one question, allowing transparent audits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub question: String,
    pub score: u32,
    pub notes: String,
}

/// The answer that forced the high tier, when one did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SevereFinding {
    pub question: String,
    pub option_label: String,
}

/// Scoring output: the composite total, derived tier, and audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreOutcome {
    pub total: u32,
    pub tier: RiskTier,
    pub components: Vec<ScoreComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severe: Option<SevereFinding>,
}
