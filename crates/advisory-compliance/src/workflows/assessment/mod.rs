//! Risk-assessment wizards: weighted questionnaires, tier scoring, and the
//! review schedule derived from a completed assessment.

pub mod domain;
pub mod questionnaire;
pub mod repository;
pub mod router;
pub mod schedule;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Answer, AnswerOption, AssessmentId, Question, QuestionnaireKind, RiskLabel, RiskTier,
};
pub use questionnaire::Questionnaire;
pub use repository::{Assessment, AssessmentRepository, AssessmentStatusView, RiskEvaluation};
pub use router::assessment_router;
pub use schedule::ReviewSchedule;
pub use scoring::{ScoreComponent, ScoreOutcome, ScoringEngine, ScoringThresholds, SevereFinding};
pub use service::{AssessmentService, AssessmentServiceError};
