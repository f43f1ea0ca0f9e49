use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{Answer, AssessmentId, QuestionnaireKind, RiskTier};
use super::questionnaire::Questionnaire;
use super::scoring::ScoreComponent;
use crate::workflows::records::domain::SubjectId;
use crate::workflows::records::repository::RepositoryError;

/// Frozen result of a completed assessment: the score, the derived tier,
/// and the review dates computed from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskEvaluation {
    pub total: u32,
    pub tier: RiskTier,
    pub components: Vec<ScoreComponent>,
    pub completed_on: NaiveDate,
    pub next_review_on: NaiveDate,
    pub reminder_on: NaiveDate,
}

/// Repository record for one wizard run. Created when the wizard starts,
/// mutated per answer, frozen on completion; superseded by a newer run at
/// the next review cycle, never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: AssessmentId,
    pub subject_id: SubjectId,
    pub questionnaire: QuestionnaireKind,
    pub answers: Vec<Answer>,
    pub started_on: NaiveDate,
    pub evaluation: Option<RiskEvaluation>,
}

impl Assessment {
    pub fn is_complete(&self) -> bool {
        self.evaluation.is_some()
    }

    /// Replaces any previous answer to the same question.
    pub fn record_answer(&mut self, answer: Answer) {
        match self
            .answers
            .iter_mut()
            .find(|existing| existing.question == answer.question)
        {
            Some(existing) => *existing = answer,
            None => self.answers.push(answer),
        }
    }

    pub fn answer_for(&self, question_key: &str) -> Option<&Answer> {
        self.answers
            .iter()
            .find(|answer| answer.question == question_key)
    }

    pub fn status_view(&self, questionnaire: &Questionnaire) -> AssessmentStatusView {
        let status = if self.is_complete() {
            "complete"
        } else {
            "in_progress"
        };

        AssessmentStatusView {
            assessment_id: self.id.clone(),
            subject_id: self.subject_id.clone(),
            questionnaire: self.questionnaire.label(),
            status,
            answered: self.answers.len(),
            questions: questionnaire.len(),
            total: self.evaluation.as_ref().map(|evaluation| evaluation.total),
            tier: self.evaluation.as_ref().map(|evaluation| evaluation.tier),
            next_review_on: self
                .evaluation
                .as_ref()
                .map(|evaluation| evaluation.next_review_on),
        }
    }
}

/// Storage abstraction for assessments so the wizard flow can be exercised
/// in isolation.
pub trait AssessmentRepository: Send + Sync {
    fn insert(&self, assessment: Assessment) -> Result<Assessment, RepositoryError>;
    fn update(&self, assessment: Assessment) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &AssessmentId) -> Result<Option<Assessment>, RepositoryError>;
    /// The most recent run for a subject, completed or not.
    fn latest_for_subject(
        &self,
        subject: &SubjectId,
        kind: QuestionnaireKind,
    ) -> Result<Option<Assessment>, RepositoryError>;
}

/// Sanitized representation of a wizard run's exposed progress.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentStatusView {
    pub assessment_id: AssessmentId,
    pub subject_id: SubjectId,
    pub questionnaire: &'static str,
    pub status: &'static str,
    pub answered: usize,
    pub questions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<RiskTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_review_on: Option<NaiveDate>,
}
