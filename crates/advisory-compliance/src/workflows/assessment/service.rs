use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use super::domain::{Answer, AssessmentId, QuestionnaireKind, RiskLabel};
use super::questionnaire::Questionnaire;
use super::repository::{Assessment, AssessmentRepository, RiskEvaluation};
use super::schedule::ReviewSchedule;
use super::scoring::{ScoringEngine, ScoringThresholds};
use crate::workflows::records::domain::{
    DutyOutcome, OutcomeStatus, RecordPatch, RecordType, SubjectId,
};
use crate::workflows::records::materializer::RecordMaterializer;
use crate::workflows::records::repository::{RecordStore, RepositoryError};

static ASSESSMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_assessment_id() -> AssessmentId {
    let id = ASSESSMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AssessmentId(format!("asm-{id:06}"))
}

/// Facade composing the scoring engine, review schedule, assessment
/// repository, and the compliance-record materializer.
pub struct AssessmentService<R, S> {
    repository: Arc<R>,
    records: RecordMaterializer<S>,
    engine: ScoringEngine,
    schedule: ReviewSchedule,
}

impl<R, S> AssessmentService<R, S>
where
    R: AssessmentRepository + 'static,
    S: RecordStore + 'static,
{
    pub fn new(
        repository: Arc<R>,
        store: Arc<S>,
        thresholds: ScoringThresholds,
        schedule: ReviewSchedule,
    ) -> Self {
        Self {
            repository,
            records: RecordMaterializer::new(store),
            engine: ScoringEngine::new(thresholds),
            schedule,
        }
    }

    pub const fn schedule(&self) -> &ReviewSchedule {
        &self.schedule
    }

    /// Starts a wizard run for a subject.
    pub fn begin(
        &self,
        subject_id: SubjectId,
        kind: QuestionnaireKind,
        started_on: NaiveDate,
    ) -> Result<Assessment, AssessmentServiceError> {
        let assessment = Assessment {
            id: next_assessment_id(),
            subject_id,
            questionnaire: kind,
            answers: Vec::new(),
            started_on,
            evaluation: None,
        };

        let stored = self.repository.insert(assessment)?;
        Ok(stored)
    }

    /// Records (or replaces) the answer to one question of an in-progress
    /// assessment.
    pub fn record_answer(
        &self,
        id: &AssessmentId,
        answer: Answer,
    ) -> Result<Assessment, AssessmentServiceError> {
        let mut assessment = self
            .repository
            .fetch(id)?
            .ok_or(AssessmentServiceError::NotFound)?;

        if assessment.is_complete() {
            return Err(AssessmentServiceError::AlreadyComplete);
        }

        let questionnaire = Questionnaire::for_kind(assessment.questionnaire);
        if questionnaire.question(&answer.question).is_none() {
            return Err(AssessmentServiceError::UnknownQuestion(answer.question));
        }

        assessment.record_answer(answer);
        self.repository.update(assessment.clone())?;
        Ok(assessment)
    }

    /// Finalizes an assessment: scores it, derives the next review date,
    /// freezes the evaluation, and propagates the result to the subject's
    /// compliance record.
    pub fn complete(
        &self,
        id: &AssessmentId,
        completed_on: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<RiskEvaluation, AssessmentServiceError> {
        let mut assessment = self
            .repository
            .fetch(id)?
            .ok_or(AssessmentServiceError::NotFound)?;

        if assessment.is_complete() {
            return Err(AssessmentServiceError::AlreadyComplete);
        }

        let questionnaire = Questionnaire::for_kind(assessment.questionnaire);
        let outcome = self.engine.score(&questionnaire, &assessment.answers);

        let next_review_on = self.schedule.next_review_on(outcome.tier, completed_on);
        let evaluation = RiskEvaluation {
            total: outcome.total,
            tier: outcome.tier,
            components: outcome.components,
            completed_on,
            next_review_on,
            reminder_on: self.schedule.reminder_on(next_review_on),
        };

        assessment.evaluation = Some(evaluation.clone());
        self.repository.update(assessment.clone())?;

        match assessment.questionnaire {
            QuestionnaireKind::AmlRisk => {
                self.records.update_subject(
                    RecordType::Aml,
                    &assessment.subject_id,
                    RecordPatch::RiskProfile {
                        tier: evaluation.tier,
                        assessed_on: completed_on,
                        next_review_on,
                    },
                    now,
                )?;
            }
            QuestionnaireKind::ConsumerDuty => {
                for outcome_category in DutyOutcome::ordered() {
                    let Some(answer) = assessment.answer_for(outcome_category.question_key())
                    else {
                        continue;
                    };
                    let Some(option) = questionnaire
                        .question(&answer.question)
                        .and_then(|question| question.option_for(answer.value))
                    else {
                        continue;
                    };

                    let status = match option.risk {
                        RiskLabel::Low => OutcomeStatus::Compliant,
                        RiskLabel::Medium => OutcomeStatus::PartiallyCompliant,
                        RiskLabel::High => OutcomeStatus::NonCompliant,
                    };
                    self.records.update_subject(
                        RecordType::ConsumerDuty,
                        &assessment.subject_id,
                        RecordPatch::Outcome {
                            outcome: outcome_category,
                            status,
                        },
                        now,
                    )?;
                }
            }
        }

        Ok(evaluation)
    }

    /// Fetches a wizard run for API responses.
    pub fn get(&self, id: &AssessmentId) -> Result<Assessment, AssessmentServiceError> {
        self.repository
            .fetch(id)?
            .ok_or(AssessmentServiceError::NotFound)
    }

    /// The current (most recent) run for a subject, used when a new review
    /// cycle supersedes an old assessment.
    pub fn latest_for_subject(
        &self,
        subject: &SubjectId,
        kind: QuestionnaireKind,
    ) -> Result<Option<Assessment>, AssessmentServiceError> {
        Ok(self.repository.latest_for_subject(subject, kind)?)
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error("assessment not found")]
    NotFound,
    #[error("assessment is already complete")]
    AlreadyComplete,
    #[error("question '{0}' is not part of the questionnaire")]
    UnknownQuestion(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
