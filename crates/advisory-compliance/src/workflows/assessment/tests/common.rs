use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::workflows::assessment::domain::{Answer, AssessmentId, QuestionnaireKind};
use crate::workflows::assessment::repository::{Assessment, AssessmentRepository};
use crate::workflows::assessment::schedule::ReviewSchedule;
use crate::workflows::assessment::scoring::ScoringThresholds;
use crate::workflows::assessment::service::AssessmentService;
use crate::workflows::records::domain::{
    ComplianceRecord, RecordError, RecordId, RecordPatch, RecordType, Subject, SubjectId,
};
use crate::workflows::records::repository::{RecordStore, RepositoryError};

pub(super) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 14, 0, 0).single().expect("valid timestamp")
}

pub(super) fn started_on() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 10).expect("valid date")
}

pub(super) fn completed_on() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date")
}

pub(super) fn subject() -> SubjectId {
    SubjectId("CL-1001".to_string())
}

pub(super) fn answer(question: &str, value: u8) -> Answer {
    Answer {
        question: question.to_string(),
        value,
        note: None,
        evidence: None,
    }
}

/// The worked example from the AML wizard: a high-risk jurisdiction answer
/// among otherwise benign ones.
pub(super) fn high_jurisdiction_answers() -> Vec<Answer> {
    vec![
        answer("client_jurisdiction", 2),
        answer("pep_status", 0),
        answer("sanctions_screening", 0),
        answer("business_profile", 0),
    ]
}

pub(super) fn benign_answers() -> Vec<Answer> {
    vec![
        answer("client_jurisdiction", 0),
        answer("pep_status", 0),
        answer("sanctions_screening", 0),
        answer("business_profile", 0),
    ]
}

#[derive(Default, Clone)]
pub(super) struct MemoryAssessmentRepository {
    assessments: Arc<Mutex<HashMap<AssessmentId, Assessment>>>,
}

impl AssessmentRepository for MemoryAssessmentRepository {
    fn insert(&self, assessment: Assessment) -> Result<Assessment, RepositoryError> {
        let mut guard = self.assessments.lock().expect("assessment mutex poisoned");
        if guard.contains_key(&assessment.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(assessment.id.clone(), assessment.clone());
        Ok(assessment)
    }

    fn update(&self, assessment: Assessment) -> Result<(), RepositoryError> {
        let mut guard = self.assessments.lock().expect("assessment mutex poisoned");
        if !guard.contains_key(&assessment.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(assessment.id.clone(), assessment);
        Ok(())
    }

    fn fetch(&self, id: &AssessmentId) -> Result<Option<Assessment>, RepositoryError> {
        let guard = self.assessments.lock().expect("assessment mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn latest_for_subject(
        &self,
        subject: &SubjectId,
        kind: QuestionnaireKind,
    ) -> Result<Option<Assessment>, RepositoryError> {
        let guard = self.assessments.lock().expect("assessment mutex poisoned");
        Ok(guard
            .values()
            .filter(|assessment| {
                assessment.subject_id == *subject && assessment.questionnaire == kind
            })
            .max_by(|a, b| a.id.0.cmp(&b.id.0))
            .cloned())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRecordStore {
    subjects: Arc<Mutex<Vec<Subject>>>,
    records: Arc<Mutex<HashMap<RecordId, ComplianceRecord>>>,
}

impl MemoryRecordStore {
    pub(super) fn record_count(&self) -> usize {
        self.records.lock().expect("record mutex poisoned").len()
    }
}

impl RecordStore for MemoryRecordStore {
    fn list_subjects(&self) -> Result<Vec<Subject>, RepositoryError> {
        Ok(self.subjects.lock().expect("subject mutex poisoned").clone())
    }

    fn list_records(
        &self,
        record_type: RecordType,
    ) -> Result<Vec<ComplianceRecord>, RepositoryError> {
        let guard = self.records.lock().expect("record mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.record_type == record_type)
            .cloned()
            .collect())
    }

    fn fetch(&self, id: &RecordId) -> Result<Option<ComplianceRecord>, RepositoryError> {
        let guard = self.records.lock().expect("record mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_by_subject(
        &self,
        record_type: RecordType,
        subject: &SubjectId,
    ) -> Result<Option<ComplianceRecord>, RepositoryError> {
        let guard = self.records.lock().expect("record mutex poisoned");
        Ok(guard
            .values()
            .find(|record| record.record_type == record_type && record.subject_id == *subject)
            .cloned())
    }

    fn insert(&self, record: ComplianceRecord) -> Result<ComplianceRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("record mutex poisoned");
        let occupied = guard.values().any(|existing| {
            existing.record_type == record.record_type
                && existing.subject_id == record.subject_id
        });
        if occupied {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: ComplianceRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("record mutex poisoned");
        if !guard.contains_key(&record.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(record.id.clone(), record);
        Ok(())
    }

    fn upsert(
        &self,
        defaults: ComplianceRecord,
        patch: &RecordPatch,
        now: DateTime<Utc>,
    ) -> Result<ComplianceRecord, RepositoryError> {
        if !patch.applies_to(defaults.record_type) {
            return Err(RecordError::IncompatiblePatch {
                record_type: defaults.record_type,
                patch: patch.clone(),
            }
            .into());
        }

        let mut guard = self.records.lock().expect("record mutex poisoned");
        let existing_id = guard
            .values()
            .find(|record| {
                record.record_type == defaults.record_type
                    && record.subject_id == defaults.subject_id
            })
            .map(|record| record.id.clone());

        let id = match existing_id {
            Some(id) => id,
            None => {
                guard.insert(defaults.id.clone(), defaults.clone());
                defaults.id
            }
        };

        let record = guard.get_mut(&id).expect("row present after insert");
        record.apply(patch, now)?;
        Ok(record.clone())
    }
}

/// Record store double that rejects every call.
pub(super) struct UnavailableRecordStore;

impl RecordStore for UnavailableRecordStore {
    fn list_subjects(&self) -> Result<Vec<Subject>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_records(
        &self,
        _record_type: RecordType,
    ) -> Result<Vec<ComplianceRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &RecordId) -> Result<Option<ComplianceRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_by_subject(
        &self,
        _record_type: RecordType,
        _subject: &SubjectId,
    ) -> Result<Option<ComplianceRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert(&self, _record: ComplianceRecord) -> Result<ComplianceRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: ComplianceRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn upsert(
        &self,
        _defaults: ComplianceRecord,
        _patch: &RecordPatch,
        _now: DateTime<Utc>,
    ) -> Result<ComplianceRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service() -> (
    AssessmentService<MemoryAssessmentRepository, MemoryRecordStore>,
    Arc<MemoryAssessmentRepository>,
    Arc<MemoryRecordStore>,
) {
    let repository = Arc::new(MemoryAssessmentRepository::default());
    let store = Arc::new(MemoryRecordStore::default());
    let service = AssessmentService::new(
        repository.clone(),
        store.clone(),
        ScoringThresholds::default(),
        ReviewSchedule::default(),
    );
    (service, repository, store)
}
