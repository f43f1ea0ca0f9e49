use chrono::{DateTime, NaiveDate, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use advisory_compliance::workflows::assessment::{
    Assessment, AssessmentId, AssessmentRepository, QuestionnaireKind, ReviewSchedule,
    ScoringThresholds,
};
use advisory_compliance::workflows::records::{
    ComplianceRecord, RecordError, RecordId, RecordPatch, RecordStore, RecordType, Subject,
    SubjectId, RepositoryError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Mutex-guarded record store standing in for the managed backend. The
/// (type, subject) uniqueness check and the single-lock upsert give it the
/// constraints the logic layer relies on.
#[derive(Default, Clone)]
pub(crate) struct InMemoryRecordStore {
    subjects: Arc<Mutex<Vec<Subject>>>,
    records: Arc<Mutex<HashMap<RecordId, ComplianceRecord>>>,
}

impl InMemoryRecordStore {
    pub(crate) fn with_subjects(subjects: Vec<Subject>) -> Self {
        let store = Self::default();
        *store.subjects.lock().expect("subject mutex poisoned") = subjects;
        store
    }
}

impl RecordStore for InMemoryRecordStore {
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

        // One lock span covers the insert-or-find and the patch, so a first
        // edit can never leave a default-valued record behind.
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

#[derive(Default, Clone)]
pub(crate) struct InMemoryAssessmentRepository {
    assessments: Arc<Mutex<HashMap<AssessmentId, Assessment>>>,
}

impl AssessmentRepository for InMemoryAssessmentRepository {
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

pub(crate) fn default_scoring_thresholds() -> ScoringThresholds {
    ScoringThresholds::default()
}

pub(crate) fn default_review_schedule() -> ReviewSchedule {
    ReviewSchedule::default()
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
