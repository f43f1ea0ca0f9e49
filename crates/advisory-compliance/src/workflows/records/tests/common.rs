use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use crate::workflows::records::domain::{
    ComplianceRecord, RecordError, RecordId, RecordPatch, RecordType, Subject, SubjectId,
};
use crate::workflows::records::materializer::RecordMaterializer;
use crate::workflows::records::repository::{RecordStore, RepositoryError};

pub(super) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 9, 30, 0).single().expect("valid timestamp")
}

pub(super) fn subject(id: &str) -> Subject {
    Subject {
        id: SubjectId(id.to_string()),
        name: format!("Client {id}"),
        onboarded_on: None,
    }
}

pub(super) fn subjects() -> Vec<Subject> {
    vec![subject("CL-1001"), subject("CL-1002"), subject("CL-1003")]
}

#[derive(Default, Clone)]
pub(super) struct MemoryRecordStore {
    pub(super) subjects: Arc<Mutex<Vec<Subject>>>,
    pub(super) records: Arc<Mutex<HashMap<RecordId, ComplianceRecord>>>,
}

impl MemoryRecordStore {
    pub(super) fn with_subjects(subjects: Vec<Subject>) -> Self {
        let store = Self::default();
        *store.subjects.lock().expect("subject mutex poisoned") = subjects;
        store
    }

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

/// Store double that fails every call, for failure-propagation tests.
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

pub(super) fn materializer_with_subjects(
    subjects: Vec<Subject>,
) -> (RecordMaterializer<MemoryRecordStore>, Arc<MemoryRecordStore>) {
    let store = Arc::new(MemoryRecordStore::with_subjects(subjects));
    (RecordMaterializer::new(store.clone()), store)
}
