use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::domain::{
    ComplianceRecord, RecordError, RecordId, RecordPatch, RecordType, Subject, SubjectId,
};
use super::repository::{RecordStore, RepositoryError};

static RECORD_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_record_id() -> RecordId {
    let id = RECORD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    RecordId(format!("rec-{id:06}"))
}

/// Overlays the subject list with the persisted records: every subject gets
/// exactly one row, a real record when one exists, otherwise an ephemeral
/// virtual default. Pure; nothing is persisted on read.
pub fn reconcile(
    subjects: &[Subject],
    records: &[ComplianceRecord],
    record_type: RecordType,
    now: DateTime<Utc>,
) -> Vec<ComplianceRecord> {
    let by_subject: HashMap<&SubjectId, &ComplianceRecord> = records
        .iter()
        .filter(|record| record.record_type == record_type)
        .map(|record| (&record.subject_id, record))
        .collect();

    subjects
        .iter()
        .map(|subject| match by_subject.get(&subject.id) {
            Some(record) => (*record).clone(),
            None => ComplianceRecord::virtual_for(record_type, &subject.id, now),
        })
        .collect()
}

/// Service reconciling virtual defaults with the backing store and promoting
/// them to real records on first edit.
pub struct RecordMaterializer<S> {
    store: Arc<S>,
}

impl<S: RecordStore> RecordMaterializer<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The dashboard view of one record collection: every subject, real
    /// records taking precedence over synthesized defaults.
    pub fn dashboard(
        &self,
        record_type: RecordType,
        now: DateTime<Utc>,
    ) -> Result<Vec<ComplianceRecord>, RepositoryError> {
        let subjects = self.store.list_subjects()?;
        let records = self.store.list_records(record_type)?;
        Ok(reconcile(&subjects, &records, record_type, now))
    }

    /// Promotes a virtual record to a real one with default field values.
    /// Idempotent under concurrent calls: losing an insert race falls back
    /// to fetching the row the winner created.
    pub fn materialize(
        &self,
        record_type: RecordType,
        id: &RecordId,
        now: DateTime<Utc>,
    ) -> Result<ComplianceRecord, RepositoryError> {
        let subject = id
            .virtual_subject()
            .ok_or_else(|| RecordError::NotVirtual(id.clone()))?;
        let record = ComplianceRecord::materialized(next_record_id(), record_type, &subject, now);

        match self.store.insert(record) {
            Ok(stored) => Ok(stored),
            Err(RepositoryError::Conflict) => self
                .store
                .find_by_subject(record_type, &subject)?
                .ok_or(RepositoryError::NotFound),
            Err(other) => Err(other),
        }
    }

    /// Applies one field edit. A virtual id is promoted and patched through
    /// the store's single upsert call; a real id is fetched, patched, and
    /// written back. On failure the caller's in-memory state is untouched.
    pub fn update_field(
        &self,
        record_type: RecordType,
        id: &RecordId,
        patch: RecordPatch,
        now: DateTime<Utc>,
    ) -> Result<ComplianceRecord, RepositoryError> {
        if let Some(subject) = id.virtual_subject() {
            return self.update_subject(record_type, &subject, patch, now);
        }

        let mut record = self.store.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        record.apply(&patch, now)?;
        self.store.update(record.clone())?;
        Ok(record)
    }

    /// Subject-addressed edit used when the caller does not know whether a
    /// real record exists yet (e.g. assessment completion).
    pub fn update_subject(
        &self,
        record_type: RecordType,
        subject: &SubjectId,
        patch: RecordPatch,
        now: DateTime<Utc>,
    ) -> Result<ComplianceRecord, RepositoryError> {
        let defaults = ComplianceRecord::materialized(next_record_id(), record_type, subject, now);
        self.store.upsert(defaults, &patch, now)
    }
}
