use chrono::{DateTime, Utc};

use super::domain::{
    ComplianceRecord, RecordError, RecordId, RecordPatch, RecordType, Subject, SubjectId,
};

/// Storage abstraction over the firm's record store. Implementations are
/// expected to enforce at most one record per (type, subject) pair; that
/// uniqueness constraint is the final backstop against double
/// materialization.
pub trait RecordStore: Send + Sync {
    fn list_subjects(&self) -> Result<Vec<Subject>, RepositoryError>;

    fn list_records(&self, record_type: RecordType) -> Result<Vec<ComplianceRecord>, RepositoryError>;

    fn fetch(&self, id: &RecordId) -> Result<Option<ComplianceRecord>, RepositoryError>;

    fn find_by_subject(
        &self,
        record_type: RecordType,
        subject: &SubjectId,
    ) -> Result<Option<ComplianceRecord>, RepositoryError>;

    /// Inserts a new record; `Conflict` when the (type, subject) slot is
    /// already taken.
    fn insert(&self, record: ComplianceRecord) -> Result<ComplianceRecord, RepositoryError>;

    fn update(&self, record: ComplianceRecord) -> Result<(), RepositoryError>;

    /// Insert-or-patch in a single storage round trip: if no record exists
    /// for the defaults' (type, subject) pair the defaults are inserted
    /// first, then the patch is applied to whichever record won. Keeping
    /// both steps behind one call removes the window in which a first edit
    /// could leave a freshly inserted record with default values.
    fn upsert(
        &self,
        defaults: ComplianceRecord,
        patch: &RecordPatch,
        now: DateTime<Utc>,
    ) -> Result<ComplianceRecord, RepositoryError>;
}

/// Error enumeration for storage failures. Failures propagate to the caller
/// unchanged; there are no retries at this layer.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("record store unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Record(#[from] RecordError),
}
