//! Compliance record tracking: the dashboard's virtual-record overlay,
//! lazy materialization on first edit, and the freely-settable status
//! workflow with its derived aggregate.

pub mod domain;
pub mod materializer;
pub mod report;
pub mod repository;
pub mod router;
pub mod status;

#[cfg(test)]
mod tests;

pub use domain::{
    BreachStatus, ComplianceRecord, DutyOutcome, IdentityCheckStatus, OutcomeStatus,
    OverallStatus, RecordDetail, RecordError, RecordId, RecordPatch, RecordType, Subject,
    SubjectId,
};
pub use materializer::{reconcile, RecordMaterializer};
pub use report::{AmlSummary, BreachSummary, ComplianceOverview, DutySummary, ReviewDue};
pub use repository::{RecordStore, RepositoryError};
pub use router::{record_router, DashboardState, RecordStatusView};
pub use status::derive_overall;
