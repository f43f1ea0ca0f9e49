//! Client roster import: the CSV export of the firm's back-office client
//! list becomes the subject universe the dashboard reconciles against.

mod normalizer;
mod parser;

use crate::workflows::records::domain::{Subject, SubjectId};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read client roster: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid client roster CSV data: {}", err),
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct ClientRosterImporter;

impl ClientRosterImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Subject>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Parses the roster export into subjects: archived rows are skipped,
    /// references are normalized into stable subject ids, and duplicate
    /// references keep their first occurrence.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Subject>, RosterImportError> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut subjects = Vec::new();

        for record in parser::parse_records(reader)? {
            if record.archived {
                continue;
            }

            let reference = normalizer::normalize_reference(&record.reference);
            if reference.is_empty() || !seen.insert(reference.clone()) {
                continue;
            }

            subjects.push(Subject {
                id: SubjectId(reference),
                name: normalizer::normalize_name(&record.name),
                onboarded_on: record.onboarded_on,
            });
        }

        Ok(subjects)
    }
}
