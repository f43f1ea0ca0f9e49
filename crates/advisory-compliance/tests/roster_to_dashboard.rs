//! Importing a back-office roster export and reconciling the dashboard
//! against it, end to end through the public API.

use std::io::Cursor;

use chrono::{TimeZone, Utc};

use advisory_compliance::workflows::records::{reconcile, RecordType, SubjectId};
use advisory_compliance::workflows::roster::ClientRosterImporter;

const ROSTER_CSV: &str = "\
Client Ref,Client Name,Onboarded,Status
cl-2001,Harriet Voss,2021-03-15,active
cl-2002,Bellwether Trustees Ltd,2020-11-02,active
cl-2003,Dormant Estate,2018-06-30,archived
cl-2002,Bellwether Trustees Ltd,2020-11-02,active
";

#[test]
fn roster_import_feeds_the_dashboard_overlay() {
    let subjects = ClientRosterImporter::from_reader(Cursor::new(ROSTER_CSV))
        .expect("roster parses");
    assert_eq!(subjects.len(), 2);

    let now = Utc
        .with_ymd_and_hms(2024, 3, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp");
    let rows = reconcile(&subjects, &[], RecordType::Aml, now);

    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row.is_virtual()));
    assert_eq!(rows[0].subject_id, SubjectId("CL-2001".to_string()));
    assert_eq!(rows[1].subject_id, SubjectId("CL-2002".to_string()));
}
