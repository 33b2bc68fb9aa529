//! Test history queries.

use crate::TestRecord;
use uuid::Uuid;

/// A student's records, newest first
pub fn records_for(records: &[TestRecord], student_id: Uuid) -> Vec<&TestRecord> {
    let mut out: Vec<_> = records
        .iter()
        .filter(|r| r.student_id == student_id)
        .collect();
    out.sort_by(|a, b| b.test_date.cmp(&a.test_date));
    out
}

/// Order records newest first; ties keep submission order
pub fn sort_newest_first(records: &mut [TestRecord]) {
    records.sort_by(|a, b| b.test_date.cmp(&a.test_date));
}

/// The student's most recent record, used to prefill the next evaluation
pub fn previous_test(records: &[TestRecord], student_id: Uuid) -> Option<&TestRecord> {
    records
        .iter()
        .filter(|r| r.student_id == student_id)
        .max_by_key(|r| r.test_date)
}
