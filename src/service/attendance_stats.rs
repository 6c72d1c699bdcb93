use crate::models::attendance::{AttendanceRecord, AttendanceStats, CourseAttendance};
use std::collections::{BTreeMap, HashSet};

/// Aggregate a student's attendance history. Duplicate scans count as separate
/// check-ins but only once towards `sessions_attended`.
pub fn summarize(records: &[AttendanceRecord]) -> AttendanceStats {
    let sessions: HashSet<&str> = records.iter().map(|r| r.session_id.as_str()).collect();

    let mut per_course: BTreeMap<&str, i64> = BTreeMap::new();
    for record in records {
        *per_course.entry(record.course_name.as_str()).or_default() += 1;
    }

    let mut per_course: Vec<CourseAttendance> = per_course
        .into_iter()
        .map(|(course_name, check_ins)| CourseAttendance {
            course_name: course_name.to_string(),
            check_ins,
        })
        .collect();
    // Stable sort keeps the alphabetical order from the map for ties.
    per_course.sort_by(|a, b| b.check_ins.cmp(&a.check_ins));

    AttendanceStats {
        total_check_ins: records.len() as i64,
        sessions_attended: sessions.len() as i64,
        last_check_in: records.iter().map(|r| r.timestamp).max(),
        per_course,
    }
}
