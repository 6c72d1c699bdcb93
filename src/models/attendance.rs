use chrono::{DateTime, NaiveDate, Utc};
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use uuid::Uuid;

/// How the student's device captured the QR code. Both paths submit the same decoded
/// text; the source is kept for reporting only.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, JsonSchema, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CaptureSource {
    #[default]
    LiveFrame,
    StillImage,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub student_id: Uuid,
    pub student_name: String,
    pub student_email: String,
    pub session_id: String,
    pub course_id: Option<Uuid>,
    pub course_name: String,
    pub teacher_id: Uuid,
    pub teacher_name: String,
    pub timestamp: DateTime<Utc>,
    pub date: NaiveDate,
    pub source: CaptureSource,
}

/// Everything needed to insert an attendance row; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewAttendanceRecord {
    pub student_id: Uuid,
    pub student_name: String,
    pub student_email: String,
    pub session_id: String,
    pub course_id: Option<Uuid>,
    pub course_name: String,
    pub teacher_id: Uuid,
    pub teacher_name: String,
    pub timestamp: DateTime<Utc>,
    pub date: NaiveDate,
    pub source: CaptureSource,
}

#[derive(Deserialize, Debug, JsonSchema)]
pub struct CheckInRequest {
    /// The raw text decoded from the QR code.
    pub payload: String,
    #[serde(default)]
    pub source: CaptureSource,
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct AttendanceResponse {
    pub id: Uuid,
    pub student_id: Uuid,
    pub student_name: String,
    pub session_id: String,
    pub course_id: Option<Uuid>,
    pub course_name: String,
    pub teacher_name: String,
    pub timestamp: DateTime<Utc>,
    pub date: NaiveDate,
    pub source: CaptureSource,
}

impl From<&AttendanceRecord> for AttendanceResponse {
    fn from(record: &AttendanceRecord) -> Self {
        Self {
            id: record.id,
            student_id: record.student_id,
            student_name: record.student_name.clone(),
            session_id: record.session_id.clone(),
            course_id: record.course_id,
            course_name: record.course_name.clone(),
            teacher_name: record.teacher_name.clone(),
            timestamp: record.timestamp,
            date: record.date,
            source: record.source,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct CourseAttendance {
    pub course_name: String,
    pub check_ins: i64,
}

#[derive(Serialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct AttendanceStats {
    pub total_check_ins: i64,
    pub sessions_attended: i64,
    pub last_check_in: Option<DateTime<Utc>>,
    pub per_course: Vec<CourseAttendance>,
}
