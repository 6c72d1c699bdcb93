use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::attendance::{AttendanceRecord, NewAttendanceRecord};
use uuid::Uuid;

const ATTENDANCE_COLUMNS: &str =
    "id, student_id, student_name, student_email, session_id, course_id, course_name, teacher_id, teacher_name, timestamp, date, source";

#[async_trait::async_trait]
pub trait AttendanceRepository: Send + Sync {
    async fn create_attendance(&self, record: &NewAttendanceRecord) -> Result<AttendanceRecord, AppError>;
    async fn list_attendance_for_session(&self, session_id: &str) -> Result<Vec<AttendanceRecord>, AppError>;
    async fn list_attendance_for_student(&self, student_id: &Uuid) -> Result<Vec<AttendanceRecord>, AppError>;
}

#[async_trait::async_trait]
impl AttendanceRepository for PostgresRepository {
    async fn create_attendance(&self, record: &NewAttendanceRecord) -> Result<AttendanceRecord, AppError> {
        let created = sqlx::query_as::<_, AttendanceRecord>(&format!(
            r#"
            INSERT INTO attendance (student_id, student_name, student_email, session_id, course_id, course_name,
                                    teacher_id, teacher_name, timestamp, date, source)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {ATTENDANCE_COLUMNS}
            "#
        ))
        .bind(record.student_id)
        .bind(&record.student_name)
        .bind(&record.student_email)
        .bind(&record.session_id)
        .bind(record.course_id)
        .bind(&record.course_name)
        .bind(record.teacher_id)
        .bind(&record.teacher_name)
        .bind(record.timestamp)
        .bind(record.date)
        .bind(record.source)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list_attendance_for_session(&self, session_id: &str) -> Result<Vec<AttendanceRecord>, AppError> {
        let records = sqlx::query_as::<_, AttendanceRecord>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE session_id = $1 ORDER BY timestamp ASC"
        ))
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn list_attendance_for_student(&self, student_id: &Uuid) -> Result<Vec<AttendanceRecord>, AppError> {
        let records = sqlx::query_as::<_, AttendanceRecord>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE student_id = $1 ORDER BY timestamp DESC"
        ))
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
