use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::schedule::ScheduleItem;
use uuid::Uuid;

#[async_trait::async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// The student's entries for a weekday (e.g. "Monday"), earliest first.
    async fn list_schedule_for_day(&self, student_id: &Uuid, day_of_week: &str) -> Result<Vec<ScheduleItem>, AppError>;
}

#[async_trait::async_trait]
impl ScheduleRepository for PostgresRepository {
    async fn list_schedule_for_day(&self, student_id: &Uuid, day_of_week: &str) -> Result<Vec<ScheduleItem>, AppError> {
        let items = sqlx::query_as::<_, ScheduleItem>(
            r#"
            SELECT id, student_id, course_name, course_code, day_of_week, time, room, instructor
            FROM schedule
            WHERE student_id = $1
              AND day_of_week = $2
            ORDER BY time ASC
            "#,
        )
        .bind(student_id)
        .bind(day_of_week)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}
