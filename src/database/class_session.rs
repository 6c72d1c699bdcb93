use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::class_session::{ClassRequest, ClassSession, CurricularSuggestion, NewCurricularSuggestion};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

const CLASS_COLUMNS: &str = "id, course_id, course_name, course_code, teacher_id, date, time, room, status, cancelled_at, cancelled_by";

#[async_trait::async_trait]
pub trait ClassRepository: Send + Sync {
    async fn create_class(&self, teacher_id: &Uuid, request: &ClassRequest) -> Result<ClassSession, AppError>;
    async fn get_class_by_id(&self, id: &Uuid) -> Result<Option<ClassSession>, AppError>;
    /// Classes for the teacher dated `from` or later that are not completed.
    async fn list_upcoming_classes(&self, teacher_id: &Uuid, from: NaiveDate) -> Result<Vec<ClassSession>, AppError>;
    /// Cancel the class if it is still scheduled. `None` when it is missing or no
    /// longer scheduled.
    async fn mark_class_cancelled(&self, id: &Uuid, cancelled_by: &Uuid, cancelled_at: DateTime<Utc>) -> Result<Option<ClassSession>, AppError>;
    async fn create_curricular_suggestion(&self, suggestion: &NewCurricularSuggestion) -> Result<CurricularSuggestion, AppError>;
}

#[async_trait::async_trait]
impl ClassRepository for PostgresRepository {
    async fn create_class(&self, teacher_id: &Uuid, request: &ClassRequest) -> Result<ClassSession, AppError> {
        let class = sqlx::query_as::<_, ClassSession>(&format!(
            r#"
            INSERT INTO classes (course_id, course_name, course_code, teacher_id, date, time, room, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'scheduled')
            RETURNING {CLASS_COLUMNS}
            "#
        ))
        .bind(request.course_id)
        .bind(&request.course_name)
        .bind(&request.course_code)
        .bind(teacher_id)
        .bind(request.date)
        .bind(&request.time)
        .bind(&request.room)
        .fetch_one(&self.pool)
        .await?;

        Ok(class)
    }

    async fn get_class_by_id(&self, id: &Uuid) -> Result<Option<ClassSession>, AppError> {
        let class = sqlx::query_as::<_, ClassSession>(&format!("SELECT {CLASS_COLUMNS} FROM classes WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(class)
    }

    async fn list_upcoming_classes(&self, teacher_id: &Uuid, from: NaiveDate) -> Result<Vec<ClassSession>, AppError> {
        let classes = sqlx::query_as::<_, ClassSession>(&format!(
            r#"
            SELECT {CLASS_COLUMNS}
            FROM classes
            WHERE teacher_id = $1
              AND date >= $2
              AND status <> 'completed'
            ORDER BY date ASC, time ASC
            "#
        ))
        .bind(teacher_id)
        .bind(from)
        .fetch_all(&self.pool)
        .await?;

        Ok(classes)
    }

    async fn mark_class_cancelled(&self, id: &Uuid, cancelled_by: &Uuid, cancelled_at: DateTime<Utc>) -> Result<Option<ClassSession>, AppError> {
        let class = sqlx::query_as::<_, ClassSession>(&format!(
            r#"
            UPDATE classes
            SET status = 'cancelled', cancelled_at = $1, cancelled_by = $2
            WHERE id = $3
              AND status = 'scheduled'
            RETURNING {CLASS_COLUMNS}
            "#
        ))
        .bind(cancelled_at)
        .bind(cancelled_by)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(class)
    }

    async fn create_curricular_suggestion(&self, suggestion: &NewCurricularSuggestion) -> Result<CurricularSuggestion, AppError> {
        let created = sqlx::query_as::<_, CurricularSuggestion>(
            r#"
            INSERT INTO curricular_suggestions (class_id, course_name, course_code, suggestions, teacher_id, teacher_name, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, class_id, course_name, course_code, suggestions, teacher_id, teacher_name, created_at
            "#,
        )
        .bind(suggestion.class_id)
        .bind(&suggestion.course_name)
        .bind(&suggestion.course_code)
        .bind(&suggestion.suggestions)
        .bind(suggestion.teacher_id)
        .bind(&suggestion.teacher_name)
        .bind(suggestion.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }
}
