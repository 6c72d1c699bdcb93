use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::course::{Course, CourseRequest};
use uuid::Uuid;

#[async_trait::async_trait]
pub trait CourseRepository: Send + Sync {
    async fn create_course(&self, request: &CourseRequest) -> Result<Course, AppError>;
    async fn get_course_by_id(&self, id: &Uuid) -> Result<Option<Course>, AppError>;
    async fn list_courses(&self) -> Result<Vec<Course>, AppError>;
}

#[async_trait::async_trait]
impl CourseRepository for PostgresRepository {
    async fn create_course(&self, request: &CourseRequest) -> Result<Course, AppError> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (name, code, instructor, schedule, credits)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, code, instructor, schedule, credits, created_at
            "#,
        )
        .bind(&request.name)
        .bind(&request.code)
        .bind(&request.instructor)
        .bind(&request.schedule)
        .bind(request.credits)
        .fetch_one(&self.pool)
        .await?;

        Ok(course)
    }

    async fn get_course_by_id(&self, id: &Uuid) -> Result<Option<Course>, AppError> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            SELECT id, name, code, instructor, schedule, credits, created_at
            FROM courses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(course)
    }

    async fn list_courses(&self) -> Result<Vec<Course>, AppError> {
        let courses = sqlx::query_as::<_, Course>(
            r#"
            SELECT id, name, code, instructor, schedule, credits, created_at
            FROM courses
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(courses)
    }
}
