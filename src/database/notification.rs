use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::notification::{NewNotification, Notification};

const NOTIFICATION_COLUMNS: &str =
    "id, type, message, session_id, class_id, course_name, activity_suggestions, teacher_id, teacher_name, timestamp, read";

#[async_trait::async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create_notification(&self, notification: &NewNotification) -> Result<Notification, AppError>;
    /// The `limit` most recent notifications, newest first.
    async fn list_recent_notifications(&self, limit: i64) -> Result<Vec<Notification>, AppError>;
}

#[async_trait::async_trait]
impl NotificationRepository for PostgresRepository {
    async fn create_notification(&self, notification: &NewNotification) -> Result<Notification, AppError> {
        let created = sqlx::query_as::<_, Notification>(&format!(
            r#"
            INSERT INTO notifications (type, message, session_id, class_id, course_name, activity_suggestions,
                                       teacher_id, teacher_name, timestamp, read)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, false)
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(notification.kind)
        .bind(&notification.message)
        .bind(&notification.session_id)
        .bind(notification.class_id)
        .bind(&notification.course_name)
        .bind(&notification.activity_suggestions)
        .bind(notification.teacher_id)
        .bind(&notification.teacher_name)
        .bind(notification.timestamp)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list_recent_notifications(&self, limit: i64) -> Result<Vec<Notification>, AppError> {
        let notifications = sqlx::query_as::<_, Notification>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications ORDER BY timestamp DESC LIMIT $1"
        ))
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }
}
