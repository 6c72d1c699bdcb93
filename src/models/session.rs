use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A login session backing the private `user` cookie.
#[derive(Debug, sqlx::FromRow)]
pub struct LoginSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
