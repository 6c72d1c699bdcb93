use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, JsonSchema, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ClassCancelled,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Notification {
    pub id: Uuid,
    #[sqlx(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
    pub session_id: Option<String>,
    pub class_id: Option<Uuid>,
    pub course_name: Option<String>,
    pub activity_suggestions: Option<String>,
    pub teacher_id: Uuid,
    pub teacher_name: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub kind: NotificationKind,
    pub message: String,
    pub session_id: Option<String>,
    pub class_id: Option<Uuid>,
    pub course_name: Option<String>,
    pub activity_suggestions: Option<String>,
    pub teacher_id: Uuid,
    pub teacher_name: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize, Debug, Clone, JsonSchema)]
pub struct NotificationResponse {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
    pub session_id: Option<String>,
    pub class_id: Option<Uuid>,
    pub course_name: Option<String>,
    pub activity_suggestions: Option<String>,
    pub teacher_id: Uuid,
    pub teacher_name: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    /// Human label such as "5 min ago", computed when the response is built.
    pub relative_time: String,
}

impl NotificationResponse {
    pub fn new(notification: &Notification, now: DateTime<Utc>) -> Self {
        Self {
            id: notification.id,
            kind: notification.kind,
            message: notification.message.clone(),
            session_id: notification.session_id.clone(),
            class_id: notification.class_id,
            course_name: notification.course_name.clone(),
            activity_suggestions: notification.activity_suggestions.clone(),
            teacher_id: notification.teacher_id,
            teacher_name: notification.teacher_name.clone(),
            timestamp: notification.timestamp,
            read: notification.read,
            relative_time: crate::util::format_relative_time(notification.timestamp, now),
        }
    }
}
