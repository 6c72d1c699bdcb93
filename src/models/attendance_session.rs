use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use uuid::Uuid;

/// A teacher-initiated attendance window. Immutable once created; it lives only in the
/// session registry and inside the QR payload handed to students.
#[derive(Serialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct Session {
    pub id: String,
    pub teacher_id: Uuid,
    pub teacher_name: String,
    pub course_id: Option<Uuid>,
    pub course_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The JSON document encoded into the attendance QR code.
///
/// Nothing here is signed or expires: scanners trust it at face value.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub teacher_id: Uuid,
    pub teacher_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_name: Option<String>,
}

impl From<&Session> for QrPayload {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id.clone(),
            timestamp: session.created_at,
            teacher_id: session.teacher_id,
            teacher_name: session.teacher_name.clone(),
            course_id: session.course_id,
            course_name: session.course_name.clone(),
        }
    }
}

#[derive(Deserialize, Debug, Default, JsonSchema)]
pub struct StartSessionRequest {
    pub course_id: Option<Uuid>,
    pub course_name: Option<String>,
}

/// An active session together with its rendered QR code (an SVG data URL).
#[derive(Serialize, Debug, Clone, JsonSchema)]
pub struct ActiveSession {
    pub session: Session,
    pub qr_code: String,
}

/// What the teacher's attendance screen shows.
#[derive(Serialize, Debug, Clone, JsonSchema)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SessionView {
    Idle,
    Active(ActiveSession),
}

impl SessionView {
    pub fn is_active(&self) -> bool {
        matches!(self, SessionView::Active(_))
    }
}
