use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use std::sync::LazyLock;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// 24-hour "HH:MM" clock time as stored on classes and schedule entries.
pub(crate) static CLOCK_TIME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("valid clock time regex"));

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, JsonSchema, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ClassStatus {
    #[default]
    Scheduled,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, Default, PartialEq, sqlx::FromRow)]
pub struct ClassSession {
    pub id: Uuid,
    pub course_id: Option<Uuid>,
    pub course_name: String,
    pub course_code: String,
    pub teacher_id: Uuid,
    pub date: NaiveDate,
    pub time: String,
    pub room: String,
    pub status: ClassStatus,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancelled_by: Option<Uuid>,
}

#[derive(Deserialize, Debug, Validate, JsonSchema)]
pub struct ClassRequest {
    pub course_id: Option<Uuid>,
    #[validate(length(min = 1))]
    pub course_name: String,
    #[validate(length(min = 1))]
    pub course_code: String,
    pub date: NaiveDate,
    #[validate(custom(function = "validate_clock_time"))]
    #[schemars(regex(pattern = r"^([01]\d|2[0-3]):[0-5]\d$"))]
    pub time: String,
    #[serde(default)]
    pub room: String,
}

fn validate_clock_time(time: &str) -> Result<(), ValidationError> {
    if CLOCK_TIME.is_match(time) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_clock_time").with_message("time must be HH:MM".into()))
    }
}

#[derive(Deserialize, Debug, Default, JsonSchema)]
pub struct CancelClassRequest {
    pub activity_suggestions: String,
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct ClassResponse {
    pub id: Uuid,
    pub course_id: Option<Uuid>,
    pub course_name: String,
    pub course_code: String,
    pub date: NaiveDate,
    pub time: String,
    pub room: String,
    pub status: ClassStatus,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl From<&ClassSession> for ClassResponse {
    fn from(class: &ClassSession) -> Self {
        Self {
            id: class.id,
            course_id: class.course_id,
            course_name: class.course_name.clone(),
            course_code: class.course_code.clone(),
            date: class.date,
            time: class.time.clone(),
            room: class.room.clone(),
            status: class.status,
            cancelled_at: class.cancelled_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct CurricularSuggestion {
    pub id: Uuid,
    pub class_id: Uuid,
    pub course_name: String,
    pub course_code: String,
    pub suggestions: String,
    pub teacher_id: Uuid,
    pub teacher_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCurricularSuggestion {
    pub class_id: Uuid,
    pub course_name: String,
    pub course_code: String,
    pub suggestions: String,
    pub teacher_id: Uuid,
    pub teacher_name: String,
    pub created_at: DateTime<Utc>,
}
