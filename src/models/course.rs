use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Default, PartialEq, sqlx::FromRow)]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub instructor: String,
    pub schedule: String,
    pub credits: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Validate, JsonSchema)]
pub struct CourseRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub code: String,
    #[validate(length(min = 1))]
    pub instructor: String,
    #[serde(default)]
    pub schedule: String,
    #[validate(range(min = 0, max = 60))]
    #[serde(default)]
    pub credits: i32,
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct CourseResponse {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub instructor: String,
    pub schedule: String,
    pub credits: i32,
}

impl From<&Course> for CourseResponse {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id,
            name: course.name.clone(),
            code: course.code.clone(),
            instructor: course.instructor.clone(),
            schedule: course.schedule.clone(),
            credits: course.credits,
        }
    }
}
