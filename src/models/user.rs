use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, JsonSchema, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    #[default]
    Student,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Teacher => write!(f, "teacher"),
            Role::Student => write!(f, "student"),
        }
    }
}

#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password_hash: String,
    pub enrolled_courses: Vec<Uuid>,
    pub course_selection_completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub enrolled_courses: Vec<Uuid>,
    pub course_selection_completed: bool,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            enrolled_courses: user.enrolled_courses.clone(),
            course_selection_completed: user.course_selection_completed,
        }
    }
}

#[derive(Deserialize, Debug, Validate, JsonSchema)]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "Please fill in all fields and select a role"))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub role: Role,
}

#[derive(Deserialize, Debug, JsonSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The set of courses a student says they are enrolled in.
#[derive(Deserialize, Debug, Validate, JsonSchema)]
pub struct EnrollmentRequest {
    #[validate(length(min = 1, message = "Please select at least one course"))]
    pub course_ids: Vec<Uuid>,
}
