use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ScheduleItem {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_name: String,
    pub course_code: String,
    pub day_of_week: String,
    pub time: String,
    pub room: String,
    pub instructor: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStatus {
    Upcoming,
    Ongoing,
    Completed,
}

#[derive(Serialize, Debug, Clone, JsonSchema)]
pub struct ScheduleItemResponse {
    pub id: Uuid,
    pub course_name: String,
    pub course_code: String,
    pub time: String,
    pub room: String,
    pub instructor: String,
    pub status: ScheduleStatus,
}

impl ScheduleItemResponse {
    pub fn new(item: &ScheduleItem, status: ScheduleStatus) -> Self {
        Self {
            id: item.id,
            course_name: item.course_name.clone(),
            course_code: item.course_code.clone(),
            time: item.time.clone(),
            room: item.room.clone(),
            instructor: item.instructor.clone(),
            status,
        }
    }
}
