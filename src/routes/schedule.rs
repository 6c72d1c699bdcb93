use crate::auth::CurrentUser;
use crate::config::Config;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::schedule::ScheduleItemResponse;
use crate::models::user::Role;
use crate::service::schedule::todays_schedule;
use chrono::{Duration, Utc};
use rocket::serde::json::Json;
use rocket::{State, get};
use rocket_okapi::openapi;
use sqlx::PgPool;

/// The student's remaining classes for today
#[openapi(tag = "Schedule")]
#[get("/today")]
pub async fn get_today(pool: &State<PgPool>, config: &State<Config>, current_user: CurrentUser) -> Result<Json<Vec<ScheduleItemResponse>>, AppError> {
    current_user.require_role(Role::Student, "Only students have a schedule")?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let local_now = Utc::now().with_timezone(&config.attendance.tz()).naive_local();
    let duration = Duration::minutes(config.attendance.class_duration_minutes);
    let items = todays_schedule(&repo, &current_user.id, local_now, duration).await?;
    Ok(Json(items))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![get_today]
}
