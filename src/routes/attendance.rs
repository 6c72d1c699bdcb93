use crate::auth::CurrentUser;
use crate::config::Config;
use crate::database::attendance::AttendanceRepository;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::attendance::{AttendanceResponse, AttendanceStats, CheckInRequest};
use crate::models::user::Role;
use crate::service::attendance_stats::summarize;
use crate::service::check_in::CheckInHandler;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{State, get, post};
use rocket_okapi::openapi;
use sqlx::PgPool;

/// Submit the text decoded from a session QR code
#[openapi(tag = "Attendance")]
#[post("/check-in", data = "<payload>")]
pub async fn check_in(
    pool: &State<PgPool>,
    config: &State<Config>,
    current_user: CurrentUser,
    payload: Json<CheckInRequest>,
) -> Result<status::Custom<Json<AttendanceResponse>>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let handler = CheckInHandler {
        repo: &repo,
        timezone: config.attendance.tz(),
    };
    let record = handler.on_scan(&current_user, &payload.payload, payload.source).await?;
    Ok(status::Custom(Status::Created, Json(AttendanceResponse::from(&record))))
}

/// The student's check-ins, newest first
#[openapi(tag = "Attendance")]
#[get("/me")]
pub async fn get_my_attendance(pool: &State<PgPool>, current_user: CurrentUser) -> Result<Json<Vec<AttendanceResponse>>, AppError> {
    current_user.require_role(Role::Student, "Only students have attendance history")?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let records = repo.list_attendance_for_student(&current_user.id).await?;
    Ok(Json(records.iter().map(AttendanceResponse::from).collect()))
}

/// Totals and per-course counts for the student
#[openapi(tag = "Attendance")]
#[get("/stats")]
pub async fn get_my_stats(pool: &State<PgPool>, current_user: CurrentUser) -> Result<Json<AttendanceStats>, AppError> {
    current_user.require_role(Role::Student, "Only students have attendance history")?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let records = repo.list_attendance_for_student(&current_user.id).await?;
    Ok(Json(summarize(&records)))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![check_in, get_my_attendance, get_my_stats]
}
