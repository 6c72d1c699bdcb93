use crate::auth::CurrentUser;
use crate::database::attendance::AttendanceRepository;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::attendance::AttendanceResponse;
use crate::models::attendance_session::{ActiveSession, SessionView, StartSessionRequest};
use crate::models::notification::NotificationResponse;
use crate::models::user::Role;
use crate::service::attendance_session::{SessionManager, SessionRegistry};
use crate::service::notification_feed::NotificationFeed;
use crate::service::qr_codec::QrCodec;
use chrono::Utc;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{State, get, post};
use rocket_okapi::openapi;
use sqlx::PgPool;

fn manager<'a>(
    repo: &'a PostgresRepository,
    registry: &'a SessionRegistry,
    codec: &'a QrCodec,
    feed: &'a NotificationFeed,
) -> SessionManager<'a, PostgresRepository> {
    SessionManager { repo, registry, codec, feed }
}

/// Start an attendance session and get its QR code
#[openapi(tag = "Attendance Sessions")]
#[post("/", data = "<payload>")]
pub async fn start_session(
    pool: &State<PgPool>,
    registry: &State<SessionRegistry>,
    codec: &State<QrCodec>,
    feed: &State<NotificationFeed>,
    current_user: CurrentUser,
    payload: Json<StartSessionRequest>,
) -> Result<status::Custom<Json<ActiveSession>>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let active = manager(&repo, registry, codec, feed).start_session(&current_user, &payload).await?;
    Ok(status::Custom(Status::Created, Json(active)))
}

/// The teacher's attendance screen: idle, or the active session with its QR code
#[openapi(tag = "Attendance Sessions")]
#[get("/current")]
pub async fn get_current_session(
    pool: &State<PgPool>,
    registry: &State<SessionRegistry>,
    codec: &State<QrCodec>,
    feed: &State<NotificationFeed>,
    current_user: CurrentUser,
) -> Result<Json<SessionView>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let view = manager(&repo, registry, codec, feed).current_session(&current_user).await?;
    Ok(Json(view))
}

/// Cancel a session and notify students
#[openapi(tag = "Attendance Sessions")]
#[post("/<id>/cancel")]
pub async fn cancel_session(
    pool: &State<PgPool>,
    registry: &State<SessionRegistry>,
    codec: &State<QrCodec>,
    feed: &State<NotificationFeed>,
    current_user: CurrentUser,
    id: String,
) -> Result<Json<NotificationResponse>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let notification = manager(&repo, registry, codec, feed).cancel_session(&current_user, &id).await?;
    Ok(Json(NotificationResponse::new(&notification, Utc::now())))
}

/// Check-ins recorded against one of the teacher's sessions
#[openapi(tag = "Attendance Sessions")]
#[get("/<id>/attendance")]
pub async fn get_session_attendance(pool: &State<PgPool>, current_user: CurrentUser, id: String) -> Result<Json<Vec<AttendanceResponse>>, AppError> {
    current_user.require_role(Role::Teacher, "Only teachers view session attendance")?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let records = repo.list_attendance_for_session(&id).await?;
    Ok(Json(
        records
            .iter()
            .filter(|record| record.teacher_id == current_user.id)
            .map(AttendanceResponse::from)
            .collect(),
    ))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![start_session, get_current_session, cancel_session, get_session_attendance]
}
