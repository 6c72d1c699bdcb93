use crate::auth::CurrentUser;
use crate::config::Config;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::class_session::{CancelClassRequest, ClassRequest, ClassResponse};
use crate::models::notification::NotificationResponse;
use crate::service::class_management::ClassManager;
use crate::service::notification_feed::NotificationFeed;
use chrono::Utc;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::serde::Serialize;
use rocket::{State, get, post};
use rocket_okapi::openapi;
use schemars::JsonSchema;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Serialize, Debug, JsonSchema)]
pub struct CancelClassResponse {
    pub class: ClassResponse,
    pub notification: NotificationResponse,
}

/// The teacher's classes from today on that have not been completed
#[openapi(tag = "Classes")]
#[get("/upcoming")]
pub async fn list_upcoming(
    pool: &State<PgPool>,
    config: &State<Config>,
    feed: &State<NotificationFeed>,
    current_user: CurrentUser,
) -> Result<Json<Vec<ClassResponse>>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let today = Utc::now().with_timezone(&config.attendance.tz()).date_naive();
    let classes = ClassManager { repo: &repo, feed }.list_upcoming(&current_user, today).await?;
    Ok(Json(classes.iter().map(ClassResponse::from).collect()))
}

/// Schedule a class
#[openapi(tag = "Classes")]
#[post("/", data = "<payload>")]
pub async fn create_class(
    pool: &State<PgPool>,
    feed: &State<NotificationFeed>,
    current_user: CurrentUser,
    payload: Json<ClassRequest>,
) -> Result<status::Custom<Json<ClassResponse>>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let class = ClassManager { repo: &repo, feed }.create_class(&current_user, &payload).await?;
    Ok(status::Custom(Status::Created, Json(ClassResponse::from(&class))))
}

/// Cancel a scheduled class and send students the suggested activities
#[openapi(tag = "Classes")]
#[post("/<id>/cancel", data = "<payload>")]
pub async fn cancel_class(
    pool: &State<PgPool>,
    feed: &State<NotificationFeed>,
    current_user: CurrentUser,
    id: String,
    payload: Json<CancelClassRequest>,
) -> Result<Json<CancelClassResponse>, AppError> {
    let class_id = Uuid::parse_str(&id)?;
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let cancelled = ClassManager { repo: &repo, feed }
        .cancel_class(&current_user, Some(class_id), &payload.activity_suggestions)
        .await?;

    Ok(Json(CancelClassResponse {
        class: ClassResponse::from(&cancelled.class),
        notification: NotificationResponse::new(&cancelled.notification, Utc::now()),
    }))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![list_upcoming, create_class, cancel_class]
}
