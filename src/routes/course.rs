use crate::auth::CurrentUser;
use crate::database::course::CourseRepository;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::course::{CourseRequest, CourseResponse};
use crate::models::user::Role;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{State, get, post};
use rocket_okapi::openapi;
use sqlx::PgPool;
use validator::Validate;

/// The course catalog
#[openapi(tag = "Courses")]
#[get("/")]
pub async fn list_courses(pool: &State<PgPool>, _current_user: CurrentUser) -> Result<Json<Vec<CourseResponse>>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let courses = repo.list_courses().await?;
    Ok(Json(courses.iter().map(CourseResponse::from).collect()))
}

/// Add a course to the catalog
#[openapi(tag = "Courses")]
#[post("/", data = "<payload>")]
pub async fn create_course(pool: &State<PgPool>, current_user: CurrentUser, payload: Json<CourseRequest>) -> Result<status::Custom<Json<CourseResponse>>, AppError> {
    current_user.require_role(Role::Teacher, "Only teachers add courses")?;
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let course = repo.create_course(&payload).await?;
    Ok(status::Custom(Status::Created, Json(CourseResponse::from(&course))))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![list_courses, create_course]
}
