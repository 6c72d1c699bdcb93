use crate::auth::{CurrentUser, SESSION_COOKIE, parse_session_cookie_value, session_cookie_value};
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::user::{EnrollmentRequest, LoginRequest, Role, SignupRequest, UserResponse};
use crate::service::auth::AuthService;
use rocket::http::{Cookie, CookieJar, SameSite, Status};
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{State, get, post, put};
use rocket_okapi::openapi;
use sqlx::PgPool;
use tracing::info;
use validator::Validate;

/// Register a teacher or student account
#[openapi(tag = "Users")]
#[post("/", data = "<payload>")]
pub async fn post_user(pool: &State<PgPool>, payload: Json<SignupRequest>) -> Result<status::Custom<Json<UserResponse>>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let user = AuthService { repo: &repo }.signup(&payload).await?;
    Ok(status::Custom(Status::Created, Json(UserResponse::from(&user))))
}

/// Log in and receive the session cookie
#[openapi(tag = "Users")]
#[post("/login", data = "<payload>")]
pub async fn post_user_login(pool: &State<PgPool>, cookies: &CookieJar<'_>, payload: Json<LoginRequest>) -> Result<Json<UserResponse>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let (user, session) = AuthService { repo: &repo }.login(&payload).await?;

    cookies.add_private(
        Cookie::build((SESSION_COOKIE, session_cookie_value(&session.id, &user.id)))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build(),
    );

    Ok(Json(UserResponse::from(&user)))
}

/// End the current session
#[openapi(tag = "Users")]
#[post("/logout")]
pub async fn post_user_logout(pool: &State<PgPool>, cookies: &CookieJar<'_>) -> Result<Status, AppError> {
    if let Some(cookie) = cookies.get_private(SESSION_COOKIE)
        && let Some((session_id, user_id)) = parse_session_cookie_value(cookie.value())
    {
        let repo = PostgresRepository { pool: pool.inner().clone() };
        repo.delete_login_session(&session_id).await?;
        info!(user_id = %user_id, "user logged out");
    }

    cookies.remove_private(Cookie::build(SESSION_COOKIE).path("/").build());
    Ok(Status::Ok)
}

/// The signed-in user's profile
#[openapi(tag = "Users")]
#[get("/me")]
pub async fn get_me(pool: &State<PgPool>, current_user: CurrentUser) -> Result<Json<UserResponse>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let user = repo.get_user_by_id(&current_user.id).await?.ok_or(AppError::UserNotFound)?;
    Ok(Json(UserResponse::from(&user)))
}

/// Record the student's course selection
#[openapi(tag = "Users")]
#[put("/me/courses", data = "<payload>")]
pub async fn put_my_courses(pool: &State<PgPool>, current_user: CurrentUser, payload: Json<EnrollmentRequest>) -> Result<Json<UserResponse>, AppError> {
    current_user.require_role(Role::Student, "Only students enroll in courses")?;
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let user = repo.update_enrolled_courses(&current_user.id, &payload.course_ids).await?;
    info!(user_id = %user.id, courses = user.enrolled_courses.len(), "course selection saved");
    Ok(Json(UserResponse::from(&user)))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![post_user, post_user_login, post_user_logout, get_me, put_my_courses]
}
