use crate::models::health::HealthResponse;
use crate::service::notification_feed::NotificationFeed;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{State, get};
use rocket_okapi::openapi;
use sqlx::PgPool;
use tracing::error;

/// Liveness plus a database round-trip
#[openapi(tag = "Health")]
#[get("/")]
pub async fn healthcheck(pool: &State<PgPool>, feed: &State<NotificationFeed>) -> status::Custom<Json<HealthResponse>> {
    let database_up = match sqlx::query("SELECT 1").execute(pool.inner()).await {
        Ok(_) => true,
        Err(err) => {
            error!(error = ?err, "health check database ping failed");
            false
        }
    };

    let code = if database_up { Status::Ok } else { Status::ServiceUnavailable };
    status::Custom(
        code,
        Json(HealthResponse {
            status: if database_up { "ok" } else { "degraded" },
            database: if database_up { "up" } else { "down" },
            active_feed_subscribers: feed.subscriber_count(),
        }),
    )
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![healthcheck]
}
