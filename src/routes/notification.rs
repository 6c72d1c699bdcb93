use crate::auth::CurrentUser;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::notification::{Notification, NotificationResponse};
use crate::service::notification_feed::NotificationFeed;
use chrono::Utc;
use rocket::response::stream::{Event, EventStream};
use rocket::serde::json::Json;
use rocket::{Shutdown, State, get};
use rocket_okapi::openapi;
use sqlx::PgPool;
use tracing::{debug, warn};

fn responses(notifications: &[Notification]) -> Vec<NotificationResponse> {
    let now = Utc::now();
    notifications.iter().map(|n| NotificationResponse::new(n, now)).collect()
}

/// The most recent notifications, newest first
#[openapi(tag = "Notifications")]
#[get("/")]
pub async fn list_notifications(pool: &State<PgPool>, feed: &State<NotificationFeed>, _current_user: CurrentUser) -> Result<Json<Vec<NotificationResponse>>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let snapshot = feed.refresh(&repo).await?;
    Ok(Json(responses(&snapshot)))
}

/// Server-sent events: the current snapshot, then a full replacement list on every change.
#[openapi(skip)]
#[get("/stream")]
pub async fn stream_notifications(
    pool: &State<PgPool>,
    feed: &State<NotificationFeed>,
    current_user: CurrentUser,
    mut shutdown: Shutdown,
) -> Result<EventStream![], AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let (mut subscription, initial) = feed.open(&repo).await?;
    debug!(user_id = %current_user.id, subscribers = feed.subscriber_count(), "notification stream opened");

    Ok(EventStream! {
        yield Event::json(&responses(&initial)).event("notifications");

        loop {
            let snapshot = rocket::tokio::select! {
                next = subscription.next() => match next {
                    Some(snapshot) => snapshot,
                    None => {
                        warn!("notification feed closed");
                        break;
                    }
                },
                _ = &mut shutdown => break,
            };
            yield Event::json(&responses(&snapshot)).event("notifications");
        }

        debug!(user_id = %current_user.id, "notification stream closed");
    })
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![list_notifications, stream_notifications]
}
