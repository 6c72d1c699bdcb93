use crate::database::notification::NotificationRepository;
use crate::error::app_error::AppError;
use crate::models::notification::{NewNotification, Notification};
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tracing::{debug, warn};

pub type FeedSnapshot = Arc<Vec<Notification>>;

/// Fan-out of the most recent notifications.
///
/// Every write that goes through [`NotificationFeed::publish`] re-reads the newest
/// `limit` notifications and replaces the snapshot all subscribers see. Subscribers
/// are only woken when the list actually differs from the one they hold.
#[derive(Debug)]
pub struct NotificationFeed {
    sender: watch::Sender<FeedSnapshot>,
    // Serializes read-then-send so an older read never lands after a newer one.
    refresh_lock: Mutex<()>,
    limit: i64,
}

/// A live view of the feed. Each item is a full replacement list, newest first.
/// Dropping the subscription (or calling [`FeedSubscription::unsubscribe`]) ends it.
#[derive(Debug)]
pub struct FeedSubscription {
    receiver: watch::Receiver<FeedSnapshot>,
}

impl NotificationFeed {
    pub fn new(limit: i64) -> Self {
        let (sender, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            sender,
            refresh_lock: Mutex::new(()),
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn subscribe(&self) -> FeedSubscription {
        FeedSubscription {
            receiver: self.sender.subscribe(),
        }
    }

    /// Subscribe and return the snapshot the subscription starts from. Later calls to
    /// `next` only yield lists published after it.
    pub async fn open<R: NotificationRepository>(&self, repo: &R) -> Result<(FeedSubscription, FeedSnapshot), AppError> {
        let mut subscription = self.subscribe();
        self.refresh(repo).await?;
        let initial = subscription.current();
        Ok((subscription, initial))
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        self.sender.borrow().clone()
    }

    /// Store a notification, then push the refreshed list to subscribers.
    ///
    /// A failed refresh is logged and swallowed: the write itself succeeded.
    pub async fn publish<R: NotificationRepository>(&self, repo: &R, notification: &NewNotification) -> Result<Notification, AppError> {
        let created = repo.create_notification(notification).await?;

        if let Err(err) = self.refresh(repo).await {
            warn!(error = ?err, notification_id = %created.id, "failed to refresh notification feed");
        }

        Ok(created)
    }

    pub async fn refresh<R: NotificationRepository>(&self, repo: &R) -> Result<FeedSnapshot, AppError> {
        let _guard = self.refresh_lock.lock().await;
        let recent = Arc::new(repo.list_recent_notifications(self.limit).await?);

        let changed = self.sender.send_if_modified(|current| {
            if current.as_slice() == recent.as_slice() {
                false
            } else {
                *current = recent.clone();
                true
            }
        });

        debug!(
            entries = recent.len(),
            changed,
            subscribers = self.subscriber_count(),
            "notification feed refreshed"
        );
        Ok(recent)
    }
}

impl FeedSubscription {
    /// The latest snapshot, marking it as seen.
    pub fn current(&mut self) -> FeedSnapshot {
        self.receiver.borrow_and_update().clone()
    }

    /// Wait for the next snapshot. Returns `None` once the feed is gone.
    pub async fn next(&mut self) -> Option<FeedSnapshot> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    pub fn unsubscribe(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notification::NotificationKind;
    use crate::test_utils::{InMemoryRepository, teacher};
    use chrono::{Duration, Utc};
    use std::time::Duration as StdDuration;

    fn cancellation(message: &str, minutes_ago: i64) -> NewNotification {
        let teacher = teacher();
        NewNotification {
            kind: NotificationKind::ClassCancelled,
            message: message.to_string(),
            session_id: None,
            class_id: None,
            course_name: None,
            activity_suggestions: None,
            teacher_id: teacher.id,
            teacher_name: teacher.name,
            timestamp: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[rocket::async_test]
    async fn subscriber_receives_snapshot_after_publish() {
        let repo = InMemoryRepository::default();
        let feed = NotificationFeed::new(10);
        let mut subscription = feed.subscribe();

        feed.publish(&repo, &cancellation("Class cancelled by Grace", 0)).await.unwrap();

        let snapshot = tokio::time::timeout(StdDuration::from_secs(1), subscription.next())
            .await
            .expect("snapshot within one tick")
            .expect("feed still open");
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].message, "Class cancelled by Grace");
    }

    #[rocket::async_test]
    async fn snapshot_is_newest_first_and_capped() {
        let repo = InMemoryRepository::default();
        let feed = NotificationFeed::new(2);

        feed.publish(&repo, &cancellation("oldest", 30)).await.unwrap();
        feed.publish(&repo, &cancellation("newest", 1)).await.unwrap();
        feed.publish(&repo, &cancellation("middle", 10)).await.unwrap();

        let snapshot = feed.snapshot();
        let messages: Vec<&str> = snapshot.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["newest", "middle"]);
    }

    #[rocket::async_test]
    async fn unsubscribe_releases_receiver() {
        let feed = NotificationFeed::new(10);
        let subscription = feed.subscribe();
        assert_eq!(feed.subscriber_count(), 1);
        subscription.unsubscribe();
        assert_eq!(feed.subscriber_count(), 0);
    }

    #[rocket::async_test]
    async fn next_ends_when_feed_is_dropped() {
        let feed = NotificationFeed::new(10);
        let mut subscription = feed.subscribe();
        drop(feed);
        assert!(subscription.next().await.is_none());
    }

    #[rocket::async_test]
    async fn failed_write_does_not_touch_snapshot() {
        let repo = InMemoryRepository::default();
        repo.fail_notification_writes();
        let feed = NotificationFeed::new(10);
        let mut subscription = feed.subscribe();

        assert!(feed.publish(&repo, &cancellation("lost", 0)).await.is_err());
        assert!(subscription.current().is_empty());
    }

    #[rocket::async_test]
    async fn overlapping_publishes_leave_the_newest_list() {
        let repo = InMemoryRepository::default();
        repo.delay_next_notification_read(StdDuration::from_millis(100));
        let feed = NotificationFeed::new(10);

        let cancellation_a = cancellation("A", 0);
        let cancellation_b = cancellation("B", 0);
        let (first, second) = tokio::join!(
            feed.publish(&repo, &cancellation_a),
            feed.publish(&repo, &cancellation_b)
        );
        first.unwrap();
        second.unwrap();

        assert_eq!(repo.notifications().len(), 2);
        assert_eq!(feed.snapshot().len(), 2);
    }

    #[rocket::async_test]
    async fn unchanged_refresh_does_not_wake_subscribers() {
        let repo = InMemoryRepository::default();
        let feed = NotificationFeed::new(10);
        let mut subscription = feed.subscribe();

        feed.publish(&repo, &cancellation("Class cancelled by Grace", 0)).await.unwrap();
        assert_eq!(subscription.current().len(), 1);

        let snapshot = feed.refresh(&repo).await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert!(tokio::time::timeout(StdDuration::from_millis(50), subscription.next()).await.is_err());
    }

    #[rocket::async_test]
    async fn opened_stream_starts_from_what_it_has_seen() {
        let repo = InMemoryRepository::default();
        repo.create_notification(&cancellation("written elsewhere", 5)).await.unwrap();
        let feed = NotificationFeed::new(10);

        let (mut subscription, initial) = feed.open(&repo).await.unwrap();
        assert_eq!(initial.len(), 1);
        assert_eq!(initial.as_slice(), feed.snapshot().as_slice());
        assert!(tokio::time::timeout(StdDuration::from_millis(50), subscription.next()).await.is_err());

        feed.publish(&repo, &cancellation("Class cancelled by Grace", 0)).await.unwrap();
        let next = tokio::time::timeout(StdDuration::from_secs(1), subscription.next()).await.unwrap().unwrap();
        assert_eq!(next.len(), 2);
    }
}
