use crate::auth::CurrentUser;
use crate::database::class_session::ClassRepository;
use crate::database::notification::NotificationRepository;
use crate::error::app_error::AppError;
use crate::models::class_session::{ClassRequest, ClassSession, ClassStatus, CurricularSuggestion, NewCurricularSuggestion};
use crate::models::notification::{NewNotification, Notification, NotificationKind};
use crate::models::user::Role;
use crate::service::notification_feed::NotificationFeed;
use chrono::{NaiveDate, Utc};
use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

pub const MISSING_CANCELLATION_DETAILS: &str = "Please select a class and provide activity suggestions";

#[derive(Debug)]
pub struct CancelledClass {
    pub class: ClassSession,
    pub suggestion: CurricularSuggestion,
    pub notification: Notification,
}

pub struct ClassManager<'a, R> {
    pub repo: &'a R,
    pub feed: &'a NotificationFeed,
}

impl<'a, R> ClassManager<'a, R>
where
    R: ClassRepository + NotificationRepository,
{
    pub async fn list_upcoming(&self, teacher: &CurrentUser, today: NaiveDate) -> Result<Vec<ClassSession>, AppError> {
        teacher.require_role(Role::Teacher, "Only teachers manage classes")?;
        self.repo.list_upcoming_classes(&teacher.id, today).await
    }

    pub async fn create_class(&self, teacher: &CurrentUser, request: &ClassRequest) -> Result<ClassSession, AppError> {
        teacher.require_role(Role::Teacher, "Only teachers manage classes")?;
        request.validate()?;
        self.repo.create_class(&teacher.id, request).await
    }

    /// Cancel a scheduled class and tell students what to do instead.
    ///
    /// Three independent writes in order: class status, curricular suggestion,
    /// notification. A failure stops the sequence without undoing earlier writes.
    pub async fn cancel_class(&self, teacher: &CurrentUser, class_id: Option<Uuid>, activity_suggestions: &str) -> Result<CancelledClass, AppError> {
        teacher.require_role(Role::Teacher, "Only teachers manage classes")?;

        let suggestions = activity_suggestions.trim();
        let class_id = match class_id {
            Some(id) if !suggestions.is_empty() => id,
            _ => return Err(AppError::BadRequest(MISSING_CANCELLATION_DETAILS.to_string())),
        };

        let class = self
            .repo
            .get_class_by_id(&class_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Class not found".to_string()))?;

        if class.teacher_id != teacher.id {
            return Err(AppError::forbidden("Class belongs to another teacher"));
        }
        if class.status != ClassStatus::Scheduled {
            return Err(not_cancellable());
        }

        // The status check above can race another cancel; the conditional update decides.
        let now = Utc::now();
        let class = self
            .repo
            .mark_class_cancelled(&class_id, &teacher.id, now)
            .await?
            .ok_or_else(not_cancellable)?;

        let suggestion = self
            .repo
            .create_curricular_suggestion(&NewCurricularSuggestion {
                class_id,
                course_name: class.course_name.clone(),
                course_code: class.course_code.clone(),
                suggestions: suggestions.to_string(),
                teacher_id: teacher.id,
                teacher_name: teacher.name.clone(),
                created_at: now,
            })
            .await
            .inspect_err(|err| error!(class_id = %class_id, error = ?err, "class cancelled but curricular suggestion was not saved"))?;

        let notification = self
            .feed
            .publish(
                self.repo,
                &NewNotification {
                    kind: NotificationKind::ClassCancelled,
                    message: cancellation_message(&class),
                    session_id: None,
                    class_id: Some(class_id),
                    course_name: Some(class.course_name.clone()),
                    activity_suggestions: Some(suggestions.to_string()),
                    teacher_id: teacher.id,
                    teacher_name: teacher.name.clone(),
                    timestamp: now,
                },
            )
            .await
            .inspect_err(|err| error!(class_id = %class_id, error = ?err, "class cancelled but students were not notified"))?;

        info!(teacher_id = %teacher.id, class_id = %class_id, "class cancelled");
        Ok(CancelledClass {
            class,
            suggestion,
            notification,
        })
    }
}

fn not_cancellable() -> AppError {
    AppError::BadRequest("Only scheduled classes can be cancelled".to_string())
}

pub fn cancellation_message(class: &ClassSession) -> String {
    format!(
        "{} class scheduled for {} on {} has been cancelled",
        class.course_name,
        class.time,
        class.date.format("%Y-%m-%d")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{InMemoryRepository, student, teacher};

    fn scheduled_class(repo: &InMemoryRepository, teacher_id: Uuid) -> ClassSession {
        repo.add_class(ClassSession {
            id: Uuid::new_v4(),
            course_name: "Mathematics 201".to_string(),
            course_code: "MATH201".to_string(),
            teacher_id,
            date: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
            time: "10:00".to_string(),
            room: "B12".to_string(),
            ..ClassSession::default()
        })
    }

    #[rocket::async_test]
    async fn cancel_requires_class_and_suggestions() {
        let repo = InMemoryRepository::default();
        let feed = NotificationFeed::new(10);
        let manager = ClassManager { repo: &repo, feed: &feed };
        let teacher = teacher();
        let class = scheduled_class(&repo, teacher.id);

        for (class_id, suggestions) in [(None, "Read chapter 4"), (Some(class.id), "   ")] {
            let err = manager.cancel_class(&teacher, class_id, suggestions).await.unwrap_err();
            assert!(matches!(err, AppError::BadRequest(ref msg) if msg == MISSING_CANCELLATION_DETAILS));
        }
        assert!(repo.notifications().is_empty());
    }

    #[rocket::async_test]
    async fn cancel_updates_class_saves_suggestion_and_notifies() {
        let repo = InMemoryRepository::default();
        let feed = NotificationFeed::new(10);
        let manager = ClassManager { repo: &repo, feed: &feed };
        let teacher = teacher();
        let class = scheduled_class(&repo, teacher.id);

        let cancelled = manager.cancel_class(&teacher, Some(class.id), "  Read chapter 4  ").await.unwrap();

        assert_eq!(cancelled.class.status, ClassStatus::Cancelled);
        assert_eq!(cancelled.class.cancelled_by, Some(teacher.id));
        assert!(cancelled.class.cancelled_at.is_some());
        assert_eq!(cancelled.suggestion.suggestions, "Read chapter 4");
        assert_eq!(
            cancelled.notification.message,
            "Mathematics 201 class scheduled for 10:00 on 2026-10-16 has been cancelled"
        );
        assert_eq!(cancelled.notification.activity_suggestions.as_deref(), Some("Read chapter 4"));
        assert_eq!(cancelled.notification.class_id, Some(class.id));
        assert!(!cancelled.notification.read);
        assert_eq!(feed.snapshot().len(), 1);
    }

    #[rocket::async_test]
    async fn failed_suggestion_write_leaves_class_cancelled_without_notification() {
        let repo = InMemoryRepository::default();
        repo.fail_suggestion_writes();
        let feed = NotificationFeed::new(10);
        let manager = ClassManager { repo: &repo, feed: &feed };
        let teacher = teacher();
        let class = scheduled_class(&repo, teacher.id);

        assert!(manager.cancel_class(&teacher, Some(class.id), "Read chapter 4").await.is_err());

        let stored = repo.class(&class.id).unwrap();
        assert_eq!(stored.status, ClassStatus::Cancelled);
        assert!(repo.notifications().is_empty());
    }

    #[rocket::async_test]
    async fn cannot_cancel_another_teachers_class_or_twice() {
        let repo = InMemoryRepository::default();
        let feed = NotificationFeed::new(10);
        let manager = ClassManager { repo: &repo, feed: &feed };
        let owner = teacher();
        let class = scheduled_class(&repo, owner.id);

        let mut other = teacher();
        other.id = Uuid::new_v4();
        assert!(matches!(
            manager.cancel_class(&other, Some(class.id), "Read").await.unwrap_err(),
            AppError::Forbidden(_)
        ));

        manager.cancel_class(&owner, Some(class.id), "Read").await.unwrap();
        assert!(matches!(
            manager.cancel_class(&owner, Some(class.id), "Read").await.unwrap_err(),
            AppError::BadRequest(_)
        ));
    }

    #[rocket::async_test]
    async fn upcoming_excludes_past_and_completed_classes() {
        let repo = InMemoryRepository::default();
        let feed = NotificationFeed::new(10);
        let manager = ClassManager { repo: &repo, feed: &feed };
        let teacher = teacher();
        let today = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();

        let upcoming = scheduled_class(&repo, teacher.id);
        repo.add_class(ClassSession {
            id: Uuid::new_v4(),
            teacher_id: teacher.id,
            date: today.pred_opt().unwrap(),
            ..ClassSession::default()
        });
        repo.add_class(ClassSession {
            id: Uuid::new_v4(),
            teacher_id: teacher.id,
            date: today,
            status: ClassStatus::Completed,
            ..ClassSession::default()
        });

        let classes = manager.list_upcoming(&teacher, today).await.unwrap();
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].id, upcoming.id);
    }

    #[rocket::async_test]
    async fn students_cannot_manage_classes() {
        let repo = InMemoryRepository::default();
        let feed = NotificationFeed::new(10);
        let manager = ClassManager { repo: &repo, feed: &feed };
        let today = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
        assert!(matches!(manager.list_upcoming(&student(), today).await.unwrap_err(), AppError::Forbidden(_)));
    }

    #[rocket::async_test]
    async fn concurrent_cancels_notify_once() {
        let repo = InMemoryRepository::default();
        let feed = NotificationFeed::new(10);
        let manager = ClassManager { repo: &repo, feed: &feed };
        let teacher = teacher();
        let class = scheduled_class(&repo, teacher.id);

        let (first, second) = tokio::join!(
            manager.cancel_class(&teacher, Some(class.id), "Read chapter 4"),
            manager.cancel_class(&teacher, Some(class.id), "Read chapter 5")
        );

        assert_eq!([first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count(), 1);
        assert!(matches!(first.err().or(second.err()), Some(AppError::BadRequest(_))));
        assert_eq!(repo.notifications().len(), 1);
    }

    #[rocket::async_test]
    async fn store_refuses_to_cancel_a_class_twice() {
        let repo = InMemoryRepository::default();
        let class = scheduled_class(&repo, teacher().id);

        assert!(repo.mark_class_cancelled(&class.id, &teacher().id, Utc::now()).await.unwrap().is_some());
        assert!(repo.mark_class_cancelled(&class.id, &teacher().id, Utc::now()).await.unwrap().is_none());
    }
}
