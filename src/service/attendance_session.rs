use crate::auth::CurrentUser;
use crate::database::course::CourseRepository;
use crate::database::notification::NotificationRepository;
use crate::error::app_error::AppError;
use crate::models::attendance_session::{ActiveSession, QrPayload, Session, SessionView, StartSessionRequest};
use crate::models::notification::{NewNotification, Notification, NotificationKind};
use crate::models::user::Role;
use crate::service::notification_feed::NotificationFeed;
use crate::service::qr_codec::QrCodec;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

const SESSION_SUFFIX_LEN: usize = 9;

/// Per-teacher attendance state: `idle` until a session starts, `active` while its QR
/// code is on screen, back to `idle` once cancelled. Lost on restart.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    active: Mutex<HashMap<Uuid, ActiveSession>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `session` the teacher's active one, returning whatever it replaced.
    pub async fn activate(&self, teacher_id: Uuid, session: ActiveSession) -> Option<ActiveSession> {
        self.active.lock().await.insert(teacher_id, session)
    }

    pub async fn view(&self, teacher_id: &Uuid) -> SessionView {
        match self.active.lock().await.get(teacher_id) {
            Some(active) => SessionView::Active(active.clone()),
            None => SessionView::Idle,
        }
    }

    /// Drop the teacher's active session if it is `session_id`.
    pub async fn deactivate(&self, teacher_id: &Uuid, session_id: &str) -> Option<ActiveSession> {
        let mut active = self.active.lock().await;
        match active.get(teacher_id) {
            Some(current) if current.session.id == session_id => active.remove(teacher_id),
            _ => None,
        }
    }
}

/// Timestamp plus random suffix: unlikely to collide, not unique by construction.
pub fn generate_session_id(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("session_{}_{}", now.timestamp_millis(), &suffix[..SESSION_SUFFIX_LEN])
}

pub struct SessionManager<'a, R> {
    pub repo: &'a R,
    pub registry: &'a SessionRegistry,
    pub codec: &'a QrCodec,
    pub feed: &'a NotificationFeed,
}

impl<'a, R> SessionManager<'a, R>
where
    R: CourseRepository + NotificationRepository,
{
    pub async fn start_session(&self, teacher: &CurrentUser, request: &StartSessionRequest) -> Result<ActiveSession, AppError> {
        teacher.require_role(Role::Teacher, "Only teachers can start attendance sessions")?;

        let course_name = match (&request.course_name, request.course_id) {
            (Some(name), _) => Some(name.clone()),
            (None, Some(course_id)) => self.repo.get_course_by_id(&course_id).await?.map(|course| course.name),
            (None, None) => None,
        };

        let now = Utc::now();
        let session = Session {
            id: generate_session_id(now),
            teacher_id: teacher.id,
            teacher_name: teacher.name.clone(),
            course_id: request.course_id,
            course_name,
            created_at: now,
        };

        let qr_code = self.codec.render(&QrPayload::from(&session))?;
        let active = ActiveSession { session, qr_code };

        if let Some(replaced) = self.registry.activate(teacher.id, active.clone()).await {
            warn!(
                teacher_id = %teacher.id,
                replaced_session_id = %replaced.session.id,
                "replacing active attendance session"
            );
        }

        info!(teacher_id = %teacher.id, session_id = %active.session.id, "attendance session started");
        Ok(active)
    }

    pub async fn current_session(&self, teacher: &CurrentUser) -> Result<SessionView, AppError> {
        teacher.require_role(Role::Teacher, "Only teachers have attendance sessions")?;
        Ok(self.registry.view(&teacher.id).await)
    }

    /// Announce the cancellation to students and return the teacher to `idle`.
    ///
    /// The notification is written even when the registry no longer knows the session.
    /// On a failed write the session stays active.
    pub async fn cancel_session(&self, teacher: &CurrentUser, session_id: &str) -> Result<Notification, AppError> {
        teacher.require_role(Role::Teacher, "Only teachers can cancel attendance sessions")?;

        let course_name = match self.registry.view(&teacher.id).await {
            SessionView::Active(active) if active.session.id == session_id => active.session.course_name,
            _ => None,
        };

        let notification = NewNotification {
            kind: NotificationKind::ClassCancelled,
            message: format!("Class cancelled by {}", teacher.name),
            session_id: Some(session_id.to_string()),
            class_id: None,
            course_name,
            activity_suggestions: None,
            teacher_id: teacher.id,
            teacher_name: teacher.name.clone(),
            timestamp: Utc::now(),
        };

        let created = self.feed.publish(self.repo, &notification).await?;

        if self.registry.deactivate(&teacher.id, session_id).await.is_none() {
            warn!(teacher_id = %teacher.id, session_id = %session_id, "cancelled session was not active");
        }

        info!(teacher_id = %teacher.id, session_id = %session_id, notification_id = %created.id, "attendance session cancelled");
        Ok(created)
    }
}
