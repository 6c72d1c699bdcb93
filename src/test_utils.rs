use crate::auth::CurrentUser;
use crate::database::attendance::AttendanceRepository;
use crate::database::class_session::ClassRepository;
use crate::database::course::CourseRepository;
use crate::database::notification::NotificationRepository;
use crate::database::schedule::ScheduleRepository;
use crate::error::app_error::AppError;
use crate::models::attendance::{AttendanceRecord, NewAttendanceRecord};
use crate::models::class_session::{ClassRequest, ClassSession, ClassStatus, CurricularSuggestion, NewCurricularSuggestion};
use crate::models::course::{Course, CourseRequest};
use crate::models::notification::{NewNotification, Notification};
use crate::models::schedule::ScheduleItem;
use crate::models::user::Role;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use uuid::Uuid;

pub fn teacher() -> CurrentUser {
    CurrentUser {
        id: Uuid::from_u128(0x7ea0),
        name: "Grace Hopper".to_string(),
        email: "grace@example.com".to_string(),
        role: Role::Teacher,
    }
}

pub fn student() -> CurrentUser {
    CurrentUser {
        id: Uuid::from_u128(0x57d0),
        name: "Sam Student".to_string(),
        email: "sam@example.com".to_string(),
        role: Role::Student,
    }
}

fn simulated_failure() -> AppError {
    AppError::db("simulated store failure", sqlx::Error::PoolTimedOut)
}

/// Store double for service tests. Writes can be made to fail per collection to
/// exercise partial-failure paths.
#[derive(Default)]
pub struct InMemoryRepository {
    attendance: Mutex<Vec<AttendanceRecord>>,
    notifications: Mutex<Vec<Notification>>,
    courses: Mutex<Vec<Course>>,
    classes: Mutex<Vec<ClassSession>>,
    suggestions: Mutex<Vec<CurricularSuggestion>>,
    schedule: Mutex<Vec<ScheduleItem>>,
    fail_notifications: AtomicBool,
    fail_suggestions: AtomicBool,
    notification_read_delay: Mutex<Option<Duration>>,
}

impl InMemoryRepository {
    pub fn fail_notification_writes(&self) {
        self.fail_notifications.store(true, Ordering::SeqCst);
    }

    pub fn fail_suggestion_writes(&self) {
        self.fail_suggestions.store(true, Ordering::SeqCst);
    }

    /// Stall the next notification listing after it has read the store.
    pub fn delay_next_notification_read(&self, delay: Duration) {
        *self.notification_read_delay.lock().unwrap() = Some(delay);
    }

    pub fn attendance(&self) -> Vec<AttendanceRecord> {
        self.attendance.lock().unwrap().clone()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn class(&self, id: &Uuid) -> Option<ClassSession> {
        self.classes.lock().unwrap().iter().find(|c| c.id == *id).cloned()
    }

    pub fn add_course(&self, name: &str, code: &str) -> Course {
        let course = Course {
            id: Uuid::new_v4(),
            name: name.to_string(),
            code: code.to_string(),
            instructor: "Staff".to_string(),
            created_at: Utc::now(),
            ..Course::default()
        };
        self.courses.lock().unwrap().push(course.clone());
        course
    }

    pub fn add_class(&self, class: ClassSession) -> ClassSession {
        self.classes.lock().unwrap().push(class.clone());
        class
    }

    pub fn add_schedule(&self, student_id: Uuid, day_of_week: &str, time: &str, course_name: &str) {
        self.schedule.lock().unwrap().push(ScheduleItem {
            id: Uuid::new_v4(),
            student_id,
            course_name: course_name.to_string(),
            course_code: String::new(),
            day_of_week: day_of_week.to_string(),
            time: time.to_string(),
            room: String::new(),
            instructor: String::new(),
        });
    }
}

#[async_trait::async_trait]
impl AttendanceRepository for InMemoryRepository {
    async fn create_attendance(&self, record: &NewAttendanceRecord) -> Result<AttendanceRecord, AppError> {
        let created = AttendanceRecord {
            id: Uuid::new_v4(),
            student_id: record.student_id,
            student_name: record.student_name.clone(),
            student_email: record.student_email.clone(),
            session_id: record.session_id.clone(),
            course_id: record.course_id,
            course_name: record.course_name.clone(),
            teacher_id: record.teacher_id,
            teacher_name: record.teacher_name.clone(),
            timestamp: record.timestamp,
            date: record.date,
            source: record.source,
        };
        self.attendance.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn list_attendance_for_session(&self, session_id: &str) -> Result<Vec<AttendanceRecord>, AppError> {
        let mut records: Vec<_> = self.attendance().into_iter().filter(|r| r.session_id == session_id).collect();
        records.sort_by_key(|r| r.timestamp);
        Ok(records)
    }

    async fn list_attendance_for_student(&self, student_id: &Uuid) -> Result<Vec<AttendanceRecord>, AppError> {
        let mut records: Vec<_> = self.attendance().into_iter().filter(|r| r.student_id == *student_id).collect();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(records)
    }
}

#[async_trait::async_trait]
impl NotificationRepository for InMemoryRepository {
    async fn create_notification(&self, notification: &NewNotification) -> Result<Notification, AppError> {
        if self.fail_notifications.load(Ordering::SeqCst) {
            return Err(simulated_failure());
        }

        let created = Notification {
            id: Uuid::new_v4(),
            kind: notification.kind,
            message: notification.message.clone(),
            session_id: notification.session_id.clone(),
            class_id: notification.class_id,
            course_name: notification.course_name.clone(),
            activity_suggestions: notification.activity_suggestions.clone(),
            teacher_id: notification.teacher_id,
            teacher_name: notification.teacher_name.clone(),
            timestamp: notification.timestamp,
            read: false,
        };
        self.notifications.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn list_recent_notifications(&self, limit: i64) -> Result<Vec<Notification>, AppError> {
        let mut notifications = self.notifications();
        notifications.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        notifications.truncate(limit.max(0) as usize);

        let delay = self.notification_read_delay.lock().unwrap().take();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(notifications)
    }
}

#[async_trait::async_trait]
impl CourseRepository for InMemoryRepository {
    async fn create_course(&self, request: &CourseRequest) -> Result<Course, AppError> {
        let course = Course {
            id: Uuid::new_v4(),
            name: request.name.clone(),
            code: request.code.clone(),
            instructor: request.instructor.clone(),
            schedule: request.schedule.clone(),
            credits: request.credits,
            created_at: Utc::now(),
        };
        self.courses.lock().unwrap().push(course.clone());
        Ok(course)
    }

    async fn get_course_by_id(&self, id: &Uuid) -> Result<Option<Course>, AppError> {
        Ok(self.courses.lock().unwrap().iter().find(|c| c.id == *id).cloned())
    }

    async fn list_courses(&self) -> Result<Vec<Course>, AppError> {
        let mut courses = self.courses.lock().unwrap().clone();
        courses.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(courses)
    }
}

#[async_trait::async_trait]
impl ClassRepository for InMemoryRepository {
    async fn create_class(&self, teacher_id: &Uuid, request: &ClassRequest) -> Result<ClassSession, AppError> {
        Ok(self.add_class(ClassSession {
            id: Uuid::new_v4(),
            course_id: request.course_id,
            course_name: request.course_name.clone(),
            course_code: request.course_code.clone(),
            teacher_id: *teacher_id,
            date: request.date,
            time: request.time.clone(),
            room: request.room.clone(),
            ..ClassSession::default()
        }))
    }

    async fn get_class_by_id(&self, id: &Uuid) -> Result<Option<ClassSession>, AppError> {
        Ok(self.class(id))
    }

    async fn list_upcoming_classes(&self, teacher_id: &Uuid, from: NaiveDate) -> Result<Vec<ClassSession>, AppError> {
        let mut classes: Vec<_> = self
            .classes
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.teacher_id == *teacher_id && c.date >= from && c.status != ClassStatus::Completed)
            .cloned()
            .collect();
        classes.sort_by(|a, b| (a.date, &a.time).cmp(&(b.date, &b.time)));
        Ok(classes)
    }

    async fn mark_class_cancelled(&self, id: &Uuid, cancelled_by: &Uuid, cancelled_at: DateTime<Utc>) -> Result<Option<ClassSession>, AppError> {
        let mut classes = self.classes.lock().unwrap();
        let Some(class) = classes.iter_mut().find(|c| c.id == *id && c.status == ClassStatus::Scheduled) else {
            return Ok(None);
        };
        class.status = ClassStatus::Cancelled;
        class.cancelled_at = Some(cancelled_at);
        class.cancelled_by = Some(*cancelled_by);
        Ok(Some(class.clone()))
    }

    async fn create_curricular_suggestion(&self, suggestion: &NewCurricularSuggestion) -> Result<CurricularSuggestion, AppError> {
        if self.fail_suggestions.load(Ordering::SeqCst) {
            return Err(simulated_failure());
        }

        let created = CurricularSuggestion {
            id: Uuid::new_v4(),
            class_id: suggestion.class_id,
            course_name: suggestion.course_name.clone(),
            course_code: suggestion.course_code.clone(),
            suggestions: suggestion.suggestions.clone(),
            teacher_id: suggestion.teacher_id,
            teacher_name: suggestion.teacher_name.clone(),
            created_at: suggestion.created_at,
        };
        self.suggestions.lock().unwrap().push(created.clone());
        Ok(created)
    }
}

#[async_trait::async_trait]
impl ScheduleRepository for InMemoryRepository {
    async fn list_schedule_for_day(&self, student_id: &Uuid, day_of_week: &str) -> Result<Vec<ScheduleItem>, AppError> {
        let mut items: Vec<_> = self
            .schedule
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.student_id == *student_id && i.day_of_week == day_of_week)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.time.cmp(&b.time));
        Ok(items)
    }
}
