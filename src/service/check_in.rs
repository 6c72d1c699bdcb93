use crate::auth::CurrentUser;
use crate::database::attendance::AttendanceRepository;
use crate::database::course::CourseRepository;
use crate::error::app_error::AppError;
use crate::models::attendance::{AttendanceRecord, CaptureSource, NewAttendanceRecord};
use crate::models::attendance_session::QrPayload;
use crate::models::user::Role;
use crate::service::qr_codec::QrCodec;
use chrono::Utc;
use chrono_tz::Tz;
use tracing::{info, warn};

const UNKNOWN_COURSE: &str = "Unknown Course";

/// Turns a decoded QR scan into an attendance record.
///
/// Accepts any well-formed payload: there is no check that the session is still open,
/// that the student has not already checked in, or that the payload is authentic.
pub struct CheckInHandler<'a, R> {
    pub repo: &'a R,
    pub timezone: Tz,
}

impl<'a, R> CheckInHandler<'a, R>
where
    R: AttendanceRepository + CourseRepository,
{
    pub async fn on_scan(&self, student: &CurrentUser, raw_payload: &str, source: CaptureSource) -> Result<AttendanceRecord, AppError> {
        student.require_role(Role::Student, "Only students can check in")?;

        let payload = QrCodec::decode_payload(raw_payload).inspect_err(|err| {
            warn!(student_id = %student.id, source = ?source, error = ?err, "rejected QR scan");
        })?;

        let course_name = self.resolve_course_name(&payload).await;
        let timestamp = Utc::now();

        let record = NewAttendanceRecord {
            student_id: student.id,
            student_name: student.name.clone(),
            student_email: student.email.clone(),
            session_id: payload.session_id,
            course_id: payload.course_id,
            course_name,
            teacher_id: payload.teacher_id,
            teacher_name: payload.teacher_name,
            timestamp,
            date: timestamp.with_timezone(&self.timezone).date_naive(),
            source,
        };

        let created = self.repo.create_attendance(&record).await?;
        info!(
            student_id = %created.student_id,
            session_id = %created.session_id,
            source = ?created.source,
            "attendance recorded"
        );
        Ok(created)
    }

    /// Display name only: the catalog wins, then whatever the payload claims.
    async fn resolve_course_name(&self, payload: &QrPayload) -> String {
        if let Some(course_id) = payload.course_id {
            match self.repo.get_course_by_id(&course_id).await {
                Ok(Some(course)) => return course.name,
                Ok(None) => {}
                Err(err) => warn!(course_id = %course_id, error = ?err, "course lookup failed during check-in"),
            }
        }

        payload.course_name.clone().unwrap_or_else(|| UNKNOWN_COURSE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{InMemoryRepository, student, teacher};
    use uuid::Uuid;

    fn scan_text(course_id: Option<Uuid>, course_name: Option<&str>) -> (QrPayload, String) {
        let teacher = teacher();
        let payload = QrPayload {
            session_id: "session_1760518800000_s1s1s1s1s".to_string(),
            timestamp: Utc::now(),
            teacher_id: teacher.id,
            teacher_name: teacher.name,
            course_id,
            course_name: course_name.map(str::to_string),
        };
        let text = QrCodec::encode_payload(&payload).unwrap();
        (payload, text)
    }

    fn handler(repo: &InMemoryRepository) -> CheckInHandler<'_, InMemoryRepository> {
        CheckInHandler { repo, timezone: Tz::UTC }
    }

    #[rocket::async_test]
    async fn valid_scan_writes_record() {
        let repo = InMemoryRepository::default();
        let student = student();
        let (payload, text) = scan_text(None, Some("Mathematics 201"));

        let record = handler(&repo).on_scan(&student, &text, CaptureSource::LiveFrame).await.unwrap();

        assert_eq!(record.session_id, payload.session_id);
        assert_eq!(record.student_id, student.id);
        assert_eq!(record.student_email, student.email);
        assert_eq!(record.teacher_id, payload.teacher_id);
        assert_eq!(record.course_name, "Mathematics 201");
        assert_eq!(record.date, record.timestamp.date_naive());
        assert_eq!(repo.attendance().len(), 1);
    }

    #[rocket::async_test]
    async fn malformed_scan_never_writes() {
        let repo = InMemoryRepository::default();

        for raw in ["", "hello", "{\"sessionId\": 42}", "[1,2,3]"] {
            let err = handler(&repo).on_scan(&student(), raw, CaptureSource::StillImage).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidQrCode { .. }), "{raw:?} should be rejected");
        }
        assert!(repo.attendance().is_empty());
    }

    #[rocket::async_test]
    async fn catalog_name_beats_payload_name() {
        let repo = InMemoryRepository::default();
        let course = repo.add_course("Computer Science 101", "CS101");
        let (_, text) = scan_text(Some(course.id), Some("Something Else"));

        let record = handler(&repo).on_scan(&student(), &text, CaptureSource::LiveFrame).await.unwrap();
        assert_eq!(record.course_name, "Computer Science 101");
        assert_eq!(record.course_id, Some(course.id));
    }

    #[rocket::async_test]
    async fn unknown_course_falls_back_to_payload_then_default() {
        let repo = InMemoryRepository::default();

        let (_, text) = scan_text(Some(Uuid::new_v4()), Some("Physics Lab"));
        let record = handler(&repo).on_scan(&student(), &text, CaptureSource::LiveFrame).await.unwrap();
        assert_eq!(record.course_name, "Physics Lab");

        let (_, text) = scan_text(None, None);
        let record = handler(&repo).on_scan(&student(), &text, CaptureSource::LiveFrame).await.unwrap();
        assert_eq!(record.course_name, UNKNOWN_COURSE);
    }

    #[rocket::async_test]
    async fn both_capture_paths_share_the_write_contract() {
        let repo = InMemoryRepository::default();
        let (_, text) = scan_text(None, None);

        let live = handler(&repo).on_scan(&student(), &text, CaptureSource::LiveFrame).await.unwrap();
        let still = handler(&repo).on_scan(&student(), &text, CaptureSource::StillImage).await.unwrap();

        assert_eq!(live.session_id, still.session_id);
        assert_eq!(live.source, CaptureSource::LiveFrame);
        assert_eq!(still.source, CaptureSource::StillImage);
    }

    // Current behaviour, not a guarantee: re-scanning is not deduplicated.
    #[rocket::async_test]
    async fn scanning_twice_creates_two_records() {
        let repo = InMemoryRepository::default();
        let student = student();
        let (_, text) = scan_text(None, None);

        handler(&repo).on_scan(&student, &text, CaptureSource::LiveFrame).await.unwrap();
        handler(&repo).on_scan(&student, &text, CaptureSource::LiveFrame).await.unwrap();

        let records = repo.attendance();
        assert_eq!(records.len(), 2);
        assert_ne!(records[0].id, records[1].id);
    }

    #[rocket::async_test]
    async fn teachers_cannot_check_in() {
        let repo = InMemoryRepository::default();
        let (_, text) = scan_text(None, None);
        let err = handler(&repo).on_scan(&teacher(), &text, CaptureSource::LiveFrame).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[rocket::async_test]
    async fn record_date_follows_configured_timezone() {
        let repo = InMemoryRepository::default();
        let (_, text) = scan_text(None, None);
        let handler = CheckInHandler {
            repo: &repo,
            timezone: chrono_tz::Pacific::Kiritimati,
        };

        let record = handler.on_scan(&student(), &text, CaptureSource::LiveFrame).await.unwrap();
        assert_eq!(record.date, record.timestamp.with_timezone(&chrono_tz::Pacific::Kiritimati).date_naive());
    }
}
