use crate::database::schedule::ScheduleRepository;
use crate::error::app_error::AppError;
use crate::models::schedule::{ScheduleItemResponse, ScheduleStatus};
use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, Weekday};
use uuid::Uuid;

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Classify a class that starts at `start` today. The end bound is inclusive.
/// Unparseable start times count as upcoming.
pub fn classify(start: &str, now: NaiveTime, duration: Duration) -> ScheduleStatus {
    let Ok(start) = NaiveTime::parse_from_str(start, "%H:%M") else {
        return ScheduleStatus::Upcoming;
    };

    let (end, wrapped) = start.overflowing_add_signed(duration);
    if now < start {
        ScheduleStatus::Upcoming
    } else if wrapped != 0 || now <= end {
        ScheduleStatus::Ongoing
    } else {
        ScheduleStatus::Completed
    }
}

/// The student's remaining classes today: weekday match in local time, earliest
/// first, completed classes dropped.
pub async fn todays_schedule<R: ScheduleRepository>(
    repo: &R,
    student_id: &Uuid,
    local_now: NaiveDateTime,
    class_duration: Duration,
) -> Result<Vec<ScheduleItemResponse>, AppError> {
    let day = weekday_name(local_now.weekday());
    let items = repo.list_schedule_for_day(student_id, day).await?;

    Ok(items
        .iter()
        .map(|item| ScheduleItemResponse::new(item, classify(&item.time, local_now.time(), class_duration)))
        .filter(|item| item.status != ScheduleStatus::Completed)
        .collect())
}
