pub mod attendance;
pub mod attendance_session;
pub mod class_session;
pub mod course;
pub mod health;
pub mod notification;
pub mod schedule;
pub mod session;
pub mod user;
