pub mod attendance;
pub mod attendance_session;
pub mod class;
pub mod course;
pub mod error;
pub mod health;
pub mod notification;
pub mod schedule;
pub mod user;
