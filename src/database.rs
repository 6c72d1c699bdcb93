pub mod attendance;
pub mod class_session;
pub mod course;
pub mod notification;
pub mod postgres_repository;
pub mod schedule;
pub mod session;
pub mod user;
