pub mod attendance_session;
pub mod attendance_stats;
pub mod auth;
pub mod check_in;
pub mod class_management;
pub mod notification_feed;
pub mod qr_codec;
pub mod schedule;
