//! Notification sinks for issued-code events

mod log_sink;

pub use log_sink::LogNotificationSink;
