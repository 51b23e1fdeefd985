use crate::prelude::*;

/// Receives one human-readable message per surfaced failure. Fire-and-forget;
/// implementations must not block.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, message: &str);
}

/// Default sink: failures go to the log.
#[derive(Debug, Default)]
pub struct LogNotificationSink;

impl NotificationSink for LogNotificationSink {
    fn notify(&self, message: &str) {
        error!("{message}");
    }
}
