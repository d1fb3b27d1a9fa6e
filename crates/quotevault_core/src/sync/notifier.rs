//! Sync outcome notification.
//!
//! Notifiers are fire-and-forget observers; they must not panic and their
//! outcome never feeds back into the sync cycle.

use log::info;

/// Message sent after a successful merge.
pub const SYNC_SUCCESS_MESSAGE: &str = "Quotes synced with server!";

/// Observer for sync outcomes.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Writes notifications to the core log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        info!("event=sync_notify module=sync message={message}");
    }
}

/// Adapts a closure into a `Notifier`.
pub struct FnNotifier<F>(pub F)
where
    F: Fn(&str) + Send + Sync;

impl<F> Notifier for FnNotifier<F>
where
    F: Fn(&str) + Send + Sync,
{
    fn notify(&self, message: &str) {
        (self.0)(message)
    }
}

/// Builds the failure message for a skipped tick.
pub fn failure_message(reason: &dyn std::fmt::Display) -> String {
    format!("Failed to sync with server: {reason}")
}

#[cfg(test)]
mod tests {
    use super::{failure_message, FnNotifier, Notifier};
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn fn_notifier_forwards_messages() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let notifier = FnNotifier(move |message: &str| sink.lock().push(message.to_string()));

        notifier.notify("hello");
        assert_eq!(seen.lock().as_slice(), ["hello".to_string()]);
    }

    #[test]
    fn failure_message_includes_reason() {
        assert_eq!(
            failure_message(&"timeout"),
            "Failed to sync with server: timeout"
        );
    }
}
