//! User-facing warnings raised by the registry.
//!
//! The registry never decides how a warning is shown; it hands the message to
//! a [`Notifier`] and carries on.

use std::sync::Mutex;

/// Shown when a requested project is not in the allow-list.
pub const PROJECT_NOT_ALLOWED: &str =
    "This Project URL isn't allowed to be used by this application";

/// Fire-and-forget sink for user-visible warnings.
pub trait Notifier: Send + Sync {
    fn warn(&self, message: &str);
}

/// Logs warnings through `tracing` at WARN level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }
}

/// Keeps every warning in memory, in the order received.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(messages) => messages.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Notifier for RecordingNotifier {
    fn warn(&self, message: &str) {
        match self.messages.lock() {
            Ok(mut messages) => messages.push(message.to_owned()),
            Err(poisoned) => poisoned.into_inner().push(message.to_owned()),
        }
    }
}
