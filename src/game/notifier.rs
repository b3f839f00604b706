use std::cell::RefCell;

use log::{error, info, warn};

use crate::model::Severity;

/// Sink for short user-facing messages.
pub trait Notifier {
    fn notify(&self, message: &str, severity: Severity);
}

/// Writes notifications to the log only.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Error => error!(target: "notify", "{}", message),
            Severity::Warning => warn!(target: "notify", "{}", message),
            Severity::Success | Severity::Info => info!(target: "notify", "{}", message),
        }
    }
}

/// Queues notifications until the presentation layer drains them.
#[derive(Debug, Default)]
pub struct ToastQueue {
    pending: RefCell<Vec<(String, Severity)>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<(String, Severity)> {
        self.pending.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, message: &str, severity: Severity) {
        LogNotifier.notify(message, severity);
        self.pending
            .borrow_mut()
            .push((message.to_string(), severity));
    }
}
