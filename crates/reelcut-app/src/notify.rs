//! User-facing notifications.
//!
//! Components never talk to a global toaster; they get a
//! [`NotificationSink`] injected and fire toasts at it.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{info, warn};

/// Visual weight of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastVariant {
    #[default]
    Default,
    Destructive,
}

/// A short message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
}

impl Toast {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: ToastVariant::Default,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            variant: ToastVariant::Destructive,
            ..Self::new(title, description)
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.variant == ToastVariant::Destructive
    }
}

/// Fire-and-forget receiver of toasts.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, toast: Toast);
}

/// Writes toasts to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, toast: Toast) {
        if toast.is_destructive() {
            warn!(title = %toast.title, "{}", toast.description);
        } else {
            info!(title = %toast.title, "{}", toast.description);
        }
    }
}

/// Keeps every toast it receives, for tests and command summaries.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    toasts: Arc<Mutex<Vec<Toast>>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything received so far, oldest first.
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().clone()
    }

    /// Titles received so far, oldest first.
    pub fn titles(&self) -> Vec<String> {
        self.toasts.lock().iter().map(|t| t.title.clone()).collect()
    }

    pub fn clear(&self) {
        self.toasts.lock().clear();
    }
}

impl NotificationSink for CollectingSink {
    fn notify(&self, toast: Toast) {
        self.toasts.lock().push(toast);
    }
}
