use tracing::warn;

/// A user-visible, transient notice (a toast in the web UI).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
}

/// Sink for user-visible notifications raised by [`super::ChatClient`].
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Default notifier: logs the notice. Front ends supply their own.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        warn!(title = %notification.title, "{}", notification.description);
    }
}
