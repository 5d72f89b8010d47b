use std::sync::Arc;

use chrono::{DateTime, Local};
use log::{info, warn};
use tokio::sync::mpsc;

use crate::i18n::{self, Language};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Destructive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    ConnectionError,
    ValidationError,
    SearchError,
    ReloadError,
    NoResults,
    IndexReloaded,
}

impl NotificationKind {
    pub fn severity(self) -> Severity {
        match self {
            Self::NoResults | Self::IndexReloaded => Severity::Info,
            _ => Severity::Destructive,
        }
    }

    fn title_key(self) -> &'static str {
        match self {
            Self::ConnectionError => "notify_connection_title",
            Self::ValidationError => "notify_empty_query_title",
            Self::SearchError => "notify_search_error_title",
            Self::ReloadError => "notify_reload_error_title",
            Self::NoResults => "notify_no_results_title",
            Self::IndexReloaded => "notify_reloaded_title",
        }
    }

    fn message_key(self) -> &'static str {
        match self {
            Self::ConnectionError => "notify_connection_message",
            Self::ValidationError => "notify_empty_query_message",
            Self::SearchError => "notify_search_error_message",
            Self::ReloadError => "notify_reload_error_message",
            Self::NoResults => "notify_no_results_message",
            Self::IndexReloaded => "notify_reloaded_message",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub at: DateTime<Local>,
}

/// Receives user-facing status events. Implementations must not block.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

pub type NotificationReceiver = mpsc::UnboundedReceiver<Notification>;

pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Notification>,
}

impl NotificationSink for ChannelSink {
    fn notify(&self, notification: Notification) {
        // receiver gone means the front end shut down
        let _ = self.tx.send(notification);
    }
}

pub fn channel() -> (ChannelSink, NotificationReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelSink { tx }, rx)
}

/// Forwards notifications to the log facade, used by one-shot commands.
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Info => info!("{}: {}", notification.title, notification.message),
            Severity::Destructive => warn!("{}: {}", notification.title, notification.message),
        }
    }
}

/// Builds localized notifications and hands them to a sink.
#[derive(Clone)]
pub struct Notifier {
    sink: Arc<dyn NotificationSink>,
    locale: Language,
}

impl Notifier {
    pub fn new(sink: Arc<dyn NotificationSink>, locale: Language) -> Self {
        Self { sink, locale }
    }

    pub fn locale(&self) -> Language {
        self.locale
    }

    pub fn emit(&self, kind: NotificationKind) {
        self.emit_with(kind, &[]);
    }

    pub fn emit_with(&self, kind: NotificationKind, vars: &[(&str, &str)]) {
        let message = i18n::t(self.locale, kind.message_key(), vars);
        self.emit_message(kind, message);
    }

    pub fn emit_message(&self, kind: NotificationKind, message: String) {
        self.sink.notify(Notification {
            kind,
            title: i18n::ts(self.locale, kind.title_key()),
            message,
            severity: kind.severity(),
            at: Local::now(),
        });
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct RecordingSink {
        seen: Mutex<Vec<Notification>>,
    }

    impl RecordingSink {
        pub fn all(&self) -> Vec<Notification> {
            self.seen.lock().unwrap().clone()
        }

        pub fn kinds(&self) -> Vec<NotificationKind> {
            self.all().into_iter().map(|n| n.kind).collect()
        }

        pub fn count(&self, kind: NotificationKind) -> usize {
            self.kinds().into_iter().filter(|k| *k == kind).count()
        }
    }

    impl NotificationSink for RecordingSink {
        fn notify(&self, notification: Notification) {
            self.seen.lock().unwrap().push(notification);
        }
    }

    pub fn recording() -> (Arc<RecordingSink>, Notifier) {
        let sink = Arc::new(RecordingSink::default());
        let notifier = Notifier::new(sink.clone(), Language::En);
        (sink, notifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_by_kind() {
        assert_eq!(NotificationKind::NoResults.severity(), Severity::Info);
        assert_eq!(NotificationKind::IndexReloaded.severity(), Severity::Info);
        assert_eq!(NotificationKind::SearchError.severity(), Severity::Destructive);
        assert_eq!(NotificationKind::ValidationError.severity(), Severity::Destructive);
    }

    #[test]
    fn test_notifier_builds_localized_text() {
        let (sink, notifier) = testing::recording();
        notifier.emit(NotificationKind::ConnectionError);
        notifier.emit_with(NotificationKind::IndexReloaded, &[("seconds", "1.50")]);

        let seen = sink.all();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].title, "Connection Error");
        assert_eq!(seen[0].message, "Failed to connect to API");
        assert_eq!(seen[1].message, "Completed in 1.50s");
        assert_eq!(seen[1].severity, Severity::Info);
    }

    #[tokio::test]
    async fn test_channel_sink_delivers() {
        let (sink, mut rx) = channel();
        let notifier = Notifier::new(Arc::new(sink), Language::Tr);
        notifier.emit(NotificationKind::SearchError);

        let received = rx.recv().await.unwrap();
        assert_eq!(received.kind, NotificationKind::SearchError);
        assert_eq!(received.title, "Arama Hatasi");
    }

    #[test]
    fn test_channel_sink_survives_closed_receiver() {
        let (sink, rx) = channel();
        drop(rx);
        sink.notify(Notification {
            kind: NotificationKind::NoResults,
            title: String::new(),
            message: String::new(),
            severity: Severity::Info,
            at: Local::now(),
        });
    }
}
