//! Delivery dispatcher. Sends one formatted briefing to every channel independently.
//!
//! The console channel is mandatory and is written first; external channels then run
//! concurrently, each under its own timeout. A failing channel is logged and reported,
//! never propagated.

use crate::domain::DomainError;
use crate::ports::{BriefingMessage, NotifierPort};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Outcome of one delivery round, by channel name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: Vec<&'static str>,
    pub failed: Vec<(&'static str, String)>,
}

impl DeliveryReport {
    pub fn all_delivered(&self) -> bool {
        self.failed.is_empty()
    }

    fn record(&mut self, channel: &'static str, outcome: Result<(), DomainError>) {
        match outcome {
            Ok(()) => {
                info!(channel, "briefing delivered");
                self.delivered.push(channel);
            }
            Err(e) => {
                error!(channel, error = %e, "briefing delivery failed");
                self.failed.push((channel, e.to_string()));
            }
        }
    }
}

pub struct DeliveryDispatcher {
    console: Arc<dyn NotifierPort>,
    channels: Vec<Arc<dyn NotifierPort>>,
    timeout: Duration,
}

impl DeliveryDispatcher {
    /// `console` is always attempted; `channels` are the optional external transports.
    pub fn new(
        console: Arc<dyn NotifierPort>,
        channels: Vec<Arc<dyn NotifierPort>>,
        timeout: Duration,
    ) -> Self {
        Self {
            console,
            channels,
            timeout,
        }
    }

    pub fn channel_names(&self) -> Vec<&'static str> {
        std::iter::once(self.console.name())
            .chain(self.channels.iter().map(|c| c.name()))
            .collect()
    }

    pub async fn deliver(&self, message: &BriefingMessage) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        let console = attempt(self.console.as_ref(), message, self.timeout).await;
        if console.is_err() {
            // Last resort so the briefing still reaches a log filtered at `warn`.
            error!(
                subject = %message.subject,
                "console unavailable, briefing body follows:\n{}",
                message.body
            );
        }
        report.record(self.console.name(), console);

        let attempts = self.channels.iter().map(|channel| async move {
            (
                channel.name(),
                attempt(channel.as_ref(), message, self.timeout).await,
            )
        });
        for (name, outcome) in join_all(attempts).await {
            report.record(name, outcome);
        }

        info!(
            delivered = report.delivered.len(),
            failed = report.failed.len(),
            "delivery round complete"
        );
        report
    }
}

async fn attempt(
    channel: &dyn NotifierPort,
    message: &BriefingMessage,
    limit: Duration,
) -> Result<(), DomainError> {
    match tokio::time::timeout(limit, channel.send(message)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(DomainError::Timeout {
            seconds: limit.as_secs(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::fakes::RecordingNotifier;
    use std::sync::Mutex;
    use tracing_subscriber::fmt::MakeWriter;

    fn message() -> BriefingMessage {
        BriefingMessage {
            subject: "Daily Briefing - Monday, October 19, 2026".to_string(),
            body: "📋 Daily Briefing".to_string(),
        }
    }

    #[tokio::test]
    async fn test_console_receives_briefing_when_channels_fail() {
        let console = Arc::new(RecordingNotifier::new("console"));
        let email = Arc::new(RecordingNotifier::failing("email"));
        let discord = Arc::new(RecordingNotifier::failing("discord"));
        let slack = Arc::new(RecordingNotifier::new("slack"));
        let channels: Vec<Arc<dyn NotifierPort>> = vec![email, discord, slack.clone()];
        let dispatcher =
            DeliveryDispatcher::new(console.clone(), channels, DEFAULT_DELIVERY_TIMEOUT);

        let report = dispatcher.deliver(&message()).await;

        assert_eq!(console.sent.lock().unwrap().as_slice(), &[message()]);
        assert_eq!(slack.sent_count(), 1);
        assert_eq!(report.delivered, vec!["console", "slack"]);
        assert_eq!(
            report.failed,
            vec![
                ("email", "Delivery failed: email unreachable".to_string()),
                ("discord", "Delivery failed: discord unreachable".to_string()),
            ]
        );
        assert!(!report.all_delivered());
    }

    #[tokio::test]
    async fn test_console_only() {
        let console = Arc::new(RecordingNotifier::new("console"));
        let dispatcher = DeliveryDispatcher::new(console.clone(), vec![], DEFAULT_DELIVERY_TIMEOUT);

        let report = dispatcher.deliver(&message()).await;

        assert_eq!(dispatcher.channel_names(), vec!["console"]);
        assert_eq!(console.sent_count(), 1);
        assert!(report.all_delivered());
    }

    /// Captures formatted log output for assertions.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test]
    async fn test_failed_console_body_survives_warn_filter() {
        let logs = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let console = Arc::new(RecordingNotifier::failing("console"));
        let channels: Vec<Arc<dyn NotifierPort>> = vec![
            Arc::new(RecordingNotifier::failing("email")),
            Arc::new(RecordingNotifier::failing("slack")),
        ];
        let dispatcher = DeliveryDispatcher::new(console, channels, DEFAULT_DELIVERY_TIMEOUT);
        let message = BriefingMessage {
            subject: "Daily Briefing - Monday, October 19, 2026".to_string(),
            body: "📈 AAPL: $185.20 (+$1.23, +0.66%)".to_string(),
        };

        let report = dispatcher.deliver(&message).await;

        assert!(report.delivered.is_empty());
        let failed: Vec<&str> = report.failed.iter().map(|(name, _)| *name).collect();
        assert_eq!(failed, vec!["console", "email", "slack"]);
        assert!(logs.contents().contains("📈 AAPL: $185.20 (+$1.23, +0.66%)"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_channel_times_out() {
        let console = Arc::new(RecordingNotifier::new("console"));
        let slow = Arc::new(RecordingNotifier::new("email").with_delay(Duration::from_secs(300)));
        let slack = Arc::new(RecordingNotifier::new("slack"));
        let channels: Vec<Arc<dyn NotifierPort>> = vec![slow.clone(), slack.clone()];
        let dispatcher = DeliveryDispatcher::new(console, channels, Duration::from_secs(10));

        let report = dispatcher.deliver(&message()).await;

        assert_eq!(slow.sent_count(), 0);
        assert_eq!(slack.sent_count(), 1);
        assert_eq!(
            report.failed,
            vec![("email", "timed out after 10s".to_string())]
        );
    }
}
