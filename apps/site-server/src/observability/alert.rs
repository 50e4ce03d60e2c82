//! Error alerting layer for tracing.
//!
//! ERROR events (failed blog queries, database outages, misconfiguration)
//! are forwarded to the console or to a chat webhook.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{Layer, layer::Context};

/// Alert message containing error details.
#[derive(Debug, Clone)]
pub struct AlertMessage {
    pub level: Level,
    pub message: String,
    pub target: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub fields: Vec<(String, String)>,
}

impl AlertMessage {
    fn summary(&self) -> String {
        let mut text = format!(
            "[{}] {} at {}\n{}",
            self.level, self.target, self.timestamp, self.message
        );
        for (name, value) in &self.fields {
            text.push_str(&format!("\n  {name} = {value}"));
        }
        text
    }
}

/// Configuration for the alert layer.
#[derive(Debug, Clone)]
pub struct AlertConfig {
    /// Least severe level that still alerts.
    pub min_level: Level,
    /// Channel buffer size; alerts beyond it are dropped.
    pub buffer_size: usize,
    /// Webhook URL (Slack, Discord, ...). Console when unset.
    pub webhook_url: Option<String>,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            min_level: Level::ERROR,
            buffer_size: 100,
            webhook_url: None,
        }
    }
}

#[async_trait::async_trait]
trait AlertSender: Send + Sync {
    async fn send(&self, alert: AlertMessage) -> Result<(), AlertError>;
}

#[derive(Debug, thiserror::Error)]
enum AlertError {
    #[error("Failed to send alert: {0}")]
    SendError(String),
}

/// Prints alerts to stderr (for development).
struct ConsoleAlertSender;

#[async_trait::async_trait]
impl AlertSender for ConsoleAlertSender {
    async fn send(&self, alert: AlertMessage) -> Result<(), AlertError> {
        eprintln!("\n*** SITE ALERT ***\n{}\n", alert.summary());
        Ok(())
    }
}

/// Posts alerts to a chat webhook.
struct WebhookAlertSender {
    url: String,
    client: reqwest::Client,
}

#[async_trait::async_trait]
impl AlertSender for WebhookAlertSender {
    async fn send(&self, alert: AlertMessage) -> Result<(), AlertError> {
        let payload = serde_json::json!({ "text": alert.summary() });

        self.client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|e| AlertError::SendError(e.to_string()))?;

        Ok(())
    }
}

/// Tracing layer that forwards severe events to an alert sender.
pub struct AlertLayer {
    min_level: Level,
    sender: mpsc::Sender<AlertMessage>,
}

impl AlertLayer {
    /// Must be called inside a tokio runtime; delivery runs on a spawned task.
    pub fn new(config: AlertConfig) -> Self {
        let alert_sender: Arc<dyn AlertSender> = match config.webhook_url {
            Some(url) => Arc::new(WebhookAlertSender {
                url,
                client: reqwest::Client::new(),
            }),
            None => Arc::new(ConsoleAlertSender),
        };
        let (tx, mut rx) = mpsc::channel::<AlertMessage>(config.buffer_size.max(1));

        tokio::spawn(async move {
            while let Some(alert) = rx.recv().await {
                if let Err(e) = alert_sender.send(alert).await {
                    // Not through tracing, or a failing webhook would alert about itself.
                    eprintln!("{}", e);
                }
            }
        });

        Self {
            min_level: config.min_level,
            sender: tx,
        }
    }
}

/// Visitor to extract fields from events.
#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields
                .push((field.name().to_string(), format!("{:?}", value)));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push((field.name().to_string(), value.to_string()));
        }
    }
}

impl<S> Layer<S> for AlertLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        // Level ordering: ERROR is the smallest.
        if *event.metadata().level() > self.min_level {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let alert = AlertMessage {
            level: *event.metadata().level(),
            message: visitor.message,
            target: event.metadata().target().to_string(),
            timestamp: chrono::Utc::now(),
            fields: visitor.fields,
        };

        let _ = self.sender.try_send(alert);
    }
}
