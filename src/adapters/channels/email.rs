//! Email channel. Plain-text message over SMTP with STARTTLS (lettre, tokio transport).

use crate::domain::DomainError;
use crate::ports::{BriefingMessage, NotifierPort};
use crate::shared::config::EmailSettings;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

pub struct EmailNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Vec<Mailbox>,
}

impl EmailNotifier {
    /// Fails on unparseable addresses or an invalid relay host.
    pub fn new(settings: &EmailSettings) -> Result<Self, DomainError> {
        let from = parse_mailbox(&settings.from)?;
        let to = settings
            .to
            .iter()
            .map(|addr| parse_mailbox(addr))
            .collect::<Result<Vec<_>, _>>()?;
        if to.is_empty() {
            return Err(DomainError::Config("email: no recipients".into()));
        }

        let server = &settings.smtp_server;
        let credentials = Credentials::new(settings.from.clone(), settings.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(server)
            .map_err(|e| DomainError::Config(format!("email relay {}: {}", server, e)))?
            .port(settings.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            from,
            to,
        })
    }

    fn build_message(&self, message: &BriefingMessage) -> Result<Message, DomainError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(message.subject.clone())
            .header(ContentType::TEXT_PLAIN);
        for recipient in &self.to {
            builder = builder.to(recipient.clone());
        }
        builder
            .body(message.body.clone())
            .map_err(|e| DomainError::Delivery(format!("email: {}", e)))
    }
}

fn parse_mailbox(addr: &str) -> Result<Mailbox, DomainError> {
    addr.trim()
        .parse::<Mailbox>()
        .map_err(|e| DomainError::Config(format!("email address '{}': {}", addr, e)))
}

#[async_trait::async_trait]
impl NotifierPort for EmailNotifier {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn send(&self, message: &BriefingMessage) -> Result<(), DomainError> {
        let email = self.build_message(message)?;
        debug!(recipients = self.to.len(), "sending briefing email");
        self.transport
            .send(email)
            .await
            .map_err(|e| DomainError::Delivery(format!("email: {}", e)))?;
        Ok(())
    }
}
