//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{DomainError, StockQuote};

/// A data source contributing one slot to the briefing (weather, news, ...).
///
/// One call per cycle. Required credentials and rate limits are the adapter's concern.
#[async_trait::async_trait]
pub trait SourcePort<T>: Send + Sync {
    async fn fetch(&self) -> Result<T, DomainError>;
}

/// Quote provider for a single ticker symbol.
#[async_trait::async_trait]
pub trait QuotePort: Send + Sync {
    async fn quote(&self, symbol: &str) -> Result<StockQuote, DomainError>;
}

/// Formatted briefing as handed to a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BriefingMessage {
    /// Short title (email subject line).
    pub subject: String,
    pub body: String,
}

/// Notification channel (console, email, webhook).
///
/// Payload shaping (code blocks, message splitting, MIME) happens in the adapter.
#[async_trait::async_trait]
pub trait NotifierPort: Send + Sync {
    /// Channel name used in logs and delivery reports.
    fn name(&self) -> &'static str;

    async fn send(&self, message: &BriefingMessage) -> Result<(), DomainError>;
}
