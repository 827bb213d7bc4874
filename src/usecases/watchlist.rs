//! Stock watchlist. The stocks source: quotes every configured symbol independently.
//!
//! A symbol that fails becomes a failure entry on the board; the others are unaffected.

use crate::domain::{DomainError, SourceResult, StockBoard, StockEntry};
use crate::ports::{QuotePort, SourcePort};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{info, warn};

/// Quote requests in flight at once. Free Alpha Vantage keys allow 5 calls per minute.
const MAX_CONCURRENT_QUOTES: usize = 4;

pub struct StockWatchlist {
    quotes: Arc<dyn QuotePort>,
    symbols: Vec<String>,
}

impl StockWatchlist {
    pub fn new(quotes: Arc<dyn QuotePort>, symbols: Vec<String>) -> Self {
        Self { quotes, symbols }
    }
}

#[async_trait::async_trait]
impl SourcePort<StockBoard> for StockWatchlist {
    async fn fetch(&self) -> Result<StockBoard, DomainError> {
        let entries: Vec<StockEntry> = stream::iter(self.symbols.clone())
            .map(|symbol| async move {
                let quote = match self.quotes.quote(&symbol).await {
                    Ok(q) => SourceResult::Success(q),
                    Err(e) => {
                        warn!(symbol = %symbol, error = %e, "quote failed");
                        SourceResult::Failure(e.into())
                    }
                };
                StockEntry { symbol, quote }
            })
            // buffered keeps watchlist order
            .buffered(MAX_CONCURRENT_QUOTES)
            .collect()
            .await;

        let board = StockBoard { entries };
        info!(
            symbols = board.entries.len(),
            quoted = board.quotes().count(),
            "watchlist quoted"
        );
        Ok(board)
    }
}
