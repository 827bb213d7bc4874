//! One briefing cycle: aggregate -> format -> deliver.
//!
//! Formatting starts only after every source has settled; nothing is delivered if the
//! cycle future is dropped before aggregation finishes.

use crate::domain::BriefingDocument;
use crate::ports::CyclePort;
use crate::usecases::aggregator::BriefingAggregator;
use crate::usecases::dispatcher::{DeliveryDispatcher, DeliveryReport};
use crate::usecases::formatter;
use tracing::info;

/// What a finished cycle produced.
#[derive(Debug)]
pub struct CycleReport {
    pub document: BriefingDocument,
    pub delivery: DeliveryReport,
}

pub struct BriefingService {
    aggregator: BriefingAggregator,
    dispatcher: DeliveryDispatcher,
}

impl BriefingService {
    pub fn new(aggregator: BriefingAggregator, dispatcher: DeliveryDispatcher) -> Self {
        Self {
            aggregator,
            dispatcher,
        }
    }
}

#[async_trait::async_trait]
impl CyclePort for BriefingService {
    async fn run_cycle(&self) -> CycleReport {
        info!(
            sources = self.aggregator.sources().enabled_count(),
            channels = ?self.dispatcher.channel_names(),
            "generating daily briefing"
        );

        let document = self.aggregator.aggregate().await;
        let message = formatter::compose(&document);
        let delivery = self.dispatcher.deliver(&message).await;

        info!(
            date = %document.date(),
            delivered = delivery.delivered.len(),
            failed = delivery.failed.len(),
            "daily briefing cycle finished"
        );

        CycleReport { document, delivery }
    }
}
