//! Application use cases. Orchestrate domain logic via ports.

pub mod aggregator;
pub mod briefing_service;
pub mod dispatcher;
pub mod formatter;
pub mod scheduler;
pub mod watchlist;

#[cfg(test)]
pub(crate) mod fakes;

pub use aggregator::{BriefingAggregator, BriefingSources, SourceRequest};
pub use briefing_service::{BriefingService, CycleReport};
pub use dispatcher::{DeliveryDispatcher, DeliveryReport};
pub use scheduler::{DailyScheduler, run_guarded};
pub use watchlist::StockWatchlist;
