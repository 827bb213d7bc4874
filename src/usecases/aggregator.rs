//! Briefing aggregation: fan-out to every enabled source, assemble one document.
//!
//! - Each source runs in its own future; all are joined before the document is built
//! - Errors, timeouts and panics become a failure-tagged result for that source only
//! - Unavailable sources are never called and contribute a `Warning` instead of a slot
//! - Slot placement is by source identity, not by completion order

use crate::domain::{
    BriefingDocument, CalendarAgenda, DomainError, NewsDigest, SourceFailure, SourceId,
    SourceResult, StockBoard, UnavailableReason, Warning, WeatherReport,
};
use crate::ports::SourcePort;
use chrono::{DateTime, FixedOffset, Local};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Per-source wait bound when none is configured.
pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(20);

/// One source invocation for a cycle: the client to call, or why it is skipped.
pub enum SourceRequest<T> {
    Enabled(Arc<dyn SourcePort<T>>),
    Unavailable(UnavailableReason),
}

impl<T> SourceRequest<T> {
    pub fn enabled(client: Arc<dyn SourcePort<T>>) -> Self {
        SourceRequest::Enabled(client)
    }

    pub fn missing_api_key() -> Self {
        SourceRequest::Unavailable(UnavailableReason::MissingApiKey)
    }

    pub fn disabled() -> Self {
        SourceRequest::Unavailable(UnavailableReason::Disabled)
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, SourceRequest::Enabled(_))
    }

    fn unavailable(&self) -> Option<UnavailableReason> {
        match self {
            SourceRequest::Enabled(_) => None,
            SourceRequest::Unavailable(reason) => Some(*reason),
        }
    }
}

/// The four source slots of a briefing, keyed by field.
pub struct BriefingSources {
    pub weather: SourceRequest<WeatherReport>,
    pub news: SourceRequest<NewsDigest>,
    pub stocks: SourceRequest<StockBoard>,
    pub calendar: SourceRequest<CalendarAgenda>,
}

impl BriefingSources {
    pub fn enabled_count(&self) -> usize {
        [
            self.weather.is_enabled(),
            self.news.is_enabled(),
            self.stocks.is_enabled(),
            self.calendar.is_enabled(),
        ]
        .into_iter()
        .filter(|e| *e)
        .count()
    }

    fn warnings(&self) -> Vec<Warning> {
        [
            (SourceId::Weather, self.weather.unavailable()),
            (SourceId::News, self.news.unavailable()),
            (SourceId::Stocks, self.stocks.unavailable()),
            (SourceId::Calendar, self.calendar.unavailable()),
        ]
        .into_iter()
        .filter_map(|(source, reason)| reason.map(|reason| Warning { source, reason }))
        .collect()
    }
}

fn local_now() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}

/// Builds one `BriefingDocument` per call from the configured sources.
pub struct BriefingAggregator {
    sources: BriefingSources,
    timeout: Duration,
    clock: fn() -> DateTime<FixedOffset>,
}

impl BriefingAggregator {
    pub fn new(sources: BriefingSources, timeout: Duration) -> Self {
        Self {
            sources,
            timeout,
            clock: local_now,
        }
    }

    /// Replace the wall clock used to stamp documents.
    pub fn with_clock(mut self, clock: fn() -> DateTime<FixedOffset>) -> Self {
        self.clock = clock;
        self
    }

    pub fn sources(&self) -> &BriefingSources {
        &self.sources
    }

    /// Run one fan-out. Never fails: every source outcome ends up inside the document.
    pub async fn aggregate(&self) -> BriefingDocument {
        let generated_at = (self.clock)();

        let warnings = self.sources.warnings();
        for w in &warnings {
            info!(source = %w.source, "{}", w);
        }

        let (weather, news, stocks, calendar) = tokio::join!(
            collect(SourceId::Weather, &self.sources.weather, self.timeout),
            collect(SourceId::News, &self.sources.news, self.timeout),
            collect(SourceId::Stocks, &self.sources.stocks, self.timeout),
            collect(SourceId::Calendar, &self.sources.calendar, self.timeout),
        );

        let document =
            BriefingDocument::assemble(generated_at, weather, news, stocks, calendar, warnings);

        info!(
            date = %document.date(),
            slots = document.populated_slots().len(),
            failures = document.failures().len(),
            warnings = document.warnings().len(),
            "briefing assembled"
        );

        document
    }
}

/// Await one source under the timeout. `None` when the source is unavailable.
async fn collect<T>(
    id: SourceId,
    request: &SourceRequest<T>,
    limit: Duration,
) -> Option<SourceResult<T>> {
    let SourceRequest::Enabled(client) = request else {
        return None;
    };

    let started = tokio::time::Instant::now();
    let outcome = AssertUnwindSafe(tokio::time::timeout(limit, client.fetch()))
        .catch_unwind()
        .await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    let result = match outcome {
        Ok(Ok(Ok(data))) => {
            info!(source = %id, elapsed_ms, "source fetched");
            SourceResult::Success(data)
        }
        Ok(Ok(Err(e))) => {
            warn!(source = %id, elapsed_ms, error = %e, "source failed");
            SourceResult::Failure(e.into())
        }
        Ok(Err(_elapsed)) => {
            let e = DomainError::Timeout {
                seconds: limit.as_secs(),
            };
            warn!(source = %id, error = %e, "source timed out");
            SourceResult::Failure(e.into())
        }
        Err(panic) => {
            let reason = panic_message(&*panic);
            error!(source = %id, reason, "source client panicked");
            SourceResult::Failure(SourceFailure::new(format!("internal error: {}", reason)))
        }
    };

    Some(result)
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("panic")
}
