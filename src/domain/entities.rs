//! Domain entities. Pure data structures for one briefing cycle.
//!
//! No HTTP/IO types here. Provider payloads are mapped into these by adapters.

use crate::domain::errors::DomainError;
use crate::domain::reports::{CalendarAgenda, NewsDigest, StockBoard, WeatherReport};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::fmt;

/// Display format of `BriefingDocument::date`, e.g. "Monday, October 19, 2026".
pub const DATE_FORMAT: &str = "%A, %B %d, %Y";

/// Identity of a data source. Declaration order is the slot order of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceId {
    Weather,
    News,
    Stocks,
    Calendar,
}

impl SourceId {
    pub const ALL: [SourceId; 4] = [
        SourceId::Weather,
        SourceId::News,
        SourceId::Stocks,
        SourceId::Calendar,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SourceId::Weather => "Weather",
            SourceId::News => "News",
            SourceId::Stocks => "Stocks",
            SourceId::Calendar => "Calendar",
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error description carried by a failed source (or a failed stock symbol).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFailure {
    pub error: String,
}

impl SourceFailure {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

impl fmt::Display for SourceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.error)
    }
}

impl From<DomainError> for SourceFailure {
    fn from(e: DomainError) -> Self {
        Self::new(e.to_string())
    }
}

/// Outcome of one attempted source call: either the payload or a failure, never both.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "lowercase")]
pub enum SourceResult<T> {
    Success(T),
    Failure(SourceFailure),
}

impl<T> SourceResult<T> {
    pub fn success(&self) -> Option<&T> {
        match self {
            SourceResult::Success(data) => Some(data),
            SourceResult::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&SourceFailure> {
        match self {
            SourceResult::Success(_) => None,
            SourceResult::Failure(f) => Some(f),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SourceResult::Success(_))
    }
}

impl<T> From<Result<T, DomainError>> for SourceResult<T> {
    fn from(result: Result<T, DomainError>) -> Self {
        match result {
            Ok(data) => SourceResult::Success(data),
            Err(e) => SourceResult::Failure(e.into()),
        }
    }
}

/// Why a source was not called this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    MissingApiKey,
    Disabled,
}

/// A source that was skipped. Surfaced to the reader, never treated as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub source: SourceId,
    pub reason: UnavailableReason,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            UnavailableReason::MissingApiKey => {
                write!(f, "{}: API key not configured", self.source)
            }
            UnavailableReason::Disabled => write!(f, "{}: disabled in configuration", self.source),
        }
    }
}

/// Unified result of one aggregation cycle.
///
/// Built once by the aggregator and read-only afterwards. Slots are `None` exactly
/// when the source was unavailable (and then a `Warning` names it).
#[derive(Debug, Clone, Serialize)]
pub struct BriefingDocument {
    generated_at: DateTime<FixedOffset>,
    date: String,
    weather: Option<SourceResult<WeatherReport>>,
    news: Option<SourceResult<NewsDigest>>,
    stocks: Option<SourceResult<StockBoard>>,
    calendar: Option<SourceResult<CalendarAgenda>>,
    warnings: Vec<Warning>,
}

impl BriefingDocument {
    pub(crate) fn assemble(
        generated_at: DateTime<FixedOffset>,
        weather: Option<SourceResult<WeatherReport>>,
        news: Option<SourceResult<NewsDigest>>,
        stocks: Option<SourceResult<StockBoard>>,
        calendar: Option<SourceResult<CalendarAgenda>>,
        warnings: Vec<Warning>,
    ) -> Self {
        Self {
            generated_at,
            date: generated_at.format(DATE_FORMAT).to_string(),
            weather,
            news,
            stocks,
            calendar,
            warnings,
        }
    }

    pub fn generated_at(&self) -> DateTime<FixedOffset> {
        self.generated_at
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn weather(&self) -> Option<&SourceResult<WeatherReport>> {
        self.weather.as_ref()
    }

    pub fn news(&self) -> Option<&SourceResult<NewsDigest>> {
        self.news.as_ref()
    }

    pub fn stocks(&self) -> Option<&SourceResult<StockBoard>> {
        self.stocks.as_ref()
    }

    pub fn calendar(&self) -> Option<&SourceResult<CalendarAgenda>> {
        self.calendar.as_ref()
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Sources that produced a slot (success or failure), in slot order.
    pub fn populated_slots(&self) -> Vec<SourceId> {
        SourceId::ALL
            .into_iter()
            .filter(|id| self.slot_failure(*id).is_some())
            .collect()
    }

    /// Failed slots, in slot order.
    pub fn failures(&self) -> Vec<(SourceId, &SourceFailure)> {
        SourceId::ALL
            .into_iter()
            .filter_map(|id| match self.slot_failure(id) {
                Some(Some(f)) => Some((id, f)),
                _ => None,
            })
            .collect()
    }

    /// Outer `None`: slot empty. Inner `None`: slot holds a success.
    fn slot_failure(&self, id: SourceId) -> Option<Option<&SourceFailure>> {
        match id {
            SourceId::Weather => self.weather.as_ref().map(|r| r.failure()),
            SourceId::News => self.news.as_ref().map(|r| r.failure()),
            SourceId::Stocks => self.stocks.as_ref().map(|r| r.failure()),
            SourceId::Calendar => self.calendar.as_ref().map(|r| r.failure()),
        }
    }
}
