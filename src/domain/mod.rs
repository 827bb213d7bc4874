//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;
pub mod reports;
pub mod wmo;

pub use entities::{
    BriefingDocument, DATE_FORMAT, SourceFailure, SourceId, SourceResult, UnavailableReason,
    Warning,
};
pub use errors::DomainError;
pub use reports::{
    Article, CalendarAgenda, CalendarEvent, CurrentConditions, ForecastEntry, NewsDigest,
    StockBoard, StockEntry, StockQuote, Units, WeatherReport,
};
