//! Source payloads. What each provider contributes to a briefing, in domain terms.

use crate::domain::entities::SourceResult;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

// ─────────────────────────────────────────────────────────────────────────────
// Weather
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    /// "imperial" (any case) selects imperial; anything else is metric.
    pub fn from_config(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("imperial") {
            Units::Imperial
        } else {
            Units::Metric
        }
    }

    pub fn temperature_symbol(self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    pub fn wind_symbol(self) -> &'static str {
        match self {
            Units::Metric => "m/s",
            Units::Imperial => "mph",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub temperature: f64,
    pub feels_like: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
    /// WMO weather interpretation code.
    pub weather_code: u8,
    pub wind_speed: f64,
    /// Precipitation in mm.
    pub rain: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastEntry {
    pub time: NaiveDateTime,
    pub temperature: f64,
    pub weather_code: u8,
    pub rain: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub units: Units,
    pub current: CurrentConditions,
    pub today_high: f64,
    pub today_low: f64,
    pub forecast: Vec<ForecastEntry>,
}

// ─────────────────────────────────────────────────────────────────────────────
// News
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Article {
    pub title: String,
    pub description: Option<String>,
    pub source: String,
    pub url: String,
    pub published_at: Option<String>,
    pub author: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsDigest {
    pub total_results: u64,
    pub category: String,
    pub country: String,
    pub articles: Vec<Article>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Stocks
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockQuote {
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub previous_close: f64,
    pub volume: u64,
    pub latest_trading_day: Option<NaiveDate>,
}

impl StockQuote {
    pub fn is_positive(&self) -> bool {
        self.change >= 0.0
    }
}

/// One watchlist symbol and its own outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockEntry {
    pub symbol: String,
    pub quote: SourceResult<StockQuote>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct StockBoard {
    /// Same order as the configured watchlist.
    pub entries: Vec<StockEntry>,
}

impl StockBoard {
    pub fn quotes(&self) -> impl Iterator<Item = &StockQuote> {
        self.entries.iter().filter_map(|e| e.quote.success())
    }

    pub fn failed_symbols(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|e| {
                let failure = e.quote.failure()?;
                Some((e.symbol.as_str(), failure.error.as_str()))
            })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Calendar
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEvent {
    pub title: String,
    pub start: NaiveTime,
    pub duration_minutes: u32,
    pub location: Option<String>,
    pub attendees: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarAgenda {
    pub date: NaiveDate,
    pub events: Vec<CalendarEvent>,
    pub note: Option<String>,
}

impl CalendarAgenda {
    /// Events sorted by start time; events starting together keep their listed order.
    pub fn chronological(&self) -> Vec<&CalendarEvent> {
        let mut events: Vec<&CalendarEvent> = self.events.iter().collect();
        events.sort_by_key(|e| e.start);
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::SourceFailure;

    fn event(title: &str, h: u32, m: u32) -> CalendarEvent {
        CalendarEvent {
            title: title.to_string(),
            start: NaiveTime::from_hms_opt(h, m, 0).unwrap(),
            duration_minutes: 30,
            location: None,
            attendees: vec![],
        }
    }

    #[test]
    fn test_units_from_config() {
        assert_eq!(Units::from_config("Imperial"), Units::Imperial);
        assert_eq!(Units::from_config("metric"), Units::Metric);
        assert_eq!(Units::from_config("kelvin"), Units::Metric);
    }

    #[test]
    fn test_chronological_order() {
        let agenda = CalendarAgenda {
            date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            events: vec![
                event("Late", 16, 30),
                event("Early", 9, 0),
                event("Noon", 12, 0),
            ],
            note: None,
        };
        let titles: Vec<&str> = agenda
            .chronological()
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Early", "Noon", "Late"]);
    }

    #[test]
    fn test_stock_board_partitions_entries() {
        let board = StockBoard {
            entries: vec![
                StockEntry {
                    symbol: "AAPL".into(),
                    quote: SourceResult::Success(StockQuote {
                        symbol: "AAPL".into(),
                        price: 100.0,
                        change: -1.0,
                        change_percent: -1.0,
                        open: 101.0,
                        high: 102.0,
                        low: 99.0,
                        previous_close: 101.0,
                        volume: 10,
                        latest_trading_day: None,
                    }),
                },
                StockEntry {
                    symbol: "TSLA".into(),
                    quote: SourceResult::Failure(SourceFailure::new("rate limited")),
                },
            ],
        };
        assert_eq!(board.quotes().count(), 1);
        assert!(!board.quotes().next().unwrap().is_positive());
        assert_eq!(
            board.failed_symbols().collect::<Vec<_>>(),
            vec![("TSLA", "rate limited")]
        );
    }
}
