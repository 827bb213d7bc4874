//! Test doubles for the outbound ports plus sample payloads.

use crate::domain::{
    Article, CalendarAgenda, CalendarEvent, CurrentConditions, DomainError, ForecastEntry,
    NewsDigest, SourceResult, StockBoard, StockEntry, StockQuote, Units, WeatherReport,
};
use crate::ports::{BriefingMessage, NotifierPort, QuotePort, SourcePort};
use chrono::{NaiveDate, NaiveTime};
use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Source returning a fixed result after an optional (tokio) delay.
pub struct FakeSource<T> {
    result: Result<T, DomainError>,
    delay: Duration,
    calls: AtomicUsize,
}

impl<T> FakeSource<T> {
    pub fn ok(data: T) -> Self {
        Self {
            result: Ok(data),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: DomainError) -> Self {
        Self {
            result: Err(error),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl<T: Clone + Send + Sync> SourcePort<T> for FakeSource<T> {
    async fn fetch(&self) -> Result<T, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.result.clone()
    }
}

/// Source whose client blows up instead of returning.
pub struct PanickingSource<T>(PhantomData<fn() -> T>);

impl<T> PanickingSource<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

#[async_trait::async_trait]
impl<T: Send> SourcePort<T> for PanickingSource<T> {
    async fn fetch(&self) -> Result<T, DomainError> {
        panic!("provider client exploded");
    }
}

/// Quotes every symbol except the ones listed as failing.
pub struct FakeQuotes {
    failing: HashSet<String>,
}

impl FakeQuotes {
    pub fn failing_on(symbols: &[&str]) -> Self {
        Self {
            failing: symbols.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[async_trait::async_trait]
impl QuotePort for FakeQuotes {
    async fn quote(&self, symbol: &str) -> Result<StockQuote, DomainError> {
        if self.failing.contains(symbol) {
            return Err(DomainError::api("Alpha Vantage", format!("no data for {}", symbol)));
        }
        Ok(sample_quote(symbol, 1.5))
    }
}

/// Channel recording what it was sent; optionally failing every send.
pub struct RecordingNotifier {
    name: &'static str,
    fail: bool,
    delay: Duration,
    pub sent: Mutex<Vec<BriefingMessage>>,
}

impl RecordingNotifier {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fail: false,
            delay: Duration::ZERO,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(name: &'static str) -> Self {
        Self {
            fail: true,
            ..Self::new(name)
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl NotifierPort for RecordingNotifier {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn send(&self, message: &BriefingMessage) -> Result<(), DomainError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(DomainError::Delivery(format!("{} unreachable", self.name)));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

pub fn sample_weather() -> WeatherReport {
    let day = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    let at = |h: u32| day.and_hms_opt(h, 0, 0).unwrap();
    WeatherReport {
        city: "Surat".to_string(),
        latitude: 21.1959,
        longitude: 72.8302,
        timezone: "Asia/Kolkata IST".to_string(),
        units: Units::Metric,
        current: CurrentConditions {
            temperature: 29.44,
            feels_like: 33.1,
            humidity: 64.0,
            weather_code: 0,
            wind_speed: 3.2,
            rain: 0.0,
        },
        today_high: 32.0,
        today_low: 24.5,
        forecast: vec![
            ForecastEntry {
                time: at(11),
                temperature: 30.0,
                weather_code: 2,
                rain: 0.0,
            },
            ForecastEntry {
                time: at(14),
                temperature: 31.0,
                weather_code: 61,
                rain: 0.4,
            },
        ],
    }
}

pub fn sample_news() -> NewsDigest {
    NewsDigest {
        total_results: 2,
        category: "General".to_string(),
        country: "US".to_string(),
        articles: vec![
            Article {
                title: "Markets rally on rate news".to_string(),
                description: Some("x".repeat(120)),
                source: "Reuters".to_string(),
                url: "https://example.com/a".to_string(),
                published_at: Some("2026-10-19T06:00:00Z".to_string()),
                author: None,
            },
            Article {
                title: "Local team wins".to_string(),
                description: None,
                source: "AP".to_string(),
                url: "https://example.com/b".to_string(),
                published_at: None,
                author: Some("Sam".to_string()),
            },
        ],
    }
}

pub fn sample_quote(symbol: &str, change: f64) -> StockQuote {
    StockQuote {
        symbol: symbol.to_string(),
        price: 185.2,
        change,
        change_percent: change / 1.852,
        open: 184.0,
        high: 186.0,
        low: 183.5,
        previous_close: 185.2 - change,
        volume: 1_000_000,
        latest_trading_day: NaiveDate::from_ymd_opt(2026, 10, 16),
    }
}

pub fn sample_board() -> StockBoard {
    StockBoard {
        entries: vec![
            StockEntry {
                symbol: "AAPL".to_string(),
                quote: SourceResult::Success(sample_quote("AAPL", 1.23)),
            },
            StockEntry {
                symbol: "TSLA".to_string(),
                quote: SourceResult::Success(sample_quote("TSLA", -2.5)),
            },
        ],
    }
}

pub fn sample_agenda() -> CalendarAgenda {
    let event = |title: &str, h: u32, m: u32, location: Option<&str>| CalendarEvent {
        title: title.to_string(),
        start: NaiveTime::from_hms_opt(h, m, 0).unwrap(),
        duration_minutes: 30,
        location: location.map(str::to_string),
        attendees: vec![],
    };
    CalendarAgenda {
        date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
        events: vec![
            event("Project Review Meeting", 14, 0, Some("Zoom")),
            event("Morning Standup", 9, 0, Some("Conference Room A")),
        ],
        note: None,
    }
}
