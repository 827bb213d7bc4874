//! Application configuration. Source credentials, delivery channels, timing.
//!
//! Read from `BRIEFING_*` environment variables and an optional file named by
//! `BRIEFING_CONFIG`. The unprefixed names older deployments used (`NEWS_API_KEY`,
//! `EMAIL_TO`, ...) are honoured when the prefixed key is absent.

use crate::domain::Units;
use crate::usecases::aggregator::DEFAULT_SOURCE_TIMEOUT;
use crate::usecases::dispatcher::DEFAULT_DELIVERY_TIMEOUT;
use crate::usecases::scheduler::{DEFAULT_SCHEDULE, parse_times};
use chrono::NaiveTime;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_WEATHER_CITY: &str = "Surat";
pub const DEFAULT_NEWS_COUNTRY: &str = "us";
pub const DEFAULT_NEWS_CATEGORY: &str = "general";
pub const DEFAULT_STOCK_SYMBOLS: &str = "AAPL,GOOGL,MSFT,TSLA";
pub const DEFAULT_SMTP_SERVER: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Unprefixed variable -> field it backs.
const LEGACY_VARS: &[(&str, &str)] = &[
    ("WEATHER_CITY", "weather_city"),
    ("NEWS_API_KEY", "news_api_key"),
    ("NEWS_COUNTRY", "news_country"),
    ("STOCK_API_KEY", "stock_api_key"),
    ("STOCK_SYMBOLS", "stock_symbols"),
    ("EMAIL_FROM", "email_from"),
    ("EMAIL_PASSWORD", "email_password"),
    ("EMAIL_TO", "email_to"),
    ("DISCORD_WEBHOOK_URL", "discord_webhook_url"),
    ("SLACK_WEBHOOK_URL", "slack_webhook_url"),
];

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    // ─────────────────────────────────────────────────────────────────────────
    // Weather (Open-Meteo, no key)
    // ─────────────────────────────────────────────────────────────────────────
    /// Defaults to true. Read from BRIEFING_WEATHER_ENABLED.
    #[serde(default)]
    pub weather_enabled: Option<bool>,
    #[serde(default)]
    pub weather_city: Option<String>,
    /// "metric" or "imperial".
    #[serde(default)]
    pub weather_units: Option<String>,
    /// Overrides the city lookup when both are set.
    #[serde(default)]
    pub weather_latitude: Option<f64>,
    #[serde(default)]
    pub weather_longitude: Option<f64>,

    // ─────────────────────────────────────────────────────────────────────────
    // News (NewsAPI)
    // ─────────────────────────────────────────────────────────────────────────
    #[serde(default)]
    pub news_api_key: Option<String>,
    #[serde(default)]
    pub news_country: Option<String>,
    #[serde(default)]
    pub news_category: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Stocks (Alpha Vantage)
    // ─────────────────────────────────────────────────────────────────────────
    #[serde(default)]
    pub stock_api_key: Option<String>,
    /// Comma-separated ticker list.
    #[serde(default)]
    pub stock_symbols: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Calendar
    // ─────────────────────────────────────────────────────────────────────────
    /// Defaults to false: the calendar only has mock data.
    #[serde(default)]
    pub calendar_enabled: Option<bool>,

    // ─────────────────────────────────────────────────────────────────────────
    // Delivery
    // ─────────────────────────────────────────────────────────────────────────
    #[serde(default)]
    pub email_from: Option<String>,
    #[serde(default)]
    pub email_password: Option<String>,
    /// Comma-separated recipients.
    #[serde(default)]
    pub email_to: Option<String>,
    #[serde(default)]
    pub smtp_server: Option<String>,
    #[serde(default)]
    pub smtp_port: Option<u16>,
    #[serde(default)]
    pub discord_webhook_url: Option<String>,
    #[serde(default)]
    pub slack_webhook_url: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Timing
    // ─────────────────────────────────────────────────────────────────────────
    #[serde(default)]
    pub source_timeout_secs: Option<u64>,
    #[serde(default)]
    pub delivery_timeout_secs: Option<u64>,
    /// Comma-separated `HH:MM` local times. Defaults to 08:00.
    #[serde(default)]
    pub schedule_times: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSettings {
    pub city: String,
    pub units: Units,
    pub coordinates: Option<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsSettings {
    pub api_key: String,
    pub country: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockSettings {
    pub api_key: String,
    pub symbols: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailSettings {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub from: String,
    pub password: String,
    pub to: Vec<String>,
}

fn blank_to_none(value: &mut Option<String>) {
    if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
        *value = None;
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        Self::from_vars(std::env::vars().collect())
    }

    /// Build from an explicit variable set instead of the process environment.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, config::ConfigError> {
        let mut c = config::Config::builder();
        if let Some(path) = vars.get("BRIEFING_CONFIG") {
            c = c.add_source(config::File::with_name(path));
        }
        c = c.add_source(
            config::Environment::with_prefix("BRIEFING")
                .prefix_separator("_")
                .source(Some(vars.clone())),
        );
        let mut cfg: Self = c.build()?.try_deserialize()?;
        cfg.normalize();

        for (name, field) in LEGACY_VARS {
            let Some(value) = vars.get(*name).filter(|v| !v.trim().is_empty()) else {
                continue;
            };
            let slot = match *field {
                "weather_city" => &mut cfg.weather_city,
                "news_api_key" => &mut cfg.news_api_key,
                "news_country" => &mut cfg.news_country,
                "stock_api_key" => &mut cfg.stock_api_key,
                "stock_symbols" => &mut cfg.stock_symbols,
                "email_from" => &mut cfg.email_from,
                "email_password" => &mut cfg.email_password,
                "email_to" => &mut cfg.email_to,
                "discord_webhook_url" => &mut cfg.discord_webhook_url,
                "slack_webhook_url" => &mut cfg.slack_webhook_url,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.trim().to_string());
            }
        }
        Ok(cfg)
    }

    /// An empty variable (`NEWS_API_KEY=`) counts as unset.
    fn normalize(&mut self) {
        for value in [
            &mut self.weather_city,
            &mut self.weather_units,
            &mut self.news_api_key,
            &mut self.news_country,
            &mut self.news_category,
            &mut self.stock_api_key,
            &mut self.stock_symbols,
            &mut self.email_from,
            &mut self.email_password,
            &mut self.email_to,
            &mut self.smtp_server,
            &mut self.discord_webhook_url,
            &mut self.slack_webhook_url,
            &mut self.schedule_times,
        ] {
            blank_to_none(value);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sources
    // ─────────────────────────────────────────────────────────────────────────

    /// `None` when weather is disabled.
    pub fn weather(&self) -> Option<WeatherSettings> {
        if !self.weather_enabled.unwrap_or(true) {
            return None;
        }
        Some(WeatherSettings {
            city: self
                .weather_city
                .clone()
                .unwrap_or_else(|| DEFAULT_WEATHER_CITY.to_string()),
            units: Units::from_config(self.weather_units.as_deref().unwrap_or("metric")),
            coordinates: self.weather_latitude.zip(self.weather_longitude),
        })
    }

    /// `None` without an API key.
    pub fn news(&self) -> Option<NewsSettings> {
        Some(NewsSettings {
            api_key: self.news_api_key.clone()?,
            country: self
                .news_country
                .clone()
                .unwrap_or_else(|| DEFAULT_NEWS_COUNTRY.to_string()),
            category: self
                .news_category
                .clone()
                .unwrap_or_else(|| DEFAULT_NEWS_CATEGORY.to_string()),
        })
    }

    /// `None` without an API key.
    pub fn stocks(&self) -> Option<StockSettings> {
        let api_key = self.stock_api_key.clone()?;
        let mut symbols: Vec<String> = split_list(
            self.stock_symbols
                .as_deref()
                .unwrap_or(DEFAULT_STOCK_SYMBOLS),
        )
        .into_iter()
        .map(|s| s.to_uppercase())
        .collect();
        if symbols.is_empty() {
            symbols = split_list(DEFAULT_STOCK_SYMBOLS);
        }
        Some(StockSettings { api_key, symbols })
    }

    pub fn calendar_enabled(&self) -> bool {
        self.calendar_enabled.unwrap_or(false)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Channels
    // ─────────────────────────────────────────────────────────────────────────

    /// `None` unless sender, password and at least one recipient are set.
    pub fn email(&self) -> Option<EmailSettings> {
        let to = split_list(self.email_to.as_deref()?);
        if to.is_empty() {
            return None;
        }
        Some(EmailSettings {
            smtp_server: self
                .smtp_server
                .clone()
                .unwrap_or_else(|| DEFAULT_SMTP_SERVER.to_string()),
            smtp_port: self.smtp_port.unwrap_or(DEFAULT_SMTP_PORT),
            from: self.email_from.clone()?,
            password: self.email_password.clone()?,
            to,
        })
    }

    pub fn discord_webhook_url(&self) -> Option<String> {
        self.discord_webhook_url.clone()
    }

    pub fn slack_webhook_url(&self) -> Option<String> {
        self.slack_webhook_url.clone()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Timing
    // ─────────────────────────────────────────────────────────────────────────

    pub fn source_timeout(&self) -> Duration {
        self.source_timeout_secs
            .filter(|s| *s > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_SOURCE_TIMEOUT)
    }

    pub fn delivery_timeout(&self) -> Duration {
        self.delivery_timeout_secs
            .filter(|s| *s > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_DELIVERY_TIMEOUT)
    }

    /// Parsed run times. An invalid value is an error, not a silent default.
    pub fn schedule_times_or_default(&self) -> Result<Vec<NaiveTime>, crate::domain::DomainError> {
        parse_times(self.schedule_times.as_deref().unwrap_or(DEFAULT_SCHEDULE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::from_vars(HashMap::new()).unwrap();

        let weather = cfg.weather().unwrap();
        assert_eq!(weather.city, "Surat");
        assert_eq!(weather.units, Units::Metric);
        assert_eq!(weather.coordinates, None);
        assert!(cfg.news().is_none());
        assert!(cfg.stocks().is_none());
        assert!(!cfg.calendar_enabled());
        assert!(cfg.email().is_none());
        assert_eq!(cfg.source_timeout(), Duration::from_secs(20));
        assert_eq!(cfg.delivery_timeout(), Duration::from_secs(30));
        assert_eq!(
            cfg.schedule_times_or_default().unwrap(),
            vec![NaiveTime::from_hms_opt(8, 0, 0).unwrap()]
        );
    }

    #[test]
    fn test_prefixed_vars() {
        let cfg = AppConfig::from_vars(vars(&[
            ("BRIEFING_WEATHER_CITY", "London"),
            ("BRIEFING_WEATHER_UNITS", "imperial"),
            ("BRIEFING_NEWS_API_KEY", "news-key"),
            ("BRIEFING_NEWS_CATEGORY", "technology"),
            ("BRIEFING_STOCK_API_KEY", "stock-key"),
            ("BRIEFING_STOCK_SYMBOLS", "nvda, amd,,"),
            ("BRIEFING_CALENDAR_ENABLED", "true"),
            ("BRIEFING_SOURCE_TIMEOUT_SECS", "5"),
            ("BRIEFING_SCHEDULE_TIMES", "18:30,07:00"),
        ]))
        .unwrap();

        let weather = cfg.weather().unwrap();
        assert_eq!(weather.city, "London");
        assert_eq!(weather.units, Units::Imperial);
        let news = cfg.news().unwrap();
        assert_eq!(news.api_key, "news-key");
        assert_eq!(news.country, "us");
        assert_eq!(news.category, "technology");
        assert_eq!(cfg.stocks().unwrap().symbols, vec!["NVDA", "AMD"]);
        assert!(cfg.calendar_enabled());
        assert_eq!(cfg.source_timeout(), Duration::from_secs(5));
        assert_eq!(cfg.schedule_times_or_default().unwrap().len(), 2);
    }

    #[test]
    fn test_legacy_names_are_fallbacks() {
        let cfg = AppConfig::from_vars(vars(&[
            ("NEWS_API_KEY", "legacy-news"),
            ("STOCK_API_KEY", "legacy-stock"),
            ("BRIEFING_STOCK_API_KEY", "prefixed-stock"),
            ("EMAIL_FROM", "me@example.com"),
            ("EMAIL_PASSWORD", "secret"),
            ("EMAIL_TO", "a@example.com, b@example.com"),
            ("DISCORD_WEBHOOK_URL", "https://discord.com/api/webhooks/1/x"),
        ]))
        .unwrap();

        assert_eq!(cfg.news().unwrap().api_key, "legacy-news");
        let stocks = cfg.stocks().unwrap();
        assert_eq!(stocks.api_key, "prefixed-stock");
        assert_eq!(stocks.symbols, ["AAPL", "GOOGL", "MSFT", "TSLA"]);
        let email = cfg.email().unwrap();
        assert_eq!(email.smtp_server, "smtp.gmail.com");
        assert_eq!(email.smtp_port, 587);
        assert_eq!(email.to, vec!["a@example.com", "b@example.com"]);
        assert!(cfg.discord_webhook_url().is_some());
        assert!(cfg.slack_webhook_url().is_none());
    }

    #[test]
    fn test_blank_values_count_as_unset() {
        let cfg = AppConfig::from_vars(vars(&[
            ("BRIEFING_NEWS_API_KEY", ""),
            ("STOCK_API_KEY", "  "),
            ("BRIEFING_WEATHER_ENABLED", "false"),
        ]))
        .unwrap();

        assert!(cfg.news().is_none());
        assert!(cfg.stocks().is_none());
        assert!(cfg.weather().is_none());
    }

    #[test]
    fn test_incomplete_email_is_disabled() {
        let cfg = AppConfig::from_vars(vars(&[
            ("EMAIL_FROM", "me@example.com"),
            ("EMAIL_TO", "a@example.com"),
        ]))
        .unwrap();
        assert!(cfg.email().is_none());
    }

    #[test]
    fn test_invalid_schedule_is_error() {
        let cfg = AppConfig::from_vars(vars(&[("BRIEFING_SCHEDULE_TIMES", "8am")])).unwrap();
        assert!(cfg.schedule_times_or_default().is_err());
    }
}
