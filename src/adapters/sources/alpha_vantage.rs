//! Alpha Vantage adapter. Implements `QuotePort` with the `GLOBAL_QUOTE` function.
//!
//! Alpha Vantage answers 200 even on errors; the body carries `Error Message`, `Note`
//! (rate limit) or `Information` instead of a quote.

use crate::domain::{DomainError, StockQuote};
use crate::ports::QuotePort;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

const QUERY_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER: &str = "Alpha Vantage";

pub struct AlphaVantageClient {
    client: reqwest::Client,
    api_key: String,
}

impl AlphaVantageClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }
}

#[derive(Deserialize)]
struct QuoteEnvelope {
    #[serde(rename = "Global Quote")]
    global_quote: Option<HashMap<String, String>>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

struct QuoteFields<'a> {
    symbol: &'a str,
    map: &'a HashMap<String, String>,
}

impl QuoteFields<'_> {
    fn raw(&self, key: &str) -> Result<&str, DomainError> {
        self.map
            .get(key)
            .map(|s| s.trim())
            .ok_or_else(|| DomainError::Parse(format!("missing '{}' for {}", key, self.symbol)))
    }

    fn number(&self, key: &str) -> Result<f64, DomainError> {
        let raw = self.raw(key)?;
        raw.trim_end_matches('%').parse::<f64>().map_err(|e| {
            DomainError::Parse(format!("bad '{}' value '{}' for {}: {}", key, raw, self.symbol, e))
        })
    }

    /// Secondary figures are informational; a bad value reads as zero.
    fn number_or_zero(&self, key: &str) -> f64 {
        self.number(key).unwrap_or(0.0)
    }
}

fn parse_global_quote(symbol: &str, body: &str) -> Result<StockQuote, DomainError> {
    let envelope: QuoteEnvelope = serde_json::from_str(body)
        .map_err(|e| DomainError::Parse(format!("{} payload: {}", PROVIDER, e)))?;

    if let Some(message) = envelope.error_message {
        return Err(DomainError::api(PROVIDER, message));
    }
    if let Some(note) = envelope.note.or(envelope.information) {
        return Err(DomainError::api(PROVIDER, format!("limit: {}", note)));
    }
    let map = envelope
        .global_quote
        .filter(|m| !m.is_empty())
        .ok_or_else(|| {
            DomainError::api(PROVIDER, format!("no quote data returned for {}", symbol))
        })?;

    let f = QuoteFields { symbol, map: &map };
    Ok(StockQuote {
        symbol: f
            .raw("01. symbol")
            .map(str::to_string)
            .unwrap_or_else(|_| symbol.to_string()),
        price: f.number("05. price")?,
        change: f.number("09. change")?,
        change_percent: f.number("10. change percent")?,
        open: f.number_or_zero("02. open"),
        high: f.number_or_zero("03. high"),
        low: f.number_or_zero("04. low"),
        previous_close: f.number_or_zero("08. previous close"),
        volume: f
            .raw("06. volume")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0),
        latest_trading_day: f
            .raw("07. latest trading day")
            .ok()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
    })
}

#[async_trait::async_trait]
impl QuotePort for AlphaVantageClient {
    async fn quote(&self, symbol: &str) -> Result<StockQuote, DomainError> {
        debug!(symbol, "requesting quote");

        let response = self
            .client
            .get(QUERY_URL)
            .query(&[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", symbol),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| DomainError::Http(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DomainError::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(DomainError::api(
                PROVIDER,
                format!(
                    "{} for {}: {}",
                    status,
                    symbol,
                    body.chars().take(200).collect::<String>()
                ),
            ));
        }

        parse_global_quote(symbol, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUOTE: &str = r#"{
        "Global Quote": {
            "01. symbol": "AAPL",
            "02. open": "184.2000",
            "03. high": "186.1000",
            "04. low": "183.9000",
            "05. price": "185.6400",
            "06. volume": "48212345",
            "07. latest trading day": "2026-10-16",
            "08. previous close": "184.4000",
            "09. change": "1.2400",
            "10. change percent": "0.6725%"
        }
    }"#;

    #[test]
    fn test_parse_global_quote() {
        let q = parse_global_quote("AAPL", QUOTE).unwrap();
        assert_eq!(q.symbol, "AAPL");
        assert_eq!(q.price, 185.64);
        assert_eq!(q.change, 1.24);
        assert_eq!(q.change_percent, 0.6725);
        assert_eq!(q.volume, 48_212_345);
        assert_eq!(q.latest_trading_day, NaiveDate::from_ymd_opt(2026, 10, 16));
        assert!(q.is_positive());
    }

    #[test]
    fn test_rate_limit_note_is_failure() {
        let body = r#"{"Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute."}"#;
        let message = parse_global_quote("MSFT", body).unwrap_err().to_string();
        assert!(message.starts_with("Alpha Vantage API error: limit: Thank you"));

        let body = r#"{"Information": "daily rate limit reached"}"#;
        assert!(parse_global_quote("MSFT", body).is_err());
    }

    #[test]
    fn test_error_message_and_empty_quote() {
        let body = r#"{"Error Message": "Invalid API call."}"#;
        assert_eq!(
            parse_global_quote("NOPE", body).unwrap_err().to_string(),
            "Alpha Vantage API error: Invalid API call."
        );

        let body = r#"{"Global Quote": {}}"#;
        assert_eq!(
            parse_global_quote("NOPE", body).unwrap_err().to_string(),
            "Alpha Vantage API error: no quote data returned for NOPE"
        );
    }

    #[test]
    fn test_missing_price_is_parse_error() {
        let body = r#"{"Global Quote": {"01. symbol": "AAPL", "09. change": "1.0", "10. change percent": "1%"}}"#;
        let err = parse_global_quote("AAPL", body).unwrap_err();
        assert!(matches!(err, DomainError::Parse(_)));
    }
}
