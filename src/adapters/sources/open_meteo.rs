//! Open-Meteo adapter. Implements `SourcePort<WeatherReport>`.
//!
//! Free API, no key required. City names are resolved to coordinates through a small
//! built-in table unless explicit coordinates are configured.

use crate::domain::{CurrentConditions, DomainError, ForecastEntry, Units, WeatherReport};
use crate::ports::SourcePort;
use crate::shared::config::WeatherSettings;
use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::{debug, warn};

const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
const PROVIDER: &str = "Open-Meteo";
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Forecast entries in the briefing and the spacing between them (4 x 3h = 12 hours).
const FORECAST_POINTS: usize = 4;
const FORECAST_STEP_HOURS: usize = 3;

/// Fallback when the city is not in the table: New York.
const DEFAULT_COORDINATES: (f64, f64) = (40.7128, -74.0060);

const CITY_COORDINATES: &[(&str, f64, f64)] = &[
    ("new york", 40.7128, -74.0060),
    ("london", 51.5074, -0.1278),
    ("tokyo", 35.6762, 139.6503),
    ("paris", 48.8566, 2.3522),
    ("sydney", -33.8688, 151.2093),
    ("mumbai", 19.0760, 72.8777),
    ("delhi", 28.7041, 77.1025),
    ("los angeles", 34.0522, -118.2437),
    ("chicago", 41.8781, -87.6298),
    ("toronto", 43.6532, -79.3832),
    ("berlin", 52.5200, 13.4050),
    ("moscow", 55.7558, 37.6176),
    ("beijing", 39.9042, 116.4074),
    ("seoul", 37.5665, 126.9780),
    ("bangkok", 13.7563, 100.5018),
    ("singapore", 1.3521, 103.8198),
    ("dubai", 25.2048, 55.2708),
    ("cairo", 30.0444, 31.2357),
    ("johannesburg", -26.2041, 28.0473),
    ("buenos aires", -34.6118, -58.3960),
    ("surat", 21.1959, 72.8302),
];

/// Look up a city (case-insensitive). `None` if it is not in the table.
pub fn city_coordinates(city: &str) -> Option<(f64, f64)> {
    let key = city.trim().to_lowercase();
    CITY_COORDINATES
        .iter()
        .find(|(name, _, _)| *name == key)
        .map(|(_, lat, lon)| (*lat, *lon))
}

pub struct OpenMeteoClient {
    client: reqwest::Client,
    city: String,
    latitude: f64,
    longitude: f64,
    units: Units,
}

impl OpenMeteoClient {
    pub fn new(settings: &WeatherSettings) -> Self {
        let (latitude, longitude) = match settings.coordinates {
            Some(coords) => coords,
            None => city_coordinates(&settings.city).unwrap_or_else(|| {
                warn!(city = %settings.city, "unknown city, falling back to New York coordinates");
                DEFAULT_COORDINATES
            }),
        };
        Self {
            client: reqwest::Client::new(),
            city: settings.city.clone(),
            latitude,
            longitude,
            units: settings.units,
        }
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let (temperature_unit, wind_speed_unit) = match self.units {
            Units::Metric => ("celsius", "ms"),
            Units::Imperial => ("fahrenheit", "mph"),
        };
        vec![
            ("latitude", self.latitude.to_string()),
            ("longitude", self.longitude.to_string()),
            (
                "current",
                "temperature_2m,apparent_temperature,rain,weather_code,wind_speed_10m,relative_humidity_2m"
                    .to_string(),
            ),
            ("hourly", "temperature_2m,rain,weather_code".to_string()),
            ("daily", "temperature_2m_max,temperature_2m_min".to_string()),
            ("timezone", "auto".to_string()),
            ("forecast_days", "2".to_string()),
            ("temperature_unit", temperature_unit.to_string()),
            ("wind_speed_unit", wind_speed_unit.to_string()),
        ]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Response payload
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ForecastResponse {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    timezone: String,
    #[serde(default)]
    timezone_abbreviation: String,
    current: CurrentBlock,
    hourly: HourlyBlock,
    daily: DailyBlock,
}

#[derive(Deserialize)]
struct CurrentBlock {
    time: String,
    temperature_2m: f64,
    apparent_temperature: f64,
    #[serde(default)]
    rain: f64,
    weather_code: u8,
    wind_speed_10m: f64,
    relative_humidity_2m: f64,
}

#[derive(Deserialize)]
struct HourlyBlock {
    time: Vec<String>,
    temperature_2m: Vec<Option<f64>>,
    rain: Vec<Option<f64>>,
    weather_code: Vec<Option<u8>>,
}

#[derive(Deserialize)]
struct DailyBlock {
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    reason: String,
}

fn parse_time(s: &str) -> Result<NaiveDateTime, DomainError> {
    NaiveDateTime::parse_from_str(s, TIME_FORMAT)
        .map_err(|e| DomainError::Parse(format!("bad timestamp '{}': {}", s, e)))
}

/// Map a raw forecast body into a `WeatherReport`.
fn parse_forecast(city: &str, units: Units, body: &str) -> Result<WeatherReport, DomainError> {
    let resp: ForecastResponse = serde_json::from_str(body)
        .map_err(|e| DomainError::Parse(format!("{} payload: {}", PROVIDER, e)))?;

    let now = parse_time(&resp.current.time)?;
    let hours = resp
        .hourly
        .time
        .iter()
        .map(|t| parse_time(t))
        .collect::<Result<Vec<_>, _>>()?;

    let start = hours.iter().position(|t| *t >= now).unwrap_or(hours.len());
    let forecast = (start..hours.len())
        .step_by(FORECAST_STEP_HOURS)
        .filter_map(|i| {
            Some(ForecastEntry {
                time: hours[i],
                temperature: (*resp.hourly.temperature_2m.get(i)?)?,
                weather_code: (*resp.hourly.weather_code.get(i)?)?,
                rain: resp.hourly.rain.get(i).copied().flatten().unwrap_or(0.0),
            })
        })
        .take(FORECAST_POINTS)
        .collect();

    let today_high = resp
        .daily
        .temperature_2m_max
        .first()
        .copied()
        .flatten()
        .ok_or_else(|| DomainError::Parse("missing daily maximum temperature".into()))?;
    let today_low = resp
        .daily
        .temperature_2m_min
        .first()
        .copied()
        .flatten()
        .ok_or_else(|| DomainError::Parse("missing daily minimum temperature".into()))?;

    let timezone = format!("{} {}", resp.timezone, resp.timezone_abbreviation)
        .trim()
        .to_string();

    Ok(WeatherReport {
        city: city.to_string(),
        latitude: resp.latitude,
        longitude: resp.longitude,
        timezone,
        units,
        current: CurrentConditions {
            temperature: resp.current.temperature_2m,
            feels_like: resp.current.apparent_temperature,
            humidity: resp.current.relative_humidity_2m,
            weather_code: resp.current.weather_code,
            wind_speed: resp.current.wind_speed_10m,
            rain: resp.current.rain,
        },
        today_high,
        today_low,
        forecast,
    })
}

#[async_trait::async_trait]
impl SourcePort<WeatherReport> for OpenMeteoClient {
    async fn fetch(&self) -> Result<WeatherReport, DomainError> {
        debug!(city = %self.city, lat = self.latitude, lon = self.longitude, "requesting forecast");

        let response = self
            .client
            .get(FORECAST_URL)
            .query(&self.query())
            .send()
            .await
            .map_err(|e| DomainError::Http(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DomainError::Http(e.to_string()))?;

        if !status.is_success() {
            let reason = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.reason)
                .unwrap_or_else(|_| body.chars().take(200).collect());
            return Err(DomainError::api(PROVIDER, format!("{}: {}", status, reason)));
        }

        parse_forecast(&self.city, self.units, &body)
    }
}
