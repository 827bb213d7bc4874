//! Briefing source adapters. Each owns its HTTP client and implements a source port.

pub mod alpha_vantage;
pub mod mock_calendar;
pub mod news_api;
pub mod open_meteo;

pub use alpha_vantage::AlphaVantageClient;
pub use mock_calendar::MockCalendar;
pub use news_api::NewsApiClient;
pub use open_meteo::OpenMeteoClient;
