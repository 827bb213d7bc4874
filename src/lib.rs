//! daily-briefing: weather, news, stocks and calendar aggregated into one daily
//! briefing and delivered to console, email and webhooks. Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
