//! Infrastructure adapters. Implement outbound ports.
//!
//! Provider APIs and delivery transports. Map errors to DomainError.

pub mod channels;
pub mod sources;
