//! Port traits. API boundaries for the hexagon.
//!
//! - Inbound: Called by scheduler/CLI into the application
//! - Outbound: Called by application into infrastructure

pub mod inbound;
pub mod outbound;

pub use inbound::CyclePort;
pub use outbound::{BriefingMessage, NotifierPort, QuotePort, SourcePort};
