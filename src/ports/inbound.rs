//! Inbound port. The scheduler and CLI call into the application.

use crate::usecases::CycleReport;

/// "Run one briefing cycle now." No parameters; everything else is wired at construction.
#[async_trait::async_trait]
pub trait CyclePort: Send + Sync {
    async fn run_cycle(&self) -> CycleReport;
}
