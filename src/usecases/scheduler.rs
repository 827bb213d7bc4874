//! Daily scheduler: run a briefing cycle at fixed local times, forever.
//!
//! Waits in steps of at most a minute and re-reads the wall clock after each step, so a
//! host suspend or clock change is noticed. A run that is found more than a few minutes
//! late (machine asleep, process stalled) is skipped, never caught up.

use crate::domain::DomainError;
use crate::ports::CyclePort;
use crate::usecases::CycleReport;
use crate::usecases::aggregator::panic_message;
use chrono::{DateTime, Days, Local, NaiveTime, TimeDelta, TimeZone};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Default run time when none is configured.
pub const DEFAULT_SCHEDULE: &str = "08:00";

/// Longest single sleep before the wall clock is checked again.
const POLL_INTERVAL: Duration = Duration::from_secs(60);

/// A run found later than this after its scheduled time is skipped.
const MAX_LATENESS: TimeDelta = TimeDelta::minutes(5);

type Clock = Box<dyn Fn() -> DateTime<Local> + Send + Sync>;

pub struct DailyScheduler {
    runner: Arc<dyn CyclePort>,
    times: Vec<NaiveTime>,
    clock: Clock,
}

impl DailyScheduler {
    /// `times` must not be empty.
    pub fn new(runner: Arc<dyn CyclePort>, times: Vec<NaiveTime>) -> Result<Self, DomainError> {
        if times.is_empty() {
            return Err(DomainError::Config("no schedule times configured".into()));
        }
        Ok(Self {
            runner,
            times,
            clock: Box::new(Local::now),
        })
    }

    /// Replace the wall clock consulted between sleeps.
    pub fn with_clock(
        mut self,
        clock: impl Fn() -> DateTime<Local> + Send + Sync + 'static,
    ) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Run until the process stops. A cycle that panics is logged and the loop goes on.
    pub async fn run_loop(&self) {
        let times: Vec<String> = self
            .times
            .iter()
            .map(|t| t.format("%H:%M").to_string())
            .collect();
        info!(times = ?times, "daily briefing scheduler started");

        loop {
            let now = (self.clock)();
            let Some(next) = next_occurrence(&now, &self.times) else {
                error!("could not resolve the next run time; scheduler stopping");
                return;
            };
            info!(
                next = %next.format("%Y-%m-%d %H:%M %Z"),
                wait_secs = (next - now).num_seconds(),
                "next briefing scheduled"
            );

            let late = self.wait_until(&next).await;
            if late > MAX_LATENESS {
                warn!(
                    scheduled = %next.format("%Y-%m-%d %H:%M %Z"),
                    late_secs = late.num_seconds(),
                    "scheduled briefing missed; skipping"
                );
                continue;
            }

            self.run_once().await;
        }
    }

    /// Sleep until the wall clock reaches `next`; returns how late it was on waking.
    async fn wait_until(&self, next: &DateTime<Local>) -> TimeDelta {
        loop {
            let now = (self.clock)();
            if now >= *next {
                return now - *next;
            }
            let remaining = (*next - now).to_std().unwrap_or_default();
            tokio::time::sleep(remaining.min(POLL_INTERVAL)).await;
        }
    }

    async fn run_once(&self) {
        if let Some(report) = run_guarded(self.runner.as_ref()).await {
            info!(
                date = %report.document.date(),
                delivered = report.delivery.delivered.len(),
                "scheduled briefing done"
            );
        }
    }
}

/// Run one cycle; a panic inside it is logged here and yields `None`.
pub async fn run_guarded(runner: &dyn CyclePort) -> Option<CycleReport> {
    match AssertUnwindSafe(runner.run_cycle()).catch_unwind().await {
        Ok(report) => Some(report),
        Err(panic) => {
            error!(
                reason = panic_message(&*panic),
                "briefing cycle aborted by an internal error"
            );
            None
        }
    }
}

/// Parse a comma-separated list of `HH:MM` times. Result is sorted and deduplicated.
pub fn parse_times(raw: &str) -> Result<Vec<NaiveTime>, DomainError> {
    let mut times = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            NaiveTime::parse_from_str(s, "%H:%M")
                .map_err(|e| DomainError::Config(format!("invalid schedule time '{}': {}", s, e)))
        })
        .collect::<Result<Vec<_>, _>>()?;
    times.sort();
    times.dedup();
    if times.is_empty() {
        return Err(DomainError::Config("no schedule times configured".into()));
    }
    Ok(times)
}

/// First instant strictly after `now` whose local time is one of `times`.
///
/// A local time skipped by a DST jump moves to the next day it exists; a repeated one
/// uses the earlier instant.
pub fn next_occurrence<Tz: TimeZone>(
    now: &DateTime<Tz>,
    times: &[NaiveTime],
) -> Option<DateTime<Tz>> {
    let mut sorted = times.to_vec();
    sorted.sort();
    let today = now.date_naive();
    let tz = now.timezone();

    for offset in 0..=2u64 {
        let day = today.checked_add_days(Days::new(offset))?;
        for t in &sorted {
            let candidate = tz.from_local_datetime(&day.and_time(*t)).earliest();
            if let Some(candidate) = candidate {
                if candidate > *now {
                    return Some(candidate);
                }
            }
        }
    }
    None
}
