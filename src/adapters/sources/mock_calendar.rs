//! Placeholder calendar. Returns a fixed agenda for today until a real provider is wired in.

use crate::domain::{CalendarAgenda, CalendarEvent, DomainError};
use crate::ports::SourcePort;
use chrono::{Local, NaiveTime};

const NOTE: &str = "Mock calendar data. Connect a calendar provider for real events.";

#[derive(Default)]
pub struct MockCalendar;

impl MockCalendar {
    pub fn new() -> Self {
        Self
    }
}

fn event(
    title: &str,
    (hour, minute): (u32, u32),
    duration_minutes: u32,
    location: &str,
    attendees: &[&str],
) -> Result<CalendarEvent, DomainError> {
    let start = NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| DomainError::Parse(format!("invalid start {:02}:{:02}", hour, minute)))?;
    Ok(CalendarEvent {
        title: title.to_string(),
        start,
        duration_minutes,
        location: Some(location.to_string()),
        attendees: attendees.iter().map(|a| a.to_string()).collect(),
    })
}

#[async_trait::async_trait]
impl SourcePort<CalendarAgenda> for MockCalendar {
    async fn fetch(&self) -> Result<CalendarAgenda, DomainError> {
        let events = vec![
            event(
                "Morning Standup",
                (9, 0),
                30,
                "Conference Room A",
                &["team@company.com"],
            )?,
            event(
                "Project Review Meeting",
                (14, 0),
                60,
                "Zoom",
                &["manager@company.com", "colleague@company.com"],
            )?,
            event("Doctor Appointment", (16, 30), 45, "Medical Center", &[])?,
        ];

        Ok(CalendarAgenda {
            date: Local::now().date_naive(),
            events,
            note: Some(NOTE.to_string()),
        })
    }
}
