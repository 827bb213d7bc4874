//! Console channel. Writes the briefing to stdout (or any writer) between `=` rules.

use crate::domain::DomainError;
use crate::ports::{BriefingMessage, NotifierPort};
use std::io::{Stdout, Write};
use std::sync::Mutex;

const FRAME_WIDTH: usize = 60;

pub struct ConsoleNotifier<W: Write + Send = Stdout> {
    out: Mutex<W>,
}

impl ConsoleNotifier<Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ConsoleNotifier<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_framed(&self, message: &BriefingMessage) -> std::io::Result<()> {
        let rule = "=".repeat(FRAME_WIDTH);
        let mut out = self
            .out
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        writeln!(out)?;
        writeln!(out, "{}", rule)?;
        writeln!(out, "{:^width$}", "DAILY BRIEFING", width = FRAME_WIDTH)?;
        writeln!(out, "{}", rule)?;
        writeln!(out, "{}", message.body)?;
        writeln!(out, "{}", rule)?;
        out.flush()
    }
}

#[async_trait::async_trait]
impl<W: Write + Send + 'static> NotifierPort for ConsoleNotifier<W> {
    fn name(&self) -> &'static str {
        "console"
    }

    async fn send(&self, message: &BriefingMessage) -> Result<(), DomainError> {
        self.write_framed(message)
            .map_err(|e| DomainError::Delivery(format!("console: {}", e)))
    }
}
