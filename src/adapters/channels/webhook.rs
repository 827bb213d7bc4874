//! Discord and Slack incoming-webhook channels.
//!
//! Both wrap the briefing in a code block so the column layout survives. Discord caps
//! a message at 2000 characters, so long briefings go out as several posts.

use crate::domain::DomainError;
use crate::ports::{BriefingMessage, NotifierPort};
use reqwest::StatusCode;
use serde_json::{Value, json};
use tracing::debug;

/// Discord's per-message content limit, in characters.
const DISCORD_MAX_CHARS: usize = 2000;
const DISCORD_FENCE_OPEN: &str = "```\n";
const DISCORD_FENCE_CLOSE: &str = "\n```";

async fn post(
    client: &reqwest::Client,
    channel: &str,
    url: &str,
    payload: &Value,
    accepted: &[StatusCode],
) -> Result<(), DomainError> {
    let response = client
        .post(url)
        .json(payload)
        .send()
        .await
        .map_err(|e| DomainError::Delivery(format!("{}: {}", channel, e)))?;

    let status = response.status();
    if accepted.contains(&status) {
        return Ok(());
    }
    let text = response.text().await.unwrap_or_default();
    Err(DomainError::Delivery(format!(
        "{}: {} {}",
        channel,
        status,
        text.chars().take(200).collect::<String>()
    )))
}

// ─────────────────────────────────────────────────────────────────────────────
// Discord
// ─────────────────────────────────────────────────────────────────────────────

pub struct DiscordWebhook {
    client: reqwest::Client,
    url: String,
}

impl DiscordWebhook {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

/// Split `body` into pieces that fit the limit once fenced. Breaks on line boundaries
/// when possible; a single overlong line is cut by characters.
fn discord_chunks(body: &str) -> Vec<String> {
    let budget = DISCORD_MAX_CHARS - DISCORD_FENCE_OPEN.len() - DISCORD_FENCE_CLOSE.len();
    let mut chunks: Vec<Vec<String>> = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut current_len = 0;

    for line in body.lines() {
        let chars: Vec<char> = line.chars().collect();
        let pieces: Vec<String> = if chars.len() > budget {
            chars.chunks(budget).map(|c| c.iter().collect()).collect()
        } else {
            vec![line.to_string()]
        };

        for piece in pieces {
            let piece_len = piece.chars().count();
            // Joining adds one newline per extra line.
            if !current.is_empty() && current_len + 1 + piece_len > budget {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if !current.is_empty() {
                current_len += 1;
            }
            current_len += piece_len;
            current.push(piece);
        }
    }
    if !current.is_empty() || chunks.is_empty() {
        chunks.push(current);
    }

    chunks
        .into_iter()
        .map(|lines| {
            format!(
                "{}{}{}",
                DISCORD_FENCE_OPEN,
                lines.join("\n"),
                DISCORD_FENCE_CLOSE
            )
        })
        .collect()
}

#[async_trait::async_trait]
impl NotifierPort for DiscordWebhook {
    fn name(&self) -> &'static str {
        "discord"
    }

    async fn send(&self, message: &BriefingMessage) -> Result<(), DomainError> {
        let chunks = discord_chunks(&message.body);
        debug!(parts = chunks.len(), "posting briefing to Discord");
        for content in chunks {
            post(
                &self.client,
                self.name(),
                &self.url,
                &json!({ "content": content }),
                &[StatusCode::OK, StatusCode::NO_CONTENT],
            )
            .await?;
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Slack
// ─────────────────────────────────────────────────────────────────────────────

pub struct SlackWebhook {
    client: reqwest::Client,
    url: String,
}

impl SlackWebhook {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

fn slack_payload(body: &str) -> Value {
    json!({ "text": format!("```{}```", body) })
}

#[async_trait::async_trait]
impl NotifierPort for SlackWebhook {
    fn name(&self) -> &'static str {
        "slack"
    }

    async fn send(&self, message: &BriefingMessage) -> Result<(), DomainError> {
        post(
            &self.client,
            self.name(),
            &self.url,
            &slack_payload(&message.body),
            &[StatusCode::OK],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_body_is_one_fenced_chunk() {
        let chunks = discord_chunks("📋 Daily Briefing\n\n🌤️ WEATHER");
        assert_eq!(chunks, vec!["```\n📋 Daily Briefing\n\n🌤️ WEATHER\n```"]);
    }

    #[test]
    fn test_long_body_splits_on_lines_within_limit() {
        let line = "x".repeat(99);
        let body = vec![line.as_str(); 50].join("\n");

        let chunks = discord_chunks(&body);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= DISCORD_MAX_CHARS);
            assert!(chunk.starts_with("```\n") && chunk.ends_with("\n```"));
        }
        let rejoined: Vec<&str> = chunks
            .iter()
            .map(|c| &c[DISCORD_FENCE_OPEN.len()..c.len() - DISCORD_FENCE_CLOSE.len()])
            .collect();
        assert_eq!(rejoined.join("\n"), body);
    }

    #[test]
    fn test_overlong_line_is_cut() {
        let body = "é".repeat(4500);
        let chunks = discord_chunks(&body);
        assert_eq!(chunks.len(), 3);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= DISCORD_MAX_CHARS);
        }
    }

    #[test]
    fn test_slack_payload() {
        assert_eq!(slack_payload("hi"), json!({ "text": "```hi```" }));
    }
}
