//! NewsAPI adapter. Implements `SourcePort<NewsDigest>` via `/v2/top-headlines`.

use crate::domain::{Article, DomainError, NewsDigest};
use crate::ports::SourcePort;
use crate::shared::config::NewsSettings;
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use tracing::debug;

const TOP_HEADLINES_URL: &str = "https://newsapi.org/v2/top-headlines";
const PROVIDER: &str = "NewsAPI";
const PAGE_SIZE: &str = "10";
/// NewsAPI rejects requests without a user agent.
const CLIENT_AGENT: &str = concat!("daily-briefing/", env!("CARGO_PKG_VERSION"));
/// Headlines kept in the briefing.
const TOP_ARTICLES: usize = 5;

pub struct NewsApiClient {
    client: reqwest::Client,
    api_key: String,
    country: String,
    category: String,
}

impl NewsApiClient {
    pub fn new(settings: &NewsSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: settings.api_key.clone(),
            country: settings.country.clone(),
            category: settings.category.clone(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HeadlinesResponse {
    status: String,
    #[serde(default)]
    total_results: u64,
    #[serde(default)]
    articles: Vec<RawArticle>,
    code: Option<String>,
    message: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    #[serde(default)]
    source: RawSource,
    author: Option<String>,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
}

#[derive(Deserialize, Default)]
struct RawSource {
    name: Option<String>,
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// "general" -> "General".
fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn parse_headlines(body: &str, country: &str, category: &str) -> Result<NewsDigest, DomainError> {
    let resp: HeadlinesResponse = serde_json::from_str(body)
        .map_err(|e| DomainError::Parse(format!("{} payload: {}", PROVIDER, e)))?;

    if resp.status != "ok" {
        let message = resp
            .message
            .or(resp.code)
            .unwrap_or_else(|| format!("status '{}'", resp.status));
        return Err(DomainError::api(PROVIDER, message));
    }

    let articles = resp
        .articles
        .into_iter()
        .take(TOP_ARTICLES)
        .map(|a| Article {
            title: non_empty(a.title).unwrap_or_else(|| "No title".to_string()),
            description: non_empty(a.description),
            source: non_empty(a.source.name).unwrap_or_else(|| "Unknown".to_string()),
            url: a.url.unwrap_or_default(),
            published_at: non_empty(a.published_at),
            author: non_empty(a.author),
        })
        .collect();

    Ok(NewsDigest {
        total_results: resp.total_results,
        category: title_case(category),
        country: country.to_uppercase(),
        articles,
    })
}

#[async_trait::async_trait]
impl SourcePort<NewsDigest> for NewsApiClient {
    async fn fetch(&self) -> Result<NewsDigest, DomainError> {
        debug!(country = %self.country, category = %self.category, "requesting headlines");

        let response = self
            .client
            .get(TOP_HEADLINES_URL)
            .header("X-Api-Key", &self.api_key)
            .header(USER_AGENT, CLIENT_AGENT)
            .query(&[
                ("country", self.country.as_str()),
                ("category", self.category.as_str()),
                ("pageSize", PAGE_SIZE),
            ])
            .send()
            .await
            .map_err(|e| DomainError::Http(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DomainError::Http(e.to_string()))?;

        if !status.is_success() {
            // Error bodies are JSON with a message; fall back to the raw text.
            return match parse_headlines(&body, &self.country, &self.category) {
                Err(DomainError::Api { message, .. }) => {
                    Err(DomainError::api(PROVIDER, format!("{}: {}", status, message)))
                }
                _ => Err(DomainError::api(
                    PROVIDER,
                    format!("{}: {}", status, body.chars().take(200).collect::<String>()),
                )),
            };
        }

        parse_headlines(&body, &self.country, &self.category)
    }
}
