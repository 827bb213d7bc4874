//! Briefing formatter. Pure mapping from `BriefingDocument` to display text.
//!
//! Only successful slots get a body section. Unavailable sources, failed sources and
//! failed stock symbols are listed in the trailing NOTES block.

use crate::domain::{
    BriefingDocument, CalendarAgenda, NewsDigest, SourceResult, StockBoard, WeatherReport, wmo,
};
use crate::ports::BriefingMessage;

const RULE: &str = "--------------------";
const DESCRIPTION_MAX_CHARS: usize = 100;

/// Subject line and body for one document.
pub fn compose(doc: &BriefingDocument) -> BriefingMessage {
    BriefingMessage {
        subject: subject(doc),
        body: format_briefing(doc),
    }
}

pub fn subject(doc: &BriefingDocument) -> String {
    format!("Daily Briefing - {}", doc.date())
}

pub fn format_briefing(doc: &BriefingDocument) -> String {
    let mut out = Vec::new();

    out.push(format!("📋 Daily Briefing for {}", doc.date()));
    out.push(String::new());

    if let Some(SourceResult::Success(weather)) = doc.weather() {
        weather_section(&mut out, weather);
    }
    if let Some(SourceResult::Success(news)) = doc.news() {
        news_section(&mut out, news);
    }
    if let Some(SourceResult::Success(board)) = doc.stocks() {
        stocks_section(&mut out, board);
    }
    if let Some(SourceResult::Success(agenda)) = doc.calendar() {
        calendar_section(&mut out, agenda);
    }

    let notes = notes(doc);
    if !notes.is_empty() {
        out.push("⚠️ NOTES".to_string());
        out.push(RULE.to_string());
        for note in notes {
            out.push(format!("• {}", note));
        }
        out.push(String::new());
    }

    out.join("\n")
}

fn weather_section(out: &mut Vec<String>, w: &WeatherReport) {
    let t = w.units.temperature_symbol();
    let c = &w.current;

    out.push("🌤️ WEATHER".to_string());
    out.push(RULE.to_string());
    out.push(format!(
        "📍 {} ({})",
        w.city,
        coordinates(w.latitude, w.longitude)
    ));
    out.push(format!(
        "🌡️ {:.1}{t} (feels like {:.1}{t})",
        c.temperature, c.feels_like
    ));
    out.push(format!(
        "📊 High: {:.1}{t} | Low: {:.1}{t}",
        w.today_high, w.today_low
    ));
    out.push(format!(
        "{} {}",
        wmo::icon(c.weather_code),
        wmo::description(c.weather_code)
    ));
    out.push(format!(
        "💨 Wind: {:.1} {}",
        c.wind_speed,
        w.units.wind_symbol()
    ));
    out.push(format!("💧 Humidity: {:.0}%", c.humidity));
    if c.rain > 0.0 {
        out.push(format!("🌧️ Rain: {:.1} mm", c.rain));
    }
    out.push(String::new());

    if !w.forecast.is_empty() {
        out.push("📈 Next 12 Hours:".to_string());
        for f in &w.forecast {
            let rain = if f.rain > 0.0 {
                format!(" | {:.1} mm", f.rain)
            } else {
                String::new()
            };
            out.push(format!(
                "  {}: {:.1}{t} - {}{}",
                f.time.format("%H:%M"),
                f.temperature,
                wmo::description(f.weather_code),
                rain
            ));
        }
        out.push(String::new());
    }
}

fn news_section(out: &mut Vec<String>, news: &NewsDigest) {
    out.push("📰 NEWS HIGHLIGHTS".to_string());
    out.push(RULE.to_string());
    if news.articles.is_empty() {
        out.push("No headlines available".to_string());
        out.push(String::new());
        return;
    }
    for (i, article) in news.articles.iter().enumerate() {
        out.push(format!("{}. {}", i + 1, article.title));
        out.push(format!("   Source: {}", article.source));
        if let Some(desc) = article.description.as_deref() {
            out.push(format!("   {}", truncate(desc, DESCRIPTION_MAX_CHARS)));
        }
        out.push(String::new());
    }
}

fn stocks_section(out: &mut Vec<String>, board: &StockBoard) {
    out.push("📈 STOCK PRICES".to_string());
    out.push(RULE.to_string());
    let mut any = false;
    for q in board.quotes() {
        any = true;
        let arrow = if q.is_positive() { "📈" } else { "📉" };
        out.push(format!(
            "{} {}: ${:.2} ({}, {:+.2}%)",
            arrow,
            q.symbol,
            q.price,
            signed_dollars(q.change),
            q.change_percent
        ));
    }
    if !any {
        out.push("No quotes available".to_string());
    }
    out.push(String::new());
}

fn calendar_section(out: &mut Vec<String>, agenda: &CalendarAgenda) {
    out.push("📅 TODAY'S SCHEDULE".to_string());
    out.push(RULE.to_string());
    let events = agenda.chronological();
    if events.is_empty() {
        out.push("No events scheduled for today".to_string());
    }
    for e in events {
        let location = e
            .location
            .as_deref()
            .map(|l| format!(" @ {}", l))
            .unwrap_or_default();
        out.push(format!(
            "🕐 {}: {}{}",
            e.start.format("%I:%M %p"),
            e.title,
            location
        ));
    }
    out.push(String::new());
}

/// Unavailable sources, then failed sources, then failed stock symbols; each in slot order.
fn notes(doc: &BriefingDocument) -> Vec<String> {
    let mut notes: Vec<String> = doc.warnings().iter().map(|w| w.to_string()).collect();
    for (source, failure) in doc.failures() {
        notes.push(format!("{}: {}", source, failure));
    }
    if let Some(SourceResult::Success(board)) = doc.stocks() {
        for (symbol, error) in board.failed_symbols() {
            notes.push(format!("Stocks: {}: {}", symbol, error));
        }
    }
    notes
}

fn coordinates(lat: f64, lon: f64) -> String {
    let ns = if lat >= 0.0 { 'N' } else { 'S' };
    let ew = if lon >= 0.0 { 'E' } else { 'W' };
    format!("{:.2}°{}, {:.2}°{}", lat.abs(), ns, lon.abs(), ew)
}

fn signed_dollars(amount: f64) -> String {
    let sign = if amount >= 0.0 { '+' } else { '-' };
    format!("{}${:.2}", sign, amount.abs())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}
