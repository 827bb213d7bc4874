//! Wiring & DI. Entry point: load config, build source and channel adapters, inject
//! them into the briefing service, then run once or on the daily schedule.

use clap::{Parser, Subcommand};
use daily_briefing::adapters::channels::{
    ConsoleNotifier, DiscordWebhook, EmailNotifier, SlackWebhook,
};
use daily_briefing::adapters::sources::{
    AlphaVantageClient, MockCalendar, NewsApiClient, OpenMeteoClient,
};
use daily_briefing::domain::{CalendarAgenda, NewsDigest, StockBoard, WeatherReport};
use daily_briefing::ports::{CyclePort, NotifierPort, SourcePort};
use daily_briefing::shared::config::AppConfig;
use daily_briefing::usecases::{
    BriefingAggregator, BriefingService, BriefingSources, DailyScheduler, DeliveryDispatcher,
    SourceRequest, StockWatchlist, run_guarded,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "daily-briefing")]
#[command(
    version,
    about = "Weather, news, stocks and calendar in one daily briefing"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Generate and deliver one briefing now
    Run {
        /// Also print the briefing document as JSON
        #[arg(long)]
        json: bool,
    },
    /// Deliver a briefing every day at the configured times (default)
    Schedule,
    /// Show which sources and channels the configuration enables
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv::dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cfg = AppConfig::load()?;
    let sources = build_sources(&cfg);
    let channels = build_channels(&cfg);

    let command = cli.command.unwrap_or(Command::Schedule);
    if let Command::Check = command {
        print_check(&cfg, &sources, &channels);
        return Ok(());
    }

    let aggregator = BriefingAggregator::new(sources, cfg.source_timeout());
    let console: Arc<dyn NotifierPort> = Arc::new(ConsoleNotifier::stdout());
    let dispatcher = DeliveryDispatcher::new(console, channels, cfg.delivery_timeout());
    let service: Arc<dyn CyclePort> = Arc::new(BriefingService::new(aggregator, dispatcher));

    match command {
        Command::Run { json } => {
            let report = tokio::select! {
                report = run_guarded(service.as_ref()) => report,
                _ = tokio::signal::ctrl_c() => {
                    warn!("interrupted; briefing cycle cancelled");
                    return Ok(());
                }
            };
            let Some(report) = report else {
                anyhow::bail!("briefing cycle aborted by an internal error");
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&report.document)?);
            }
            if !report.delivery.all_delivered() {
                warn!(
                    failed = ?report.delivery.failed,
                    "some channels did not receive the briefing"
                );
            }
        }
        Command::Schedule => {
            let scheduler = DailyScheduler::new(service, cfg.schedule_times_or_default()?)?;
            tokio::select! {
                _ = scheduler.run_loop() => {}
                _ = tokio::signal::ctrl_c() => info!("scheduler stopped"),
            }
        }
        Command::Check => {}
    }

    Ok(())
}

fn build_sources(cfg: &AppConfig) -> BriefingSources {
    let weather = match cfg.weather() {
        Some(settings) => {
            let client: Arc<dyn SourcePort<WeatherReport>> =
                Arc::new(OpenMeteoClient::new(&settings));
            SourceRequest::enabled(client)
        }
        None => SourceRequest::disabled(),
    };
    let news = match cfg.news() {
        Some(settings) => {
            let client: Arc<dyn SourcePort<NewsDigest>> = Arc::new(NewsApiClient::new(&settings));
            SourceRequest::enabled(client)
        }
        None => SourceRequest::missing_api_key(),
    };
    let stocks = match cfg.stocks() {
        Some(settings) => {
            let quotes = Arc::new(AlphaVantageClient::new(settings.api_key));
            let watchlist: Arc<dyn SourcePort<StockBoard>> =
                Arc::new(StockWatchlist::new(quotes, settings.symbols));
            SourceRequest::enabled(watchlist)
        }
        None => SourceRequest::missing_api_key(),
    };
    let calendar = if cfg.calendar_enabled() {
        let client: Arc<dyn SourcePort<CalendarAgenda>> = Arc::new(MockCalendar::new());
        SourceRequest::enabled(client)
    } else {
        SourceRequest::disabled()
    };

    BriefingSources {
        weather,
        news,
        stocks,
        calendar,
    }
}

/// External channels. A channel that cannot be constructed is logged and skipped.
fn build_channels(cfg: &AppConfig) -> Vec<Arc<dyn NotifierPort>> {
    let mut channels: Vec<Arc<dyn NotifierPort>> = Vec::new();

    if let Some(settings) = cfg.email() {
        match EmailNotifier::new(&settings) {
            Ok(email) => channels.push(Arc::new(email)),
            Err(e) => warn!(error = %e, "email channel disabled"),
        }
    }
    if let Some(url) = cfg.discord_webhook_url() {
        channels.push(Arc::new(DiscordWebhook::new(url)));
    }
    if let Some(url) = cfg.slack_webhook_url() {
        channels.push(Arc::new(SlackWebhook::new(url)));
    }
    channels
}

fn print_check(cfg: &AppConfig, sources: &BriefingSources, channels: &[Arc<dyn NotifierPort>]) {
    let status = |enabled: bool| if enabled { "enabled" } else { "off" };

    println!("Sources ({} of 4 enabled)", sources.enabled_count());
    println!("  weather   {}", status(sources.weather.is_enabled()));
    println!("  news      {}", status(sources.news.is_enabled()));
    match cfg.stocks() {
        Some(stocks) => println!("  stocks    enabled [{}]", stocks.symbols.join(", ")),
        None => println!("  stocks    off"),
    }
    println!("  calendar  {}", status(sources.calendar.is_enabled()));

    let names: Vec<&str> = std::iter::once("console")
        .chain(channels.iter().map(|c| c.name()))
        .collect();
    println!("Channels: {}", names.join(", "));

    match cfg.schedule_times_or_default() {
        Ok(times) => {
            let times: Vec<String> = times
                .iter()
                .map(|t| t.format("%H:%M").to_string())
                .collect();
            println!("Schedule: {}", times.join(", "));
        }
        Err(e) => println!("Schedule: {}", e),
    }
}
