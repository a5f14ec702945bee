//! # Headline Sentiment
//!
//! Terminal front end for the headline sentiment pipeline. It scrapes the
//! configured news sources, scores every accepted headline, and prints a
//! report for one stock ticker: counts per sentiment, the share of negative
//! headlines, an hourly polarity trend and the matching headlines themselves.
//!
//! ## Usage
//!
//! ```sh
//! headline_sentiment -t AAPL
//! headline_sentiment -t TSLA -j ./json --watch 300
//! ```

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;

use cli::Cli;
use headline_sentiment::outputs::report::{TickerReport, render_text};
use headline_sentiment::outputs::json;
use headline_sentiment::{AppConfig, NewsPipeline, filter_by_ticker};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    info!("headline_sentiment starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // ---- Configuration ----
    let mut config = AppConfig::load(args.config.as_deref())?;
    if !args.urls.is_empty() {
        config = config.with_sources(args.urls.clone())?;
    }
    if let Some(timeout_secs) = args.timeout_secs {
        config.settings.timeout_secs = timeout_secs;
    }
    if let Some(ttl) = args.cache_ttl_secs {
        config.settings.cache_ttl_secs = ttl;
    }
    config.validate()?;

    if args.list_tickers {
        for (symbol, keywords) in config.tickers.iter() {
            println!("{:<6} {}", symbol, keywords.join(", "));
        }
        return Ok(());
    }

    let ticker = match args.ticker.as_deref() {
        Some(requested) => config.resolve_ticker(requested)?,
        None => match config.default_ticker() {
            Some(symbol) => symbol.to_string(),
            None => {
                error!("No tickers configured");
                return Err("no tickers configured".into());
            }
        },
    };
    let keywords = config.tickers.keywords(&ticker).unwrap_or_default().to_vec();
    info!(%ticker, ?keywords, sources = config.sources.len(), "Selected analysis target");

    // ---- Pipeline ----
    let pipeline = NewsPipeline::from_settings(&config.settings)?;

    let mut runs = 0usize;
    loop {
        runs += 1;
        info!(run = runs, %ticker, "Acquiring and analyzing news");
        let dataset = pipeline.analyze(&config.sources).await;

        let filtered = filter_by_ticker(dataset.records(), &ticker, &config.tickers);
        let report = TickerReport::build(
            &ticker,
            &keywords,
            filtered,
            &dataset,
            chrono::Utc::now(),
        );
        println!("{}", render_text(&report));

        if let Some(dir) = args.json_output_dir.as_deref() {
            if let Err(e) = json::write_report(&report, dir).await {
                error!(error = %e, "Failed to write JSON report");
            }
        }

        let Some(every) = args.watch else {
            break;
        };
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(every.max(1))) => {}
            _ = tokio::signal::ctrl_c() => {
                warn!("Interrupted; stopping watch loop");
                break;
            }
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        runs,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
