//! Command-line interface definitions for Headline Sentiment.
//!
//! All options can be given as flags; most also read an environment variable.

use clap::Parser;

/// Command-line arguments for the Headline Sentiment report.
///
/// # Examples
///
/// ```sh
/// # Report on the default ticker using the built-in sources
/// headline_sentiment
///
/// # Tesla, two custom sources, also writing JSON
/// headline_sentiment -t TSLA -u https://www.cnbc.com/finance/ -u https://example.com/news -j ./json
///
/// # Re-render every 5 minutes; the dataset refreshes once the cache TTL runs out
/// headline_sentiment --watch 300
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Ticker symbol to report on (defaults to the first configured ticker)
    #[arg(short, long, env = "HEADLINE_TICKER")]
    pub ticker: Option<String>,

    /// News source URL; repeat to give several (overrides configured sources)
    #[arg(short = 'u', long = "url")]
    pub urls: Vec<String>,

    /// Optional path to a YAML config file
    #[arg(short, long, env = "HEADLINE_CONFIG")]
    pub config: Option<String>,

    /// Output directory for JSON reports
    #[arg(short, long, env = "HEADLINE_JSON_DIR")]
    pub json_output_dir: Option<String>,

    /// Per-request timeout in seconds (overrides config)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// How long fetched headlines are reused, in seconds (overrides config)
    #[arg(long)]
    pub cache_ttl_secs: Option<u64>,

    /// Re-render the report every N seconds until interrupted
    #[arg(long, value_name = "SECS")]
    pub watch: Option<u64>,

    /// Print the configured tickers and their keywords, then exit
    #[arg(long)]
    pub list_tickers: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["headline_sentiment"]);
        assert!(cli.urls.is_empty());
        assert!(cli.watch.is_none());
        assert!(!cli.list_tickers);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "headline_sentiment",
            "-t",
            "TSLA",
            "-u",
            "https://a.example/",
            "-u",
            "https://b.example/",
            "-j",
            "/tmp/json",
        ]);

        assert_eq!(cli.ticker.as_deref(), Some("TSLA"));
        assert_eq!(cli.urls, vec!["https://a.example/", "https://b.example/"]);
        assert_eq!(cli.json_output_dir.as_deref(), Some("/tmp/json"));
    }

    #[test]
    fn test_cli_long_flags() {
        let cli = Cli::parse_from([
            "headline_sentiment",
            "--timeout-secs",
            "3",
            "--cache-ttl-secs",
            "60",
            "--watch",
            "300",
            "--list-tickers",
        ]);

        assert_eq!(cli.timeout_secs, Some(3));
        assert_eq!(cli.cache_ttl_secs, Some(60));
        assert_eq!(cli.watch, Some(300));
        assert!(cli.list_tickers);
    }
}
