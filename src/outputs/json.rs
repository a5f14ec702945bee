//! JSON output of ticker reports.
//!
//! Reports are grouped by the UTC date they were generated on:
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── AAPL.json
//!     └── TSLA.json
//! ```
//! A later run on the same day overwrites that ticker's file.

use std::error::Error;
use std::path::PathBuf;

use tokio::fs;
use tracing::{error, info, instrument};

use crate::outputs::report::TickerReport;
use crate::utils::ensure_writable_dir;

/// Write `report` as JSON under `json_output_dir`, returning the file path.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir, ticker = %report.ticker))]
pub async fn write_report(
    report: &TickerReport,
    json_output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;

    let full_json_dir = format!(
        "{}/{}",
        json_output_dir.trim_end_matches('/'),
        report.generated_at.date_naive()
    );

    info!(%full_json_dir, "Ensuring JSON directory exists");
    if let Err(e) = ensure_writable_dir(&full_json_dir).await {
        error!(%full_json_dir, error = %e, "JSON output directory is not writable");
        return Err(e);
    }

    let path = PathBuf::from(&full_json_dir).join(format!("{}.json", report.ticker));
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote JSON report");

    Ok(path)
}
