//! Presentation-side outputs built from the pipeline's datasets.
//!
//! # Submodules
//!
//! - [`report`]: derived per-ticker metrics and the terminal rendering
//! - [`json`]: writes reports to dated JSON files
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! ├── 2025-05-06/
//! │   ├── AAPL.json
//! │   └── TSLA.json
//! ```

pub mod json;
pub mod report;
