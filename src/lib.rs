//! @ai:module:intent Compare per-category metric rows of two aligned result logs
//! @ai:module:layer application
//! @ai:module:public_api comparator, config, error, loader, output, record
//! @ai:module:stateless true
//!
//! # map-compare
//!
//! Walks a baseline and a comparison `trec_eval -q` log in lockstep, classifies
//! each per-query `map` row as better, worse or unchanged, and reports the ratio
//! of improvements to regressions.
//!
//! ## Example
//!
//! ```rust
//! use map_compare::{format_report, MetricComparator, OutputFormat};
//!
//! let baseline = ["map\t101\t0.50", "map\tall\t0.50"];
//! let comparison = ["map\t101\t0.60", "map\tall\t0.60"];
//!
//! let report = MetricComparator::default().compare(&baseline, &comparison).unwrap();
//! assert_eq!(
//!     format_report(&report, OutputFormat::Text).unwrap(),
//!     "101\nbetter\n0.2\n1.0\n"
//! );
//! ```

pub mod comparator;
pub mod config;
pub mod error;
pub mod loader;
pub mod output;
pub mod record;

pub use comparator::{
    CompareOptions, ComparisonReport, ComparisonResult, MetricComparator, Summary, Verdict,
    WORSE_COUNT_FLOOR,
};
pub use config::CompareConfig;
pub use error::{Error, Result};
pub use loader::{load_pair, read_lines, LogPair};
pub use output::{format_float, format_report, OutputFormat};
pub use record::{LogLine, MetricRecord, DEFAULT_AGGREGATE_CATEGORY, DEFAULT_MARKER_PREFIX};
