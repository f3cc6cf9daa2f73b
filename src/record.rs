//! @ai:module:intent Split result log lines and extract metric records
//! @ai:module:layer domain
//! @ai:module:public_api LogLine, MetricRecord, DEFAULT_MARKER_PREFIX, DEFAULT_AGGREGATE_CATEGORY
//! @ai:module:stateless true

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Leading-token prefix of the rows compared by default (`trec_eval` mean average precision).
pub const DEFAULT_MARKER_PREFIX: &str = "map";

/// Category label of the rolled-up row that is never compared.
pub const DEFAULT_AGGREGATE_CATEGORY: &str = "all";

const FIELD_SEPARATOR: char = '\t';

/// @ai:intent One line of a result log, split into tab-separated fields
/// @ai:effects pure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLine<'a> {
    raw: &'a str,
}

impl<'a> LogLine<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self { raw }
    }

    /// @ai:intent Tab-separated fields, in order
    pub fn fields(&self) -> Vec<&'a str> {
        self.raw.split(FIELD_SEPARATOR).collect()
    }

    /// @ai:intent Check whether the leading field starts with the marker prefix
    /// @ai:effects pure
    pub fn is_metric_row(&self, marker_prefix: &str) -> bool {
        self.raw
            .split(FIELD_SEPARATOR)
            .next()
            .map(|first| first.starts_with(marker_prefix))
            .unwrap_or(false)
    }

    /// @ai:intent Category label at field index 1
    /// @ai:pre line is a metric row
    pub fn category(&self, line: usize) -> Result<&'a str> {
        self.raw
            .split(FIELD_SEPARATOR)
            .nth(1)
            .ok_or_else(|| Error::Parse {
                line,
                message: "metric row has no category field".to_string(),
            })
    }
}

/// @ai:intent A category and its metric value, taken from a metric row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub category: String,
    pub value: f64,
}

impl MetricRecord {
    /// @ai:intent Build a record from a metric row (marker, category, ..., value)
    /// @ai:pre line is a metric row
    /// @ai:post value is the parsed final field
    /// @ai:effects pure
    pub fn from_line(log_line: &LogLine<'_>, line: usize) -> Result<Self> {
        let fields = log_line.fields();

        if fields.len() < 3 {
            return Err(Error::Parse {
                line,
                message: format!(
                    "expected at least 3 tab-separated fields, found {}",
                    fields.len()
                ),
            });
        }

        Ok(Self {
            category: fields[1].to_string(),
            value: parse_value(fields[fields.len() - 1], line)?,
        })
    }
}

/// @ai:intent Parse a value token, tolerating the trailing newline and padding
/// @ai:effects pure
fn parse_value(token: &str, line: usize) -> Result<f64> {
    let trimmed = token.trim();

    trimmed.parse::<f64>().map_err(|e| Error::Parse {
        line,
        message: format!("invalid value token {:?}: {}", trimmed, e),
    })
}
