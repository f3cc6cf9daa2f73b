//! @ai:module:intent Compare two aligned result logs row by row and tally improvements
//! @ai:module:layer application
//! @ai:module:public_api MetricComparator, CompareOptions, ComparisonReport, ComparisonResult, Summary, Verdict
//! @ai:module:depends_on record
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::record::{LogLine, MetricRecord, DEFAULT_AGGREGATE_CATEGORY, DEFAULT_MARKER_PREFIX};
use serde::{Deserialize, Serialize};

/// Value `worse_count` is raised to when no row got worse, so the ratio stays defined.
pub const WORSE_COUNT_FLOOR: f64 = 1.0;

/// @ai:intent Direction of change of one category between the two runs
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Better,
    Worse,
    Unchanged,
}

impl Verdict {
    /// @ai:intent Classify a baseline/comparison value pair
    /// @ai:effects pure
    pub fn classify(baseline_value: f64, comparison_value: f64) -> Self {
        if baseline_value > comparison_value {
            Verdict::Worse
        } else if comparison_value > baseline_value {
            Verdict::Better
        } else {
            Verdict::Unchanged
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Better => "better",
            Verdict::Worse => "worse",
            Verdict::Unchanged => "unchanged",
        }
    }
}

/// @ai:intent Comparison of one category at one line position
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparisonResult {
    /// 1-based line number shared by both files
    pub line: usize,
    pub category: String,
    pub baseline_value: f64,
    pub comparison_value: f64,
    pub relative_delta: f64,
    pub verdict: Verdict,
}

/// @ai:intent Running improvement/regression tallies and their ratio
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub better_count: f64,
    /// Floored to `WORSE_COUNT_FLOOR` once the walk ends, so 1.0 may mean no regressions.
    /// Count `Verdict::Worse` results for the real number.
    pub worse_count: f64,
    pub unchanged_count: f64,
    pub ratio: f64,
}

impl Summary {
    fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Better => self.better_count += 1.0,
            Verdict::Worse => self.worse_count += 1.0,
            Verdict::Unchanged => self.unchanged_count += 1.0,
        }
    }

    /// @ai:intent Compute the better/worse ratio once all rows are tallied
    /// @ai:post worse_count >= WORSE_COUNT_FLOOR
    fn finish(&mut self) {
        if self.worse_count == 0.0 {
            self.worse_count = WORSE_COUNT_FLOOR;
        }
        self.ratio = self.better_count / self.worse_count;
    }
}

/// @ai:intent Full result of comparing two result logs
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ComparisonReport {
    pub metric: String,
    pub results: Vec<ComparisonResult>,
    pub summary: Summary,
}

impl ComparisonReport {
    /// @ai:intent Check whether any category regressed
    pub fn has_regressions(&self) -> bool {
        self.results.iter().any(|r| r.verdict == Verdict::Worse)
    }
}

/// @ai:intent Options selecting which rows are compared and how strictly lines are paired
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareOptions {
    pub marker_prefix: String,
    pub aggregate_category: String,
    /// Require the comparison line to carry the same marker and category.
    pub strict: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            marker_prefix: DEFAULT_MARKER_PREFIX.to_string(),
            aggregate_category: DEFAULT_AGGREGATE_CATEGORY.to_string(),
            strict: false,
        }
    }
}

/// @ai:intent Walks baseline and comparison lines in lockstep and classifies metric rows
#[derive(Debug, Clone, Default)]
pub struct MetricComparator {
    options: CompareOptions,
}

impl MetricComparator {
    /// @ai:intent Create a comparator with the given options
    /// @ai:effects pure
    pub fn new(options: CompareOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompareOptions {
        &self.options
    }

    /// @ai:intent Compare two equal-length line sequences
    /// @ai:pre baseline_lines.len() == comparison_lines.len()
    /// @ai:post summary.worse_count >= 1.0
    /// @ai:effects pure
    /// @ai:idempotent true
    pub fn compare<B, C>(
        &self,
        baseline_lines: &[B],
        comparison_lines: &[C],
    ) -> Result<ComparisonReport>
    where
        B: AsRef<str>,
        C: AsRef<str>,
    {
        if baseline_lines.len() != comparison_lines.len() {
            return Err(Error::LengthMismatch {
                baseline: baseline_lines.len(),
                comparison: comparison_lines.len(),
            });
        }

        let mut report = ComparisonReport {
            metric: self.options.marker_prefix.clone(),
            ..Default::default()
        };

        for (index, (b, c)) in baseline_lines.iter().zip(comparison_lines).enumerate() {
            let line = index + 1;

            if let Some(result) = self.compare_line(line, b.as_ref(), c.as_ref())? {
                report.summary.record(result.verdict);
                report.results.push(result);
            }
        }

        report.summary.finish();

        tracing::info!(
            metric = %report.metric,
            compared = report.results.len(),
            better = report.summary.better_count,
            worse = report.summary.worse_count,
            ratio = report.summary.ratio,
            "Comparison finished"
        );

        Ok(report)
    }

    /// @ai:intent Compare one line pair; None when the row is not a per-category metric row
    /// @ai:effects pure
    fn compare_line(
        &self,
        line: usize,
        baseline: &str,
        comparison: &str,
    ) -> Result<Option<ComparisonResult>> {
        let baseline_line = LogLine::new(baseline);

        if !baseline_line.is_metric_row(&self.options.marker_prefix) {
            return Ok(None);
        }

        let category = baseline_line.category(line)?;

        if category == self.options.aggregate_category {
            tracing::debug!(line, "Skipping aggregate row");
            return Ok(None);
        }

        let comparison_line = LogLine::new(comparison);

        if self.options.strict {
            self.check_alignment(line, category, &comparison_line)?;
        }

        let base = MetricRecord::from_line(&baseline_line, line)?;
        let new = MetricRecord::from_line(&comparison_line, line)?;

        let verdict = Verdict::classify(base.value, new.value);

        // Equal values (including 0 vs 0) never divide.
        let relative_delta = match verdict {
            Verdict::Unchanged => 0.0,
            _ if base.value == 0.0 => {
                return Err(Error::ZeroBaseline {
                    line,
                    category: base.category,
                });
            }
            _ => new.value / base.value - 1.0,
        };

        tracing::debug!(
            line,
            category = %base.category,
            verdict = verdict.label(),
            relative_delta,
            "Compared metric row"
        );

        Ok(Some(ComparisonResult {
            line,
            category: base.category,
            baseline_value: base.value,
            comparison_value: new.value,
            relative_delta,
            verdict,
        }))
    }

    /// @ai:intent Reject comparison rows that do not mirror the baseline row
    fn check_alignment(&self, line: usize, category: &str, comparison: &LogLine<'_>) -> Result<()> {
        if !comparison.is_metric_row(&self.options.marker_prefix) {
            return Err(Error::MarkerMismatch {
                line,
                message: format!(
                    "comparison row does not start with {:?}",
                    self.options.marker_prefix
                ),
            });
        }

        let comparison_category = comparison.category(line)?;

        if comparison_category != category {
            return Err(Error::MarkerMismatch {
                line,
                message: format!(
                    "category {:?} in baseline but {:?} in comparison",
                    category, comparison_category
                ),
            });
        }

        Ok(())
    }
}
