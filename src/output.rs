//! @ai:module:intent Format comparison reports for different outputs (line stream, summary, JSON)
//! @ai:module:layer infrastructure
//! @ai:module:public_api OutputFormat, format_report, format_float
//! @ai:module:depends_on comparator
//! @ai:module:stateless true

use crate::comparator::{ComparisonReport, Verdict};
use crate::error::Result;
use colored::Colorize;
use serde::{Deserialize, Serialize};

/// Significant digits used when printing floats in the line stream.
const SIGNIFICANT_DIGITS: i32 = 12;

/// @ai:intent Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Text,
    Summary,
    Json,
    JsonPretty,
}

/// @ai:intent Format a comparison report as a string
/// @ai:effects pure
pub fn format_report(report: &ComparisonReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(format_report_text(report)),
        OutputFormat::Summary => Ok(format_report_summary(report)),
        OutputFormat::Json => Ok(serde_json::to_string(report)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(report)?),
    }
}

/// @ai:intent Format the report as the plain line stream: category, verdict, delta, then the ratio
/// @ai:effects pure
fn format_report_text(report: &ComparisonReport) -> String {
    let mut output = String::new();

    for result in &report.results {
        output.push_str(&result.category);
        output.push('\n');

        if result.verdict != Verdict::Unchanged {
            output.push_str(result.verdict.label());
            output.push('\n');
            output.push_str(&format_float(result.relative_delta));
            output.push('\n');
        }
    }

    output.push_str(&format_float(report.summary.ratio));
    output.push('\n');

    output
}

/// @ai:intent Format the report as a colored per-category table
/// @ai:effects pure
fn format_report_summary(report: &ComparisonReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("Metric comparison: {}\n\n", report.metric.bold()));

    let width = report
        .results
        .iter()
        .map(|r| r.category.len())
        .max()
        .unwrap_or(0);

    for result in &report.results {
        let verdict = match result.verdict {
            Verdict::Better => "BETTER".green().bold(),
            Verdict::Worse => "WORSE".red().bold(),
            Verdict::Unchanged => "SAME".dimmed(),
        };

        output.push_str(&format!(
            "  {:<width$}  {:.4} -> {:.4}  {:<6} {}\n",
            result.category.cyan(),
            result.baseline_value,
            result.comparison_value,
            verdict,
            format_percent(result.relative_delta),
            width = width
        ));
    }

    let count = |verdict: Verdict| {
        report
            .results
            .iter()
            .filter(|r| r.verdict == verdict)
            .count()
    };

    output.push('\n');
    output.push_str(&format!(
        "Summary: {} better, {} worse, {} unchanged\n",
        count(Verdict::Better).to_string().green(),
        count(Verdict::Worse).to_string().red(),
        count(Verdict::Unchanged)
    ));
    output.push_str(&format!(
        "Better/worse ratio: {}\n",
        format_float(report.summary.ratio).bold()
    ));

    output
}

/// @ai:intent Format a relative delta as a signed percentage
/// @ai:effects pure
fn format_percent(delta: f64) -> String {
    if delta >= 0.0 {
        format!("+{:.1}%", delta * 100.0)
    } else {
        format!("{:.1}%", delta * 100.0)
    }
}

/// @ai:intent Render a float in its shortest form at 12 significant digits
/// @ai:post integral values keep a trailing ".0"
/// @ai:effects pure
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }

    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    if value == 0.0 {
        return if value.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    let scientific = format!("{:.*e}", (SIGNIFICANT_DIGITS - 1) as usize, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if exponent < -4 || exponent >= SIGNIFICANT_DIGITS {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.abs()
        );
    }

    let decimals = (SIGNIFICANT_DIGITS - 1 - exponent) as usize;
    let fixed = trim_fraction(&format!("{:.*}", decimals, value));

    if fixed.contains('.') {
        fixed
    } else {
        format!("{}.0", fixed)
    }
}

/// @ai:intent Drop trailing zeros (and a dangling point) from a decimal string
fn trim_fraction(number: &str) -> String {
    if !number.contains('.') {
        return number.to_string();
    }

    number
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
