//! @ai:module:intent CLI entry point comparing two trec_eval result logs
//! @ai:module:layer presentation
//! @ai:module:public_api main
//! @ai:module:depends_on loader, comparator, output, config

use anyhow::Result;
use clap::{Parser, ValueEnum};
use map_compare::{format_report, load_pair, CompareConfig, MetricComparator, OutputFormat};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "map-compare")]
#[command(author, version, about = "Compare per-query metric rows of two trec_eval result logs")]
struct Cli {
    /// Result log of the reference run
    baseline: PathBuf,

    /// Result log of the candidate run
    comparison: PathBuf,

    /// Leading-field prefix of the rows to compare (e.g. map, P_10, ndcg)
    #[arg(long, short)]
    metric: Option<String>,

    /// Category label of the aggregate row to exclude
    #[arg(long)]
    aggregate: Option<String>,

    /// Require comparison rows to carry the same marker and category
    #[arg(long, overrides_with = "no_strict")]
    strict: bool,

    /// Trust positional alignment even if the config file enables strict mode
    #[arg(long, overrides_with = "strict")]
    no_strict: bool,

    /// Output format
    #[arg(long, short, value_enum)]
    format: Option<Format>,

    /// Path to a TOML configuration file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Write the effective configuration to this path
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Fail with exit code 1 if any category got worse
    #[arg(long, default_value = "false")]
    fail_on_worse: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Summary,
    Json,
    JsonPretty,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Summary => OutputFormat::Summary,
            Format::Json => OutputFormat::Json,
            Format::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("map_compare=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let stdout = std::io::stdout();

    match run(&cli, &mut stdout.lock()) {
        Ok(code) => code,
        Err(e) => fail(&e),
    }
}

/// @ai:intent Report a fatal error on stderr and map it to exit code 2
/// @ai:effects io
fn fail(error: &anyhow::Error) -> ExitCode {
    tracing::error!("{:#}", error);
    eprintln!("Error: {:#}", error);
    ExitCode::from(2)
}

/// @ai:intent Load both logs, compare them and write the report
/// @ai:post nothing is written to out unless the whole comparison succeeded
/// @ai:effects fs:read, io
fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<ExitCode> {
    let config = resolve_config(cli)?;

    if let Some(path) = &cli.save_config {
        config.save(path)?;
        tracing::info!("Configuration saved to {}", path.display());
    }

    let logs = load_pair(&cli.baseline, &cli.comparison)?;
    let comparator = MetricComparator::new(config.compare_options());
    let report = comparator.compare(&logs.baseline, &logs.comparison)?;

    let rendered = format_report(&report, config.format)?;
    out.write_all(rendered.as_bytes())?;
    out.flush()?;

    if cli.fail_on_worse && report.has_regressions() {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// @ai:intent Merge the optional config file with CLI overrides
/// @ai:effects fs:read
fn resolve_config(cli: &Cli) -> Result<CompareConfig> {
    let mut config = match &cli.config {
        Some(path) => CompareConfig::load(path)?,
        None => CompareConfig::default(),
    };

    if let Some(metric) = &cli.metric {
        config.marker_prefix = metric.clone();
    }

    if let Some(aggregate) = &cli.aggregate {
        config.aggregate_category = aggregate.clone();
    }

    if let Some(format) = cli.format {
        config.format = format.into();
    }

    if cli.strict {
        config.strict = true;
    } else if cli.no_strict {
        config.strict = false;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_cli_overrides_defaults() {
        let cli = Cli::parse_from([
            "map-compare",
            "base.eval",
            "new.eval",
            "--metric",
            "P_10",
            "--strict",
            "--format",
            "json-pretty",
        ]);

        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.marker_prefix, "P_10");
        assert_eq!(config.aggregate_category, "all");
        assert!(config.strict);
        assert_eq!(config.format, OutputFormat::JsonPretty);
    }

    struct Fixture {
        temp: TempDir,
    }

    impl Fixture {
        fn new(baseline: &str, comparison: &str) -> Self {
            let temp = TempDir::new().unwrap();
            std::fs::write(temp.path().join("base.eval"), baseline).unwrap();
            std::fs::write(temp.path().join("new.eval"), comparison).unwrap();
            Self { temp }
        }

        fn path(&self, name: &str) -> String {
            self.temp.path().join(name).display().to_string()
        }

        fn invoke(&self, extra: &[&str]) -> (Result<ExitCode>, String) {
            let mut args = vec![
                "map-compare".to_string(),
                self.path("base.eval"),
                self.path("new.eval"),
            ];
            args.extend(extra.iter().map(|a| a.to_string()));

            let cli = Cli::parse_from(args);
            let mut out = Vec::new();
            let result = run(&cli, &mut out);
            (result, String::from_utf8(out).unwrap())
        }
    }

    #[test]
    fn test_run_success_writes_report() {
        let fixture = Fixture::new("map\tcat1\t0.50\n", "map\tcat1\t0.60\n");

        let (result, out) = fixture.invoke(&[]);
        assert_eq!(result.unwrap(), ExitCode::SUCCESS);
        assert_eq!(out, "cat1\nbetter\n0.2\n1.0\n");
    }

    #[test]
    fn test_run_regression_without_flag_succeeds() {
        let fixture = Fixture::new("map\t101\t0.50\n", "map\t101\t0.40\n");

        let (result, out) = fixture.invoke(&[]);
        assert_eq!(result.unwrap(), ExitCode::SUCCESS);
        assert_eq!(out, "101\nworse\n-0.2\n0.0\n");
    }

    #[test]
    fn test_run_fail_on_worse_exits_one() {
        let fixture = Fixture::new("map\t101\t0.50\n", "map\t101\t0.40\n");

        let (result, out) = fixture.invoke(&["--fail-on-worse"]);
        assert_eq!(result.unwrap(), ExitCode::from(1));
        assert_eq!(out, "101\nworse\n-0.2\n0.0\n");
    }

    #[test]
    fn test_run_fail_on_worse_without_regression_succeeds() {
        let fixture = Fixture::new("map\t101\t0.50\n", "map\t101\t0.60\n");

        let (result, _) = fixture.invoke(&["--fail-on-worse"]);
        assert_eq!(result.unwrap(), ExitCode::SUCCESS);
    }

    #[test]
    fn test_run_length_mismatch_writes_nothing() {
        let fixture = Fixture::new("map\tq1\t0.5\nmap\tq2\t0.5\n", "map\tq1\t0.6\n");

        let (result, out) = fixture.invoke(&[]);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Line count mismatch"));
        assert!(out.is_empty());
        assert_eq!(fail(&err), ExitCode::from(2));
    }

    #[test]
    fn test_run_parse_error_writes_nothing() {
        let fixture = Fixture::new(
            "map\tq1\t0.5\nmap\tq2\t0.5\n",
            "map\tq1\t0.6\nmap\tq2\tx\n",
        );

        let (result, out) = fixture.invoke(&[]);
        assert!(result.unwrap_err().to_string().contains("line 2"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_run_zero_baseline_writes_nothing() {
        let fixture = Fixture::new(
            "runid\tall\tbm25\nmap\tq1\t0.5\nmap\tq2\t0.0\n",
            "runid\tall\tindri\nmap\tq1\t0.6\nmap\tq2\t0.1\n",
        );

        let (result, out) = fixture.invoke(&[]);
        assert!(result.unwrap_err().to_string().contains("Zero baseline value at line 3"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_run_missing_file_writes_nothing() {
        let fixture = Fixture::new("map\tq1\t0.5\n", "map\tq1\t0.6\n");
        std::fs::remove_file(fixture.temp.path().join("new.eval")).unwrap();

        let (result, out) = fixture.invoke(&[]);
        assert!(result.unwrap_err().to_string().contains("new.eval"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_run_save_config_round_trips() {
        let fixture = Fixture::new("map\tq1\t0.5\n", "map\tq1\t0.6\n");
        let saved = fixture.path("saved.toml");

        let (result, _) =
            fixture.invoke(&["--metric", "map", "--strict", "--save-config", &saved]);
        assert_eq!(result.unwrap(), ExitCode::SUCCESS);

        let config = CompareConfig::load(std::path::Path::new(&saved)).unwrap();
        assert_eq!(
            config,
            CompareConfig {
                strict: true,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_run_cli_overrides_config_file() {
        let fixture = Fixture::new(
            "P_10\tq1\t0.5\nmap\tq1\t0.2\n",
            "P_10\tq1\t0.6\nmap\tq1\t0.1\n",
        );
        let config_path = fixture.path("compare.toml");
        std::fs::write(&config_path, "marker_prefix = \"map\"\nformat = \"json\"\n").unwrap();

        let (result, out) = fixture.invoke(&["--config", &config_path]);
        assert_eq!(result.unwrap(), ExitCode::SUCCESS);
        assert!(out.contains("\"metric\":\"map\""));

        let (result, out) = fixture.invoke(&[
            "--config",
            &config_path,
            "--metric",
            "P_10",
            "--format",
            "text",
        ]);
        assert_eq!(result.unwrap(), ExitCode::SUCCESS);
        assert_eq!(out, "q1\nbetter\n0.2\n1.0\n");
    }

    #[test]
    fn test_no_strict_overrides_config_file() {
        let fixture = Fixture::new("map\tq1\t0.5\n", "P_10\tq1\t0.6\n");
        let config_path = fixture.path("strict.toml");
        std::fs::write(&config_path, "strict = true\n").unwrap();

        let (result, out) = fixture.invoke(&["--config", &config_path]);
        assert!(result.unwrap_err().to_string().contains("not aligned"));
        assert!(out.is_empty());

        let (result, out) = fixture.invoke(&["--config", &config_path, "--no-strict"]);
        assert_eq!(result.unwrap(), ExitCode::SUCCESS);
        assert_eq!(out, "q1\nbetter\n0.2\n1.0\n");
    }

    #[test]
    fn test_missing_comparison_path_is_usage_error() {
        assert!(Cli::try_parse_from(["map-compare", "base.eval"]).is_err());
    }
}
