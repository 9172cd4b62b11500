use std::{
    fs, io,
    path::{Path, PathBuf},
};

use clap::Parser;
use derive_more::Display;
use serde::Deserialize;
use tracing::info;

use crate::{
    config::{HarnessConfig, HarnessConfigBuilder, HarnessConfigBuilderError},
    export::{CsvExporter, ExportError, JsonExporter},
    run::{orchestrate, SubjectPolicy},
};

#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error(transparent)]
    IO(#[from] io::Error),
    #[error(transparent)]
    Decode(#[from] toml::de::Error),
    #[error(transparent)]
    Config(#[from] HarnessConfigBuilderError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Run test executables under the system and a custom malloc and export
/// their `time -v` metrics to CSV.
#[derive(Debug, Parser)]
#[command(name = "malloc-bench", version)]
pub struct HarnessArgs {
    /// Diagnostic tool invocation [default: /usr/bin/time -v]
    #[arg(long, value_name = "CMD", env = "MALLOC_BENCH_TIME", allow_hyphen_values = true)]
    pub time: Option<String>,
    /// Wrapper script that runs its arguments under the custom malloc
    /// [default: scripts/run_linux.sh]
    #[arg(long, value_name = "SCRIPT", env = "MALLOC_BENCH_RUNNER")]
    pub runner_custom: Option<String>,
    /// Output CSV file [default: bench.csv]
    #[arg(short, long, value_name = "FILE")]
    pub out: Option<PathBuf>,
    /// Also write the table as JSON
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,
    /// TOML file with defaults for the options above
    #[arg(short, long, value_name = "FILE", env = "MALLOC_BENCH_CONFIG")]
    pub config: Option<PathBuf>,
    /// Test basename that skips the system malloc run (repeatable)
    #[arg(long, value_name = "NAME", conflicts_with = "no_custom_only")]
    pub custom_only: Vec<String>,
    /// Run every test under the system malloc too
    #[arg(long)]
    pub no_custom_only: bool,
    /// Paths to test executables
    #[arg(required = true, value_name = "TEST")]
    pub tests: Vec<String>,
}

/// Contents of a `--config` file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct HarnessFile {
    time: Option<String>,
    runner_custom: Option<String>,
    out: Option<PathBuf>,
    json_out: Option<PathBuf>,
    custom_only: Option<SubjectPolicy>,
}

fn load_file(path: &Path) -> Result<HarnessFile, HarnessError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Defaults, overlaid by the config file, overlaid by the command line.
pub fn resolve_config(args: &HarnessArgs) -> Result<HarnessConfig, HarnessError> {
    let file = match &args.config {
        Some(path) => load_file(path)?,
        None => HarnessFile::default(),
    };

    let mut builder = HarnessConfigBuilder::default();
    if let Some(time) = args.time.clone().or(file.time) {
        builder.time(time);
    }
    if let Some(runner) = args.runner_custom.clone().or(file.runner_custom) {
        builder.runner_custom(runner);
    }
    if let Some(out) = args.out.clone().or(file.out) {
        builder.out(out);
    }
    if let Some(json) = args.json.clone().or(file.json_out) {
        builder.json_out(json);
    }

    let policy = if args.no_custom_only {
        Some(SubjectPolicy::always_baseline())
    } else if !args.custom_only.is_empty() {
        Some(SubjectPolicy::custom_only(args.custom_only.iter().cloned()))
    } else {
        file.custom_only
    };
    if let Some(policy) = policy {
        builder.policy(policy);
    }

    Ok(builder.build()?)
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display(
    fmt = "wrote {} with {metrics} metrics across {tests} tests ({failures} failed)",
    "out.display()"
)]
pub struct RunSummary {
    pub out: PathBuf,
    pub metrics: usize,
    pub tests: usize,
    /// Tests that were missing or exited non-zero under either condition.
    pub failures: usize,
}

/// Runs every test and writes the output file(s). Individual test failures
/// are logged, not returned.
pub fn run_harness(args: &HarnessArgs) -> Result<RunSummary, HarnessError> {
    let config = resolve_config(args)?;
    let result = orchestrate(&args.tests, &config);

    CsvExporter::export(&result.table, &args.tests, &config.out)?;
    if let Some(json) = &config.json_out {
        JsonExporter::export(&result.table, &args.tests, json)?;
        info!(path = %json.display(), "wrote json");
    }

    Ok(RunSummary {
        out: config.out,
        metrics: result.table.metric_count(),
        tests: args.tests.len(),
        failures: result.failures(),
    })
}
