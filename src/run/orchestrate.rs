use std::path::Path;

use derive_more::Display;
use tracing::{debug, warn};

use super::{
    command::{shell_quote, CommandRunner, CommandSpec},
    policy::SubjectPolicy,
};
use crate::{
    config::HarnessConfig,
    metrics::{parse_metrics, AggregateTable, Condition, MetricRecord},
};

/// How one condition's run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RunStatus {
    #[display(fmt = "exit {_0}")]
    Exited(i32),
    #[display(fmt = "not started")]
    NotStarted,
}

impl RunStatus {
    pub fn success(&self) -> bool {
        matches!(self, RunStatus::Exited(0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    /// The executable does not exist; nothing was run.
    Missing,
    /// `system` is `None` when the policy skipped the baseline run.
    Ran {
        system: Option<RunStatus>,
        custom: RunStatus,
    },
}

/// Result of running every test under both conditions.
#[derive(Debug, Clone, Default)]
pub struct Orchestration {
    pub table: AggregateTable,
    /// One entry per input path, in input order.
    pub outcomes: Vec<(String, TestOutcome)>,
}

impl Orchestration {
    pub fn failures(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| match o {
                TestOutcome::Missing => true,
                TestOutcome::Ran { system, custom } => {
                    !custom.success() || system.map_or(false, |s| !s.success())
                }
            })
            .count()
    }
}

/// Runs each test once per condition, sequentially, and folds the reported
/// metrics into one table.
#[derive(Debug, Clone)]
pub struct Orchestrator<R> {
    runner: R,
    time: String,
    runner_custom: String,
    policy: SubjectPolicy,
}

impl<R: CommandRunner> Orchestrator<R> {
    pub fn new(runner: R, config: &HarnessConfig) -> Self {
        Orchestrator {
            runner,
            time: config.time.clone(),
            runner_custom: config.runner_custom.clone(),
            policy: config.policy.clone(),
        }
    }

    /// Never fails: missing executables, non-zero exits and processes that
    /// cannot be started are logged and leave their cells empty.
    pub fn run<S: AsRef<str>>(&self, test_paths: &[S]) -> Orchestration {
        let mut table = AggregateTable::new();
        let outcomes = test_paths
            .iter()
            .map(|path| {
                let path = path.as_ref();
                (path.to_owned(), self.run_test(path, &mut table))
            })
            .collect();
        Orchestration { table, outcomes }
    }

    fn run_test(&self, path: &str, table: &mut AggregateTable) -> TestOutcome {
        if !Path::new(path).is_file() {
            warn!(path, "missing executable, skipping");
            return TestOutcome::Missing;
        }

        let (system_record, system) = if self.policy.requires_baseline(basename(path)) {
            let (record, status) = self.measure(path, Condition::System);
            (record, Some(status))
        } else {
            debug!(path, "custom-only test, no baseline run");
            (MetricRecord::new(), None)
        };
        let (custom_record, custom) = self.measure(path, Condition::Custom);

        table.merge(path, &system_record, &custom_record);
        debug!(
            path,
            system = %system.map_or_else(|| "skipped".to_owned(), |s| s.to_string()),
            %custom,
            "test done"
        );
        TestOutcome::Ran { system, custom }
    }

    fn measure(&self, path: &str, condition: Condition) -> (MetricRecord, RunStatus) {
        let command = self.command(path, condition);
        debug!(path, %condition, %command, "running");
        match self.runner.run(&command) {
            Ok(output) => {
                if !output.success() {
                    warn!(path, %condition, code = output.code, "run failed");
                }
                // time(1) writes its report to stderr whatever the exit code
                let record = parse_metrics(&output.stderr);
                debug!(path, %condition, metrics = record.len(), "parsed report");
                (record, RunStatus::Exited(output.code))
            }
            Err(error) => {
                warn!(path, %condition, %error, "run could not start");
                (MetricRecord::new(), RunStatus::NotStarted)
            }
        }
    }

    pub fn command(&self, path: &str, condition: Condition) -> CommandSpec {
        match condition {
            Condition::System => CommandSpec::with_prefix(&self.time, path),
            Condition::Custom => {
                let words = [
                    shell_quote(&self.runner_custom),
                    self.time.trim().to_owned(),
                    shell_quote(path),
                ];
                CommandSpec::Shell(
                    words
                        .into_iter()
                        .filter(|w| !w.is_empty())
                        .collect::<Vec<_>>()
                        .join(" "),
                )
            }
        }
    }
}

/// Runs `test_paths` with a [`ProcessRunner`](super::command::ProcessRunner).
pub fn orchestrate<S: AsRef<str>>(test_paths: &[S], config: &HarnessConfig) -> Orchestration {
    Orchestrator::new(super::command::ProcessRunner, config).run(test_paths)
}

fn basename(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
}
