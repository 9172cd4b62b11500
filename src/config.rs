use std::path::PathBuf;

use derive_builder::Builder;

use crate::run::policy::SubjectPolicy;

pub const DEFAULT_TIME: &str = "/usr/bin/time -v";
pub const DEFAULT_RUNNER_CUSTOM: &str = "scripts/run_linux.sh";
pub const DEFAULT_OUT: &str = "bench.csv";

/// Settings for one harness invocation.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(setter(into))]
pub struct HarnessConfig {
    /// Diagnostic tool invocation placed in front of each test executable.
    #[builder(default = "DEFAULT_TIME.to_owned()")]
    pub time: String,
    /// Script that runs its arguments under the custom allocator.
    #[builder(default = "DEFAULT_RUNNER_CUSTOM.to_owned()")]
    pub runner_custom: String,
    #[builder(default = "PathBuf::from(DEFAULT_OUT)")]
    pub out: PathBuf,
    #[builder(default)]
    pub json_out: Option<PathBuf>,
    #[builder(default)]
    pub policy: SubjectPolicy,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        HarnessConfig {
            time: DEFAULT_TIME.to_owned(),
            runner_custom: DEFAULT_RUNNER_CUSTOM.to_owned(),
            out: PathBuf::from(DEFAULT_OUT),
            json_out: None,
            policy: SubjectPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_match_default() {
        let built = HarnessConfigBuilder::default().build().unwrap();
        assert_eq!(built, HarnessConfig::default());
        assert_eq!(built.time, "/usr/bin/time -v");
        assert_eq!(built.out, PathBuf::from("bench.csv"));
    }

    #[test]
    fn builder_overrides() {
        let c = HarnessConfigBuilder::default()
            .time("time -v")
            .runner_custom("./wrap.sh")
            .policy(SubjectPolicy::always_baseline())
            .build()
            .unwrap();
        assert_eq!(c.time, "time -v");
        assert_eq!(c.runner_custom, "./wrap.sh");
        assert!(c.policy.requires_baseline("test3"));
    }
}
