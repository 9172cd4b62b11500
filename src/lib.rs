//! Runs test executables under the system allocator and under a wrapper that
//! substitutes a custom one, collects the resource usage reported by a
//! `time -v` style tool for each run, and tabulates both conditions side by
//! side as CSV.
//!
//! ```no_run
//! use malloc_bench::{config::HarnessConfig, export::CsvExporter, run::orchestrate};
//!
//! let tests = ["bench_tests/bin/test0", "bench_tests/bin/test3"];
//! let config = HarnessConfig::default();
//! let result = orchestrate(&tests, &config);
//! CsvExporter::export(&result.table, &tests, &config.out).unwrap();
//! ```

pub mod config;
pub mod export;
pub mod metrics;
pub mod ordered;
pub mod run;

#[cfg(feature = "cli")]
mod harness;

#[cfg(feature = "cli")]
pub use harness::*;
