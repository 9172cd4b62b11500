pub mod command;
pub mod orchestrate;
pub mod policy;

pub use command::{CommandOutput, CommandRunner, CommandSpec, ProcessRunner, RunError};
pub use orchestrate::{orchestrate, Orchestration, Orchestrator, RunStatus, TestOutcome};
pub use policy::SubjectPolicy;
