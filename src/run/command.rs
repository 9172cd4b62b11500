use std::{
    fmt, io,
    process::{Command, ExitStatus, Output},
};

use thiserror::Error;

/// A command to execute, either as an argument vector or as a string handed
/// to `sh -c`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSpec {
    Argv { program: String, args: Vec<String> },
    Shell(String),
}

impl CommandSpec {
    /// Builds a command from a prefix such as `/usr/bin/time -f "%e %M"`,
    /// followed by `extra` as one more argument.
    ///
    /// The prefix is split into words the way a POSIX shell would. A prefix
    /// the splitter rejects (an unterminated quote, say) is left for `sh` to
    /// interpret. An empty prefix yields `extra` alone.
    pub fn with_prefix(prefix: &str, extra: &str) -> Self {
        let words = match shell_words::split(prefix) {
            Ok(words) => words,
            Err(_) => {
                return CommandSpec::Shell(format!("{} {}", prefix.trim(), shell_quote(extra)))
            }
        };
        let mut words = words.into_iter();
        match words.next() {
            Some(program) => {
                let mut args: Vec<String> = words.collect();
                args.push(extra.to_owned());
                CommandSpec::Argv { program, args }
            }
            None => CommandSpec::Argv {
                program: extra.to_owned(),
                args: Vec::new(),
            },
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandSpec::Argv { program, args } => {
                write!(f, "{}", shell_quote(program))?;
                for arg in args {
                    write!(f, " {}", shell_quote(arg))?;
                }
                Ok(())
            }
            CommandSpec::Shell(script) => write!(f, "sh -c {}", shell_quote(script)),
        }
    }
}

/// Quotes `word` for a POSIX shell, leaving plain words untouched.
pub fn shell_quote(word: &str) -> String {
    shell_words::quote(word).into_owned()
}

/// Exit code and captured streams of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

#[derive(Debug, Error)]
#[error("cannot spawn `{command}`: {source}")]
pub struct RunError {
    pub command: String,
    #[source]
    pub source: io::Error,
}

/// Executes commands to completion. A non-zero exit is not an error; only a
/// failure to start the process is.
pub trait CommandRunner {
    fn run(&self, command: &CommandSpec) -> Result<CommandOutput, RunError>;
}

/// Runs commands as child processes of this one, blocking until they exit
/// and both output streams are drained.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, command: &CommandSpec) -> Result<CommandOutput, RunError> {
        let mut cmd = match command {
            CommandSpec::Argv { program, args } => {
                let mut cmd = Command::new(program);
                cmd.args(args);
                cmd
            }
            CommandSpec::Shell(script) => {
                let mut cmd = Command::new("sh");
                cmd.arg("-c").arg(script);
                cmd
            }
        };
        let Output {
            status,
            stdout,
            stderr,
        } = cmd.output().map_err(|source| RunError {
            command: command.to_string(),
            source,
        })?;
        Ok(CommandOutput {
            code: exit_code(status),
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        })
    }
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|s| 128 + s))
        .unwrap_or(-1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_split() {
        assert_eq!(
            CommandSpec::with_prefix("/usr/bin/time -v", "bin/test 0"),
            CommandSpec::Argv {
                program: "/usr/bin/time".into(),
                args: vec!["-v".into(), "bin/test 0".into()],
            }
        );
        assert_eq!(
            CommandSpec::with_prefix("  ", "bin/test0"),
            CommandSpec::Argv {
                program: "bin/test0".into(),
                args: vec![],
            }
        );
    }

    #[test]
    fn quoted_prefix_split_like_sh() {
        assert_eq!(
            CommandSpec::with_prefix(r#"/usr/bin/time -f "%e %M""#, "bin/test0"),
            CommandSpec::Argv {
                program: "/usr/bin/time".into(),
                args: vec!["-f".into(), "%e %M".into(), "bin/test0".into()],
            }
        );
        assert_eq!(
            CommandSpec::with_prefix(r#"sh -c 'echo "Max RSS: 7" >&2' sh"#, "t"),
            CommandSpec::Argv {
                program: "sh".into(),
                args: vec![
                    "-c".into(),
                    r#"echo "Max RSS: 7" >&2"#.into(),
                    "sh".into(),
                    "t".into(),
                ],
            }
        );
    }

    #[test]
    fn unsplittable_prefix_goes_to_sh() {
        assert_eq!(
            CommandSpec::with_prefix("time -f 'oops", "my test"),
            CommandSpec::Shell("time -f 'oops 'my test'".into())
        );
    }

    #[test]
    fn quoting() {
        assert_eq!(shell_quote("bin/test0"), "bin/test0");
        assert_eq!(shell_quote("my test"), "'my test'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
        assert_eq!(shell_quote(""), "''");
        assert_eq!(shell_quote("$(rm -rf /)"), "'$(rm -rf /)'");
    }

    #[test]
    fn display() {
        let c = CommandSpec::with_prefix("time -v", "a b");
        assert_eq!(c.to_string(), "time -v 'a b'");
        let c = CommandSpec::Shell("x 'y'".into());
        assert_eq!(c.to_string(), r"sh -c 'x '\''y'\'''");
    }

    #[cfg(unix)]
    #[test]
    fn captures_streams_and_exit_code() {
        let out = ProcessRunner
            .run(&CommandSpec::Shell("echo out; echo err >&2; exit 3".into()))
            .unwrap();
        assert_eq!(out.code, 3);
        assert!(!out.success());
        assert_eq!(out.stdout, "out\n");
        assert_eq!(out.stderr, "err\n");
    }

    #[cfg(unix)]
    #[test]
    fn spawn_failure_is_an_error() {
        let err = ProcessRunner
            .run(&CommandSpec::with_prefix("", "/nonexistent/definitely-not-here"))
            .unwrap_err();
        assert_eq!(err.source.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains("/nonexistent/definitely-not-here"));
    }
}
