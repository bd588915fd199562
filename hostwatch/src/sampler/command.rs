use std::{io, process::Command};

use tracing::{instrument, trace};

use crate::error::{SamplerError, SamplerResult};

/// Captured result of a finished helper program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    /// Human readable exit status, e.g. `exit status: 1`.
    pub status: String,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// A successful run printing `stdout`.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            status: "exit status: 0".to_string(),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }
}

/// Launches helper programs and captures their output.
///
/// Implemented by [`SystemCommandRunner`] in production; tests inject canned
/// outputs or launch failures.
pub trait CommandRunner: Send + Sync {
    /// Run `program` to completion. An `Err` means the program could not be
    /// launched at all.
    fn run(&self, program: &str, args: &[&str]) -> io::Result<CommandOutput>;
}

/// Runs helper programs with [`std::process::Command`], blocking until they exit.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    #[instrument(level = "trace", skip(self))]
    fn run(&self, program: &str, args: &[&str]) -> io::Result<CommandOutput> {
        let output = Command::new(program).args(args).output()?;

        Ok(CommandOutput {
            success: output.status.success(),
            status: output.status.to_string(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// Run a helper program and return its stdout.
///
/// Launch failures become [`SamplerError::UtilityUnavailable`], a non-zero
/// exit becomes [`SamplerError::CommandFailed`].
pub(crate) fn run_utility(
    runner: &dyn CommandRunner,
    program: &str,
    args: &[&str],
) -> SamplerResult<String> {
    let output = runner
        .run(program, args)
        .map_err(|source| SamplerError::UtilityUnavailable {
            program: program.to_string(),
            source,
        })?;

    if !output.success {
        return Err(SamplerError::CommandFailed {
            program: program.to_string(),
            status: output.status,
            stderr: output.stderr,
        });
    }

    trace!("{} printed {} bytes", program, output.stdout.len());
    Ok(output.stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Missing;

    impl CommandRunner for Missing {
        fn run(&self, _program: &str, _args: &[&str]) -> io::Result<CommandOutput> {
            Err(io::Error::new(io::ErrorKind::NotFound, "not found"))
        }
    }

    struct Failing;

    impl CommandRunner for Failing {
        fn run(&self, _program: &str, _args: &[&str]) -> io::Result<CommandOutput> {
            Ok(CommandOutput {
                success: false,
                status: "exit status: 2".to_string(),
                stdout: String::new(),
                stderr: "boom".to_string(),
            })
        }
    }

    struct Echo;

    impl CommandRunner for Echo {
        fn run(&self, program: &str, args: &[&str]) -> io::Result<CommandOutput> {
            Ok(CommandOutput::success(format!("{} {}", program, args.join(" "))))
        }
    }

    #[test]
    fn test_launch_failure_is_utility_unavailable() {
        let err = run_utility(&Missing, "free", &["-m"]).unwrap_err();
        assert!(err.is_utility_unavailable());
    }

    #[test]
    fn test_non_zero_exit_is_command_failed() {
        let err = run_utility(&Failing, "vm_stat", &[]).unwrap_err();
        assert!(!err.is_utility_unavailable());
        assert_eq!(err.to_string(), "'vm_stat' exited with exit status: 2: boom");
    }

    #[test]
    fn test_stdout_is_returned() {
        let out = run_utility(&Echo, "free", &["-m"]).unwrap();
        assert_eq!(out, "free -m");
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_reports_missing_binary() {
        let err = run_utility(
            &SystemCommandRunner,
            "hostwatch-definitely-not-installed",
            &[],
        )
        .unwrap_err();
        assert!(err.is_utility_unavailable());
    }
}
