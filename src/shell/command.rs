//! Shell command execution.
//!
//! Every external program the provisioner touches (package manager, service
//! manager, `tee` for privileged writes, the EDID decoder) goes through
//! [`execute`], so a single place decides how output is captured and how a
//! spawn failure is reported.

use crate::error::{KioskError, Result};
use std::io::Write;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Outcome of one shell command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code, `None` when the process died from a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
    pub success: bool,
}

impl CommandResult {
    /// Convert a non-zero exit into [`KioskError::CommandFailed`].
    pub fn into_checked(self, command: &str) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(KioskError::CommandFailed {
                command: command.to_string(),
                code: self.exit_code,
            })
        }
    }

    /// The last `n` lines of stderr, oldest first.
    pub fn stderr_tail(&self, n: usize) -> Vec<&str> {
        let lines: Vec<&str> = self.stderr.lines().collect();
        lines[lines.len().saturating_sub(n)..].to_vec()
    }
}

/// How to run a command.
///
/// Output is always captured; the provisioner shows progress through its own
/// UI rather than letting child processes write to the terminal.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Bytes fed to the command's stdin (stdin is closed when `None`).
    pub stdin: Option<Vec<u8>>,
}

impl CommandOptions {
    /// Options that pipe `bytes` into the command.
    pub fn with_stdin(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            stdin: Some(bytes.into()),
        }
    }
}

fn spawn_failed(command: &str, e: std::io::Error) -> KioskError {
    tracing::debug!("could not run '{}': {}", command, e);
    KioskError::CommandFailed {
        command: command.to_string(),
        code: None,
    }
}

/// Run `command` through `/bin/sh -c`, capturing stdout and stderr.
///
/// A command that runs and exits non-zero is still `Ok`; callers decide
/// whether that is fatal, usually through [`CommandResult::into_checked`].
pub fn execute(command: &str, options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();
    tracing::debug!("Executing: {}", command);

    let mut child = Command::new("/bin/sh")
        .arg("-c")
        .arg(command)
        .stdin(if options.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| spawn_failed(command, e))?;

    if let (Some(input), Some(mut pipe)) = (&options.stdin, child.stdin.take()) {
        // An early exit closes the pipe; the exit status reports the failure.
        if let Err(e) = pipe.write_all(input) {
            tracing::debug!("stdin write to '{}' interrupted: {}", command, e);
        }
    }

    let output = child
        .wait_with_output()
        .map_err(|e| spawn_failed(command, e))?;

    Ok(CommandResult {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        duration: start.elapsed(),
        success: output.status.success(),
    })
}

/// Quote a single argument for `/bin/sh`.
///
/// Plain words pass through untouched; anything else is wrapped in single
/// quotes with embedded quotes escaped.
pub fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:@%+,".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(command: &str) -> CommandResult {
        execute(command, &CommandOptions::default()).unwrap()
    }

    #[test]
    fn captures_stdout_of_successful_command() {
        let result = run("echo labwc");
        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert_eq!(result.stdout, "labwc\n");
    }

    #[test]
    fn non_zero_exit_is_not_an_error() {
        let result = run("echo oops >&2; exit 3");
        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
        assert_eq!(result.stderr_tail(1), vec!["oops"]);
    }

    #[test]
    fn stdin_is_fed_to_the_command() {
        let result = execute("cat", &CommandOptions::with_stdin("edid bytes\n")).unwrap();
        assert_eq!(result.stdout, "edid bytes\n");
    }

    #[test]
    fn stdin_is_closed_by_default() {
        assert_eq!(run("cat").stdout, "");
    }

    #[test]
    fn stderr_tail_keeps_last_lines_in_order() {
        let result = run("printf 'a\\nb\\nc\\n' >&2; exit 1");
        assert_eq!(result.stderr_tail(2), vec!["b", "c"]);
        assert_eq!(result.stderr_tail(10).len(), 3);
    }

    #[test]
    fn into_checked_maps_failure() {
        let err = run("exit 2").into_checked("exit 2").unwrap_err();
        assert!(matches!(
            err,
            KioskError::CommandFailed { code: Some(2), .. }
        ));
    }

    #[test]
    fn shell_quote_leaves_plain_words() {
        assert_eq!(shell_quote("chromium-browser"), "chromium-browser");
        assert_eq!(shell_quote("/etc/greetd/config.toml"), "/etc/greetd/config.toml");
    }

    #[test]
    fn shell_quote_wraps_special_characters() {
        assert_eq!(shell_quote("a b"), "'a b'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
        assert_eq!(shell_quote(""), "''");
    }

    #[test]
    fn quoted_argument_survives_shell() {
        let arg = "https://example.com/?a=1&b='2' $HOME";
        let result = run(&format!("printf %s {}", shell_quote(arg)));
        assert_eq!(result.stdout, arg);
    }
}
