//! # contract: the subprocess seam between the client and the `op` binary
//!
//! This module defines a single trait ([`CommandRunner`]) and its output type
//! ([`CommandOutput`]). Every call the client makes to 1Password goes through
//! this trait, so the real process launcher and test doubles are interchangeable.
//!
//! ## Interface & Extensibility
//! - Implement [`CommandRunner`] to change how `op` is launched (sandboxing, remote exec, ...).
//! - The method is async and returns `std::io::Result`; a missing executable must
//!   surface as `std::io::ErrorKind::NotFound` so the client can report it precisely.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall`; `MockCommandRunner` is available under
//!   `cfg(test)` and with the `test-export-mocks` feature.

use async_trait::async_trait;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, or `None` when the process was terminated by a signal.
    pub status: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    /// Convenience constructor for a process that exited zero.
    pub fn ok(stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            status: Some(0),
            stdout: stdout.into(),
            stderr: Vec::new(),
        }
    }

    /// Convenience constructor for a process that exited with `code`.
    pub fn failed(code: i32, stderr: impl Into<Vec<u8>>) -> Self {
        Self {
            status: Some(code),
            stdout: Vec::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    pub fn stdout_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    pub fn stderr_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.stderr)
    }
}

/// Runs an external program to completion and captures its output.
///
/// Stdout and stderr are collected in full; stdin is not connected.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` and wait for it to exit.
    async fn run(&self, program: &str, args: &[String]) -> std::io::Result<CommandOutput>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_requires_zero_exit() {
        assert!(CommandOutput::ok("x").success());
        assert!(!CommandOutput::failed(1, "boom").success());
        let killed = CommandOutput {
            status: None,
            ..Default::default()
        };
        assert!(!killed.success());
    }

    #[test]
    fn text_views_are_lossy() {
        let out = CommandOutput {
            status: Some(0),
            stdout: vec![b'o', b'k', 0xff],
            stderr: b"warn".to_vec(),
        };
        assert_eq!(out.stdout_text(), "ok\u{fffd}");
        assert_eq!(out.stderr_text(), "warn");
    }
}
