//! Error types for every operation that drives the `op` binary.

use thiserror::Error;

/// Message used whenever the `op` executable cannot be spawned because it does not exist.
pub const CLI_NOT_FOUND_MSG: &str = "Cannot find `op`, do you have 1password-cli installed?";

/// Closed set of failures surfaced by the 1Password client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OnePasswordError {
    /// The 1Password CLI is not installed or not on the configured path.
    #[error("{0}")]
    CliNotFound(String),

    /// A requested key (`value`, `id`, ...) was absent from an `op` response.
    #[error("{0}")]
    ValueNotFound(String),

    /// An `op` response could not be decoded as JSON.
    #[error("{0}")]
    Json(String),

    /// `op` failed to run or exited unsuccessfully.
    #[error("{0}")]
    Runtime(String),

    /// `op --version` printed something that is not a version.
    #[error("Invalid 1Password CLI version: {0:?}")]
    InvalidVersion(String),
}

impl OnePasswordError {
    pub(crate) fn cli_not_found() -> Self {
        OnePasswordError::CliNotFound(CLI_NOT_FOUND_MSG.to_string())
    }

    /// Maps a spawn failure: a missing executable is distinguished from every other I/O problem.
    pub(crate) fn from_spawn(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => Self::cli_not_found(),
            _ => OnePasswordError::Runtime(format!("Failed to launch `op`: {e}")),
        }
    }
}

/// Result alias for client operations.
pub type Result<T> = std::result::Result<T, OnePasswordError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_not_found_maps_to_cli_not_found() {
        let missing = std::io::Error::from(std::io::ErrorKind::NotFound);
        let err = OnePasswordError::from_spawn(missing);
        let expected = OnePasswordError::CliNotFound(CLI_NOT_FOUND_MSG.into());
        assert_eq!(err, expected);
        assert_eq!(err.to_string(), CLI_NOT_FOUND_MSG);
    }

    #[test]
    fn other_spawn_failures_are_runtime_errors() {
        let denied = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        match OnePasswordError::from_spawn(denied) {
            OnePasswordError::Runtime(msg) => assert!(msg.starts_with("Failed to launch `op`")),
            other => panic!("expected Runtime error, got {other:?}"),
        }
    }
}
