//! Error types for network identity reconciliation.
//!
//! A detection failure aborts IP reconciliation only; apply failures abort a
//! single backend attempt. Callers turn these into a failed outcome for the
//! action that produced them, so one failing action never stops the others.

use std::path::PathBuf;
use thiserror::Error;

use crate::exec::CommandOutput;

/// Errors that can occur while reading or mutating host network state.
#[derive(Debug, Error)]
pub enum Error {
    /// Neither the routing table nor the link table named a usable interface
    #[error("no usable network interface found (no default route and no non-loopback link)")]
    NoInterfaceFound,

    /// A command exited unsuccessfully
    #[error("command `{command}` failed ({status}): {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    /// An IP backend could not assign the address
    #[error("{backend} backend failed: {reason}")]
    ApplyFailed {
        backend: &'static str,
        reason: String,
    },

    /// The netplan document has a shape we refuse to edit
    #[error("cannot edit netplan document {}: {reason}", .path.display())]
    InvalidNetplan { path: PathBuf, reason: String },

    /// YAML (de)serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a `CommandFailed` from the argv that ran and what it produced.
    pub fn command_failed(argv: &[&str], output: &CommandOutput) -> Self {
        let status = match output.status {
            Some(code) => format!("exit status {code}"),
            None => "terminated by signal".to_string(),
        };
        let stderr = output.stderr.trim();
        Error::CommandFailed {
            command: argv.join(" "),
            status,
            stderr: if stderr.is_empty() {
                "no error output".to_string()
            } else {
                stderr.to_string()
            },
        }
    }
}

/// Result type for netkit operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failed_message() {
        let output = CommandOutput::failure(2, "RTNETLINK answers: Operation not permitted\n");
        let err = Error::command_failed(&["ip", "addr", "add", "10.0.0.5/24", "dev", "eth0"], &output);
        assert_eq!(
            err.to_string(),
            "command `ip addr add 10.0.0.5/24 dev eth0` failed (exit status 2): \
             RTNETLINK answers: Operation not permitted"
        );
    }

    #[test]
    fn test_command_failed_without_stderr() {
        let output = CommandOutput {
            status: None,
            ..Default::default()
        };
        let err = Error::command_failed(&["netplan", "apply"], &output);
        assert!(err.to_string().contains("terminated by signal"));
        assert!(err.to_string().contains("no error output"));
    }
}
