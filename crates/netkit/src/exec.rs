//! Capability traits for touching the host
//!
//! Reconcilers never reach for ambient globals. Reads go through a
//! [`HostProbe`], mutations through a [`PrivilegedExecutor`] and audit
//! messages through a [`ChangeRecorder`], so every piece can be swapped for
//! an in-memory fake.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::process::Output;

use crate::error::{Error, Result};

/// Output captured from a command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was killed by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// A successful run with the given stdout
    pub fn success_with(stdout: impl Into<String>) -> Self {
        Self {
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed run with the given exit code and stderr
    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            status: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        Self {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Read-only access to the host.
///
/// Implementations run unprivileged and must not change anything.
pub trait HostProbe {
    /// Run a read-only command and capture its output
    fn capture(&self, argv: &[&str]) -> Result<CommandOutput>;

    /// Read a file, `None` if it does not exist
    fn read_file(&self, path: &Path) -> Result<Option<String>>;

    /// List a directory's entries, `None` if the directory does not exist
    fn list_dir(&self, dir: &Path) -> Result<Option<Vec<PathBuf>>>;

    /// Check whether a program is available on `PATH`
    fn command_exists(&self, program: &str) -> bool;
}

/// Runs mutating commands, elevating privileges when the caller lacks them.
pub trait PrivilegedExecutor {
    /// Run a command and capture its output
    fn run(&self, argv: &[&str]) -> Result<CommandOutput>;

    /// Run a command with `input` fed to its stdin
    fn run_with_input(&self, argv: &[&str], input: &str) -> Result<CommandOutput>;

    /// Run a command and turn a non-zero exit into [`Error::CommandFailed`]
    fn run_checked(&self, argv: &[&str]) -> Result<CommandOutput> {
        let output = self.run(argv)?;
        if !output.success() {
            return Err(Error::command_failed(argv, &output));
        }
        Ok(output)
    }

    /// Replace a file's whole content (`tee` so the write itself is elevated)
    fn write_file(&self, path: &Path, contents: &str) -> Result<()> {
        let target = path.to_string_lossy();
        let argv = ["tee", target.as_ref()];
        let output = self.run_with_input(&argv, contents)?;
        if !output.success() {
            return Err(Error::command_failed(&argv, &output));
        }
        Ok(())
    }

    /// Copy a file, overwriting the destination
    fn copy_file(&self, from: &Path, to: &Path) -> Result<()> {
        let from = from.to_string_lossy();
        let to = to.to_string_lossy();
        self.run_checked(&["cp", "-f", from.as_ref(), to.as_ref()])?;
        Ok(())
    }

    /// Read a file the caller may not be allowed to open (`cat`)
    fn read_privileged(&self, path: &Path) -> Result<String> {
        let target = path.to_string_lossy();
        Ok(self.run_checked(&["cat", target.as_ref()])?.stdout)
    }

    /// Change a file's permission bits, e.g. `"600"`
    fn set_mode(&self, path: &Path, mode: &str) -> Result<()> {
        let target = path.to_string_lossy();
        self.run_checked(&["chmod", mode, target.as_ref()])?;
        Ok(())
    }
}

/// Audit sink for applied changes
pub trait ChangeRecorder {
    /// Record one applied change. Recording never fails the change itself.
    fn record(&self, message: &str);
}

/// Recorder that keeps messages in memory
#[derive(Debug, Default)]
pub struct MemoryRecorder {
    messages: RefCell<Vec<String>>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far, oldest first
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl ChangeRecorder for MemoryRecorder {
    fn record(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Executor that remembers argv and stdin, failing anything starting with `fail`
    #[derive(Default)]
    struct Recording {
        calls: RefCell<Vec<(Vec<String>, Option<String>)>>,
    }

    impl PrivilegedExecutor for Recording {
        fn run(&self, argv: &[&str]) -> Result<CommandOutput> {
            self.calls
                .borrow_mut()
                .push((argv.iter().map(ToString::to_string).collect(), None));
            if argv.first() == Some(&"cp") && argv.get(2) == Some(&"/missing") {
                return Ok(CommandOutput::failure(1, "cp: cannot stat '/missing'"));
            }
            Ok(CommandOutput::success_with(""))
        }

        fn run_with_input(&self, argv: &[&str], input: &str) -> Result<CommandOutput> {
            self.calls.borrow_mut().push((
                argv.iter().map(ToString::to_string).collect(),
                Some(input.to_string()),
            ));
            Ok(CommandOutput::success_with(input))
        }
    }

    #[test]
    fn test_write_file_goes_through_tee() {
        let exec = Recording::default();
        exec.write_file(Path::new("/etc/hostname"), "web-01\n").unwrap();

        let calls = exec.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, vec!["tee", "/etc/hostname"]);
        assert_eq!(calls[0].1.as_deref(), Some("web-01\n"));
    }

    #[test]
    fn test_copy_file_failure_is_reported() {
        let exec = Recording::default();
        let err = exec
            .copy_file(Path::new("/missing"), Path::new("/missing.bak"))
            .unwrap_err();
        assert!(matches!(err, Error::CommandFailed { .. }));
        assert!(err.to_string().contains("cp -f /missing /missing.bak"));
    }

    #[test]
    fn test_privileged_read_and_mode_commands() {
        let exec = Recording::default();
        exec.read_privileged(Path::new("/etc/netplan/50-cloud-init.yaml"))
            .unwrap();
        exec.set_mode(Path::new("/etc/netplan/01-netcfg.yaml"), "600")
            .unwrap();

        let calls = exec.calls.borrow();
        assert_eq!(calls[0].0, vec!["cat", "/etc/netplan/50-cloud-init.yaml"]);
        assert_eq!(calls[1].0, vec!["chmod", "600", "/etc/netplan/01-netcfg.yaml"]);
    }

    #[test]
    fn test_memory_recorder_keeps_order() {
        let recorder = MemoryRecorder::new();
        recorder.record("first");
        recorder.record("second");
        assert_eq!(recorder.messages(), vec!["first", "second"]);
    }

    #[test]
    fn test_command_output_success() {
        assert!(CommandOutput::success_with("ok").success());
        assert!(!CommandOutput::failure(1, "nope").success());
        assert!(!CommandOutput::default().success());
    }
}
