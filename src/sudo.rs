//! Privileged command execution
//!
//! Commands run directly when the process is already root. Otherwise each
//! one is prefixed with `sudo`, which prompts on the terminal the first time
//! and reuses its cached credential afterwards. The credential is dropped
//! again when the executor goes away.

use netkit::{CommandOutput, PrivilegedExecutor};
use std::cell::Cell;
use std::io::Write;
use std::process::{Command, Stdio};

/// Runs mutating commands, via `sudo` when not root
pub struct SudoExecutor {
    elevate: bool,
    used_sudo: Cell<bool>,
}

impl SudoExecutor {
    /// Elevate only if the effective uid is not root
    pub fn detect() -> Self {
        // SAFETY: geteuid has no preconditions and cannot fail
        let euid = unsafe { libc::geteuid() };
        Self::new(euid != 0)
    }

    pub fn new(elevate: bool) -> Self {
        Self {
            elevate,
            used_sudo: Cell::new(false),
        }
    }

    /// Build the command, prefixing `sudo` when elevating
    fn command(&self, argv: &[&str]) -> std::io::Result<Command> {
        let Some((program, args)) = argv.split_first() else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "empty command",
            ));
        };

        let mut cmd = if self.elevate {
            self.used_sudo.set(true);
            let mut cmd = Command::new("sudo");
            cmd.arg("--").arg(program);
            cmd
        } else {
            Command::new(program)
        };
        cmd.args(args);
        log::debug!(
            "exec: {}{}",
            if self.elevate { "sudo " } else { "" },
            argv.join(" ")
        );
        Ok(cmd)
    }
}

impl PrivilegedExecutor for SudoExecutor {
    fn run(&self, argv: &[&str]) -> netkit::Result<CommandOutput> {
        let output = self.command(argv)?.stdin(Stdio::null()).output()?;
        Ok(output.into())
    }

    fn run_with_input(&self, argv: &[&str], input: &str) -> netkit::Result<CommandOutput> {
        let mut child = self
            .command(argv)?
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(input.as_bytes())?;
            // stdin closes here so the child sees EOF
        }

        let output = child.wait_with_output()?;
        Ok(output.into())
    }
}

impl Drop for SudoExecutor {
    fn drop(&mut self) {
        if self.used_sudo.get() {
            // Invalidate sudo timestamp to release privileges
            let _ = Command::new("sudo")
                .args(["-k"])
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status();
        }
    }
}
