//! Unprivileged command and file access used for state probes

use netkit::{CommandOutput, HostProbe};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Run a command and capture output
pub fn run_capture(cmd: &str, args: &[&str]) -> std::io::Result<CommandOutput> {
    let output = Command::new(cmd).args(args).stdin(Stdio::null()).output()?;
    Ok(output.into())
}

/// Check if a command exists
pub fn command_exists(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Reads the live host without changing anything
pub struct LocalProbe;

impl HostProbe for LocalProbe {
    fn capture(&self, argv: &[&str]) -> netkit::Result<CommandOutput> {
        let Some((cmd, args)) = argv.split_first() else {
            return Ok(CommandOutput::failure(127, "empty command"));
        };
        log::trace!("probe: {}", argv.join(" "));
        Ok(run_capture(cmd, args)?)
    }

    fn read_file(&self, path: &Path) -> netkit::Result<Option<String>> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list_dir(&self, dir: &Path) -> netkit::Result<Option<Vec<PathBuf>>> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                paths.push(entry.path());
            }
        }
        Ok(Some(paths))
    }

    fn command_exists(&self, program: &str) -> bool {
        command_exists(program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_file_missing_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("hosts");
        assert_eq!(LocalProbe.read_file(&missing).unwrap(), None);
    }

    #[test]
    fn test_read_file_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let hosts = temp_dir.path().join("hosts");
        fs::write(&hosts, "127.0.0.1\tlocalhost\n").unwrap();
        assert_eq!(
            LocalProbe.read_file(&hosts).unwrap().as_deref(),
            Some("127.0.0.1\tlocalhost\n")
        );
    }

    #[test]
    fn test_list_dir_only_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("01-netcfg.yaml"), "network: {}\n").unwrap();
        fs::create_dir(temp_dir.path().join("subdir")).unwrap();

        let listed = LocalProbe.list_dir(temp_dir.path()).unwrap().unwrap();
        assert_eq!(listed, vec![temp_dir.path().join("01-netcfg.yaml")]);
        assert_eq!(
            LocalProbe
                .list_dir(&temp_dir.path().join("absent"))
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_capture_reports_exit_status() {
        let ok = LocalProbe.capture(&["true"]).unwrap();
        assert!(ok.success());
        let failed = LocalProbe.capture(&["false"]).unwrap();
        assert!(!failed.success());
    }

    #[test]
    fn test_capture_missing_program_is_an_error() {
        assert!(
            LocalProbe
                .capture(&["netident-definitely-not-a-command"])
                .is_err()
        );
    }
}
