//! Hostname reconciliation

use crate::error::Result;
use crate::exec::{ChangeRecorder, HostProbe, PrivilegedExecutor};
use crate::hosts::edit_hosts_file;
use crate::state::StateReader;
use crate::types::{Outcome, SystemPaths};

/// Brings the hostname file, the `127.0.1.1` hosts line and the kernel
/// hostname in line with the desired name.
pub struct HostnameReconciler<'a> {
    probe: &'a dyn HostProbe,
    exec: &'a dyn PrivilegedExecutor,
    recorder: &'a dyn ChangeRecorder,
    paths: &'a SystemPaths,
}

impl<'a> HostnameReconciler<'a> {
    pub fn new(
        probe: &'a dyn HostProbe,
        exec: &'a dyn PrivilegedExecutor,
        recorder: &'a dyn ChangeRecorder,
        paths: &'a SystemPaths,
    ) -> Self {
        Self {
            probe,
            exec,
            recorder,
            paths,
        }
    }

    pub fn reconcile(&self, desired: &str) -> Outcome {
        match self.try_reconcile(desired) {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("Hostname change to {desired} failed: {e}");
                Outcome::Failed(e.to_string())
            }
        }
    }

    /// Not transactional: a failing step leaves earlier steps in place.
    fn try_reconcile(&self, desired: &str) -> Result<Outcome> {
        let reader = StateReader::new(self.probe, self.paths);
        let current = reader.current_hostname()?;
        if current == desired {
            log::debug!("Hostname already {desired}");
            return Ok(Outcome::NoChangeNeeded);
        }

        self.exec
            .write_file(&self.paths.hostname_file, &format!("{desired}\n"))?;
        edit_hosts_file(&reader, self.exec, |table| {
            table.set_localhost_alias(desired)
        })?;
        self.exec.run_checked(&["hostname", desired])?;

        let change = format!("hostname: {current} -> {desired}");
        log::info!("{change}");
        self.recorder.record(&change);
        Ok(Outcome::Applied(change))
    }
}
