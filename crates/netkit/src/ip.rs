//! Primary-interface IP reconciliation

use crate::backend::{BackendKind, DirectBackend, IpBackend, NetplanBackend, select_backend};
use crate::detect::InterfaceDetector;
use crate::error::{Error, Result};
use crate::exec::{ChangeRecorder, HostProbe, PrivilegedExecutor};
use crate::hosts::edit_hosts_file;
use crate::state::StateReader;
use crate::types::{NetworkInterface, Outcome, SystemPaths};

pub struct IpReconciler<'a> {
    probe: &'a dyn HostProbe,
    exec: &'a dyn PrivilegedExecutor,
    recorder: &'a dyn ChangeRecorder,
    paths: &'a SystemPaths,
}

impl<'a> IpReconciler<'a> {
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

    /// Put `desired` on the primary interface and bind it in the hosts table.
    ///
    /// The hosts entry uses `hostname` when given (the name requested in this
    /// run), otherwise the live hostname. When the address already matches,
    /// nothing is touched, including the hosts table.
    pub fn reconcile(&self, desired: &str, hostname: Option<&str>) -> Outcome {
        match self.try_reconcile(desired, hostname) {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("IP change to {desired} failed: {e}");
                Outcome::Failed(e.to_string())
            }
        }
    }

    fn try_reconcile(&self, desired: &str, hostname: Option<&str>) -> Result<Outcome> {
        let iface = InterfaceDetector::new(self.probe).detect_primary()?;
        let reader = StateReader::new(self.probe, self.paths);

        let current = reader.current_ip(&iface)?;
        if current.as_deref() == Some(desired) {
            log::debug!("{iface} already has {desired}");
            return Ok(Outcome::NoChangeNeeded);
        }

        let used = self.apply_with_fallback(&iface, desired)?;

        // The address has landed; audit it before anything else can fail
        let change = format!(
            "ip: {iface} {} -> {desired} via {used}",
            current.as_deref().unwrap_or("none")
        );
        log::info!("{change}");
        self.recorder.record(&change);

        let name = match hostname {
            Some(name) => name.to_string(),
            None => reader.current_hostname()?,
        };
        edit_hosts_file(&reader, self.exec, |table| table.upsert(&name, desired))?;

        Ok(Outcome::Applied(change))
    }

    /// Try the selected backend; a failed netplan attempt gets exactly one
    /// direct retry.
    fn apply_with_fallback(&self, iface: &NetworkInterface, ip: &str) -> Result<BackendKind> {
        let direct = DirectBackend::new(self.exec);

        match select_backend(self.probe, &self.paths.netplan_dir) {
            BackendKind::Direct => {
                attempt(&direct, iface, ip)?;
                Ok(BackendKind::Direct)
            }
            BackendKind::Netplan => {
                let netplan = NetplanBackend::new(self.probe, self.exec, &self.paths.netplan_dir);
                let Err(first) = attempt(&netplan, iface, ip) else {
                    return Ok(BackendKind::Netplan);
                };

                log::warn!("{first}; falling back to direct assignment on {iface}");
                direct.apply(iface, ip).map_err(|e| Error::ApplyFailed {
                    backend: direct.name(),
                    reason: format!("{e}; earlier attempt: {first}"),
                })?;
                Ok(BackendKind::Direct)
            }
        }
    }
}

fn attempt(backend: &dyn IpBackend, iface: &NetworkInterface, ip: &str) -> Result<()> {
    backend.apply(iface, ip).map_err(|e| {
        if matches!(e, Error::ApplyFailed { .. }) {
            e
        } else {
            Error::ApplyFailed {
                backend: backend.name(),
                reason: e.to_string(),
            }
        }
    })
}
