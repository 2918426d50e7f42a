//! Runs the requested reconciliation actions in their fixed order

use crate::exec::{ChangeRecorder, HostProbe, PrivilegedExecutor};
use crate::hostname::HostnameReconciler;
use crate::hosts::edit_hosts_file;
use crate::ip::IpReconciler;
use crate::state::StateReader;
use crate::types::{Action, DesiredState, Outcome, RunReport, SystemPaths};

/// Progress callback for a run
///
/// Implement this trait to report actions as they start and finish.
pub trait Progress {
    fn on_action_start(&mut self, action: &Action);
    fn on_action_complete(&mut self, action: &Action, outcome: &Outcome);
}

/// No-op progress callback
pub struct NoProgress;

impl Progress for NoProgress {
    fn on_action_start(&mut self, _action: &Action) {}
    fn on_action_complete(&mut self, _action: &Action, _outcome: &Outcome) {}
}

pub struct Orchestrator<'a> {
    probe: &'a dyn HostProbe,
    exec: &'a dyn PrivilegedExecutor,
    recorder: &'a dyn ChangeRecorder,
    paths: &'a SystemPaths,
}

impl<'a> Orchestrator<'a> {
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

    /// Hostname first, so the IP action's hosts entry uses the final name;
    /// then the IP; then explicit hosts entries in the order given.
    ///
    /// Every action runs even if an earlier one failed.
    pub fn run(&self, desired: &DesiredState, progress: &mut dyn Progress) -> RunReport {
        let mut report = RunReport::default();
        let mut step = |action: Action, run: &dyn Fn() -> Outcome| {
            progress.on_action_start(&action);
            let outcome = run();
            progress.on_action_complete(&action, &outcome);
            report.push(action, outcome);
        };

        if let Some(name) = &desired.hostname {
            step(Action::Hostname { name: name.clone() }, &|| {
                HostnameReconciler::new(self.probe, self.exec, self.recorder, self.paths)
                    .reconcile(name)
            });
        }

        if let Some(address) = &desired.ip_address {
            step(
                Action::Ip {
                    address: address.clone(),
                },
                &|| {
                    IpReconciler::new(self.probe, self.exec, self.recorder, self.paths)
                        .reconcile(address, desired.hostname.as_deref())
                },
            );
        }

        for (name, ip) in &desired.host_entries {
            step(
                Action::HostEntry {
                    name: name.clone(),
                    ip: ip.clone(),
                },
                &|| self.reconcile_host_entry(name, ip),
            );
        }

        if desired.is_empty() {
            log::info!("Nothing requested");
        }
        report
    }

    fn reconcile_host_entry(&self, name: &str, ip: &str) -> Outcome {
        let reader = StateReader::new(self.probe, self.paths);
        match edit_hosts_file(&reader, self.exec, |table| table.upsert(name, ip)) {
            Ok(false) => Outcome::NoChangeNeeded,
            Ok(true) => {
                let change = format!("hosts: {name} -> {ip}");
                log::info!("{change}");
                self.recorder.record(&change);
                Outcome::Applied(change)
            }
            Err(e) => {
                log::error!("Hosts entry {name} -> {ip} failed: {e}");
                Outcome::Failed(e.to_string())
            }
        }
    }
}
