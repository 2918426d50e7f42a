//! Core types for network identity reconciliation

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// What the operator asked for. Built once from validated arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesiredState {
    pub hostname: Option<String>,
    pub ip_address: Option<String>,
    /// Explicit `(name, ip)` hosts-table requests, in the order supplied
    pub host_entries: Vec<(String, String)>,
}

impl DesiredState {
    pub fn new(
        hostname: Option<String>,
        ip_address: Option<String>,
        host_entries: Vec<(String, String)>,
    ) -> Self {
        Self {
            hostname,
            ip_address,
            host_entries,
        }
    }

    /// True when no action was requested at all
    pub fn is_empty(&self) -> bool {
        self.action_count() == 0
    }

    /// Number of reconciliation actions this request will run
    pub fn action_count(&self) -> usize {
        usize::from(self.hostname.is_some())
            + usize::from(self.ip_address.is_some())
            + self.host_entries.len()
    }
}

/// A network interface, identified by name only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInterface {
    pub name: String,
}

impl NetworkInterface {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for NetworkInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Locations of the persisted state this crate reads and writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemPaths {
    pub hostname_file: PathBuf,
    pub hosts_file: PathBuf,
    pub netplan_dir: PathBuf,
}

impl Default for SystemPaths {
    fn default() -> Self {
        Self {
            hostname_file: PathBuf::from("/etc/hostname"),
            hosts_file: PathBuf::from("/etc/hosts"),
            netplan_dir: PathBuf::from("/etc/netplan"),
        }
    }
}

/// Result of one reconciliation action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum Outcome {
    /// Current state already matched
    NoChangeNeeded,
    /// A change was made; carries a short description of it
    Applied(String),
    /// The action failed; earlier sub-steps may have taken effect
    Failed(String),
}

impl Outcome {
    /// `NoChangeNeeded` counts as success
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }

    pub fn is_change(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// One requested reconciliation action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    Hostname { name: String },
    Ip { address: String },
    HostEntry { name: String, ip: String },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Hostname { name } => write!(f, "hostname {name}"),
            Action::Ip { address } => write!(f, "ip {address}"),
            Action::HostEntry { name, ip } => write!(f, "hosts entry {name} -> {ip}"),
        }
    }
}

/// An action paired with how it went
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionResult {
    pub action: Action,
    pub outcome: Outcome,
}

/// Everything a run did, in execution order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub results: Vec<ActionResult>,
}

impl RunReport {
    pub fn push(&mut self, action: Action, outcome: Outcome) {
        self.results.push(ActionResult { action, outcome });
    }

    /// Success iff no action failed. An empty run is a success.
    pub fn is_success(&self) -> bool {
        self.results.iter().all(|r| r.outcome.is_success())
    }

    pub fn applied(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_change()).count()
    }

    pub fn unchanged(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.outcome == Outcome::NoChangeNeeded)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.results
            .iter()
            .filter(|r| !r.outcome.is_success())
            .count()
    }
}
