//! # netkit
//!
//! Reconcile a Linux host's network identity toward desired values.
//!
//! This crate provides functionality for:
//! - Detecting the primary interface and reading the live hostname and address
//! - Editing the hosts table idempotently
//! - Assigning an address through netplan, falling back to plain `ip` commands
//! - Running hostname, IP and hosts-entry actions in a fixed order
//!
//! ## Example
//!
//! ```ignore
//! use netkit::{DesiredState, MemoryRecorder, NoProgress, Orchestrator, SystemPaths};
//!
//! let desired = DesiredState::new(Some("web-01".into()), Some("10.0.0.5".into()), vec![]);
//! let paths = SystemPaths::default();
//! let recorder = MemoryRecorder::new();
//!
//! // `probe` implements HostProbe, `exec` implements PrivilegedExecutor
//! let report = Orchestrator::new(&probe, &exec, &recorder, &paths)
//!     .run(&desired, &mut NoProgress);
//! std::process::exit(if report.is_success() { 0 } else { 1 });
//! ```
//!
//! ## Capability Traits
//!
//! Nothing here touches the host directly:
//!
//! - [`HostProbe`]: unprivileged reads (commands, files, directories)
//! - [`PrivilegedExecutor`]: mutating commands, elevated when needed
//! - [`ChangeRecorder`]: audit sink for applied changes
//! - [`Progress`]: per-action progress reporting
//!
//! Every action reads current state right before mutating it and takes no
//! lock, so concurrent edits of the hosts file or netplan document by someone
//! else during a run can be lost.

#![warn(clippy::all)]

pub mod backend;
pub mod detect;
pub mod error;
pub mod exec;
pub mod hostname;
pub mod hosts;
pub mod ip;
pub mod orchestrator;
pub mod state;
pub mod types;

mod rewrite;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{BackendKind, DirectBackend, IpBackend, NetplanBackend, PREFIX_LEN};
pub use detect::InterfaceDetector;
pub use error::{Error, Result};
pub use exec::{ChangeRecorder, CommandOutput, HostProbe, MemoryRecorder, PrivilegedExecutor};
pub use hostname::HostnameReconciler;
pub use hosts::{HostsTable, LOCALHOST_ALIAS_ADDR};
pub use ip::IpReconciler;
pub use orchestrator::{NoProgress, Orchestrator, Progress};
pub use state::StateReader;
pub use types::{
    Action, ActionResult, DesiredState, NetworkInterface, Outcome, RunReport, SystemPaths,
};
