use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::exec::HostProbe;
use crate::types::NetworkInterface;

pub mod direct;
pub mod netplan;

pub use direct::DirectBackend;
pub use netplan::NetplanBackend;

/// Prefix length used for every assigned address.
///
/// Fixed at /24; there is no netmask resolution.
pub const PREFIX_LEN: u8 = 24;

/// Backend trait for IP assignment
///
/// This trait abstracts how an address ends up on an interface, allowing us to:
/// - Render it through netplan when the host is managed that way
/// - Fall back to plain `ip` commands otherwise
/// - Mock for testing
pub trait IpBackend {
    /// Short name used in logs and errors
    fn name(&self) -> &'static str;

    /// Assign `ip/PREFIX_LEN` to `iface`
    fn apply(&self, iface: &NetworkInterface, ip: &str) -> Result<()>;
}

/// Which backend a reconciliation should use first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Netplan,
    Direct,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Netplan => f.write_str("netplan"),
            BackendKind::Direct => f.write_str("direct"),
        }
    }
}

/// `ip/PREFIX_LEN`
pub fn cidr(ip: &str) -> String {
    format!("{ip}/{PREFIX_LEN}")
}

/// Netplan documents in `dir`, sorted so the first one is authoritative
pub fn netplan_files(probe: &dyn HostProbe, dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = probe
        .list_dir(dir)?
        .unwrap_or_default()
        .into_iter()
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e == "yaml" || e == "yml")
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Netplan if its CLI is installed and its directory holds at least one
/// document, otherwise direct.
pub fn select_backend(probe: &dyn HostProbe, netplan_dir: &Path) -> BackendKind {
    if !probe.command_exists("netplan") {
        log::debug!("netplan not installed; using direct backend");
        return BackendKind::Direct;
    }

    match netplan_files(probe, netplan_dir) {
        Ok(files) if !files.is_empty() => {
            log::debug!(
                "netplan manages this host ({} document(s) in {})",
                files.len(),
                netplan_dir.display()
            );
            BackendKind::Netplan
        }
        Ok(_) => {
            log::debug!(
                "No netplan documents in {}; using direct backend",
                netplan_dir.display()
            );
            BackendKind::Direct
        }
        Err(e) => {
            log::warn!(
                "Could not inspect {} ({e}); using direct backend",
                netplan_dir.display()
            );
            BackendKind::Direct
        }
    }
}
