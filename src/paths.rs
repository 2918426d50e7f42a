//! Path resolution for the files netident manages
//!
//! Every location can be redirected, which is how the tool is exercised
//! against a scratch root instead of `/etc`.
//!
//! # Environment Variables
//!
//! - `NETIDENT_HOSTNAME_FILE` - Override the hostname file (default `/etc/hostname`)
//! - `NETIDENT_HOSTS_FILE` - Override the hosts table (default `/etc/hosts`)
//! - `NETIDENT_NETPLAN_DIR` - Override the netplan directory (default `/etc/netplan`)

use netkit::SystemPaths;
use std::path::PathBuf;

/// Environment variable for hostname file override
pub const ENV_HOSTNAME_FILE: &str = "NETIDENT_HOSTNAME_FILE";

/// Environment variable for hosts file override
pub const ENV_HOSTS_FILE: &str = "NETIDENT_HOSTS_FILE";

/// Environment variable for netplan directory override
pub const ENV_NETPLAN_DIR: &str = "NETIDENT_NETPLAN_DIR";

/// Resolve all managed paths, applying environment overrides
pub fn system_paths() -> SystemPaths {
    let defaults = SystemPaths::default();
    SystemPaths {
        hostname_file: resolve(ENV_HOSTNAME_FILE, defaults.hostname_file),
        hosts_file: resolve(ENV_HOSTS_FILE, defaults.hosts_file),
        netplan_dir: resolve(ENV_NETPLAN_DIR, defaults.netplan_dir),
    }
}

fn resolve(var: &str, default: PathBuf) -> PathBuf {
    match std::env::var(var) {
        Ok(value) if !value.is_empty() => {
            let path = expand(&value);
            log::debug!("Using {} from {}: {}", default.display(), var, path.display());
            path
        }
        _ => default,
    }
}

/// Expand ~ and environment variables in a path string.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

// ============================================================================
// Tests
// ============================================================================
