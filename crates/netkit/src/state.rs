//! Current-state reads used before every mutating step

use crate::error::{Error, Result};
use crate::exec::HostProbe;
use crate::hosts::HostsTable;
use crate::types::{NetworkInterface, SystemPaths};

/// Reads live hostname, interface addresses and the hosts table.
///
/// Nothing is cached: each call goes back to the host, since the files it
/// reads are shared with whoever else edits them.
pub struct StateReader<'a> {
    probe: &'a dyn HostProbe,
    paths: &'a SystemPaths,
}

impl<'a> StateReader<'a> {
    pub fn new(probe: &'a dyn HostProbe, paths: &'a SystemPaths) -> Self {
        Self { probe, paths }
    }

    pub fn paths(&self) -> &SystemPaths {
        self.paths
    }

    /// The running kernel hostname
    pub fn current_hostname(&self) -> Result<String> {
        let argv = ["hostname"];
        let output = self.probe.capture(&argv)?;
        if !output.success() {
            return Err(Error::command_failed(&argv, &output));
        }
        Ok(output.stdout.trim().to_string())
    }

    /// First IPv4 address bound to `iface`, without its prefix length
    pub fn current_ip(&self, iface: &NetworkInterface) -> Result<Option<String>> {
        let argv = ["ip", "-4", "-o", "addr", "show", "dev", iface.name.as_str()];
        let output = self.probe.capture(&argv)?;
        if !output.success() {
            return Err(Error::command_failed(&argv, &output));
        }
        let ip = parse_first_inet(&output.stdout);
        log::debug!(
            "{} currently has {}",
            iface,
            ip.as_deref().unwrap_or("no IPv4 address")
        );
        Ok(ip)
    }

    /// The hosts file verbatim; a missing file reads as empty
    pub fn read_hosts_table(&self) -> Result<HostsTable> {
        let text = self
            .probe
            .read_file(&self.paths.hosts_file)?
            .unwrap_or_default();
        Ok(HostsTable::parse(&text))
    }
}

/// Pull the first `inet a.b.c.d/nn` address out of `ip -4 -o addr` output
fn parse_first_inet(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let mut tokens = line.split_whitespace();
        tokens.find(|t| *t == "inet")?;
        let cidr = tokens.next()?;
        let addr = cidr.split('/').next().unwrap_or(cidr);
        Some(addr.to_string())
    })
}
