//! Primary interface detection

use crate::error::{Error, Result};
use crate::exec::HostProbe;
use crate::types::NetworkInterface;

const LOOPBACK: &str = "lo";

/// Finds the interface that carries the host's identity
pub struct InterfaceDetector<'a> {
    probe: &'a dyn HostProbe,
}

impl<'a> InterfaceDetector<'a> {
    pub fn new(probe: &'a dyn HostProbe) -> Self {
        Self { probe }
    }

    /// The default-route interface, else the first non-loopback link.
    pub fn detect_primary(&self) -> Result<NetworkInterface> {
        let routes = self.probe_output(&["ip", "route", "show", "default"]);
        if let Some(name) = routes.as_deref().and_then(parse_default_route) {
            log::debug!("Primary interface from default route: {name}");
            return Ok(NetworkInterface::new(name));
        }

        let links = self.probe_output(&["ip", "-o", "link", "show"]);
        if let Some(name) = links.as_deref().and_then(parse_first_link) {
            log::debug!("No default route; using first non-loopback link: {name}");
            return Ok(NetworkInterface::new(name));
        }

        Err(Error::NoInterfaceFound)
    }

    /// Stdout of a probe; a failed probe just yields nothing
    fn probe_output(&self, argv: &[&str]) -> Option<String> {
        match self.probe.capture(argv) {
            Ok(output) if output.success() => Some(output.stdout),
            Ok(output) => {
                log::debug!("{}", Error::command_failed(argv, &output));
                None
            }
            Err(e) => {
                log::debug!("Could not run `{}`: {e}", argv.join(" "));
                None
            }
        }
    }
}

/// `default via 10.0.0.1 dev eth0 proto dhcp ...` -> `eth0`
fn parse_default_route(output: &str) -> Option<String> {
    output
        .lines()
        .filter(|line| line.trim_start().starts_with("default"))
        .find_map(|line| {
            let mut tokens = line.split_whitespace();
            tokens.find(|t| *t == "dev")?;
            tokens.next().map(str::to_string)
        })
}

/// `2: eth0: <BROADCAST,...> mtu 1500 ...` -> `eth0`, skipping loopback
fn parse_first_link(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let name = line.split(':').nth(1)?.trim();
        // veth-style names carry their peer: `veth0@if5`
        let name = name.split('@').next().unwrap_or(name);
        (!name.is_empty() && name != LOOPBACK).then(|| name.to_string())
    })
}
