//! Direct backend: imperative `ip` commands, nothing persisted.

use super::{IpBackend, cidr};
use crate::error::Result;
use crate::exec::PrivilegedExecutor;
use crate::types::NetworkInterface;

pub struct DirectBackend<'a> {
    exec: &'a dyn PrivilegedExecutor,
}

impl<'a> DirectBackend<'a> {
    pub fn new(exec: &'a dyn PrivilegedExecutor) -> Self {
        Self { exec }
    }

    /// Run a step whose failure is not fatal
    fn run_tolerated(&self, argv: &[&str]) {
        match self.exec.run_checked(argv) {
            Ok(_) => {}
            Err(e) => log::warn!("Ignoring failure: {e}"),
        }
    }
}

impl IpBackend for DirectBackend<'_> {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn apply(&self, iface: &NetworkInterface, ip: &str) -> Result<()> {
        let dev = iface.name.as_str();
        let address = cidr(ip);

        // An interface with nothing to flush is a fine starting point
        self.run_tolerated(&["ip", "addr", "flush", "dev", dev]);

        self.exec
            .run_checked(&["ip", "addr", "add", address.as_str(), "dev", dev])?;

        // Might already be up
        self.run_tolerated(&["ip", "link", "set", dev, "up"]);

        log::info!("Assigned {address} to {dev}");
        Ok(())
    }
}
