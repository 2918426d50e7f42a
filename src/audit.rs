//! Audit trail for applied changes

use netkit::ChangeRecorder;

use crate::runner;

/// Tag attached to every syslog line
pub const SYSLOG_TAG: &str = "netident";

/// Sends each change to syslog through `logger`
pub struct SyslogRecorder {
    tag: String,
}

impl SyslogRecorder {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }
}

impl Default for SyslogRecorder {
    fn default() -> Self {
        Self::new(SYSLOG_TAG)
    }
}

impl ChangeRecorder for SyslogRecorder {
    fn record(&self, message: &str) {
        log::info!(target: "audit", "{message}");
        match runner::run_capture("logger", &["-t", self.tag.as_str(), "--", message]) {
            Ok(output) if output.success() => {}
            Ok(output) => log::warn!(
                "Could not write audit record to syslog: {}",
                output.stderr.trim()
            ),
            Err(e) => log::warn!("Could not run logger for audit record: {e}"),
        }
    }
}
