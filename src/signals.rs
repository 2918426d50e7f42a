//! Keeps termination signals from cutting a reconciliation short
//!
//! While a [`SignalShield`] is alive, SIGINT, SIGTERM, SIGHUP, SIGQUIT and
//! SIGTSTP are ignored, so an action that has started always finishes
//! (successfully or not) instead of leaving a half-written file behind.
//! This does nothing against SIGKILL, crashes or power loss.

#[cfg(unix)]
const SHIELDED: [libc::c_int; 5] = [
    libc::SIGINT,
    libc::SIGTERM,
    libc::SIGHUP,
    libc::SIGQUIT,
    libc::SIGTSTP,
];

/// Scoped signal shield - previous dispositions come back on drop
pub struct SignalShield {
    #[cfg(unix)]
    previous: Vec<(libc::c_int, libc::sighandler_t)>,
}

impl SignalShield {
    #[cfg(unix)]
    pub fn engage() -> Self {
        let previous = SHIELDED
            .iter()
            .filter_map(|&sig| {
                // SAFETY: SIG_IGN is a valid disposition for all of these signals
                let old = unsafe { libc::signal(sig, libc::SIG_IGN) };
                if old == libc::SIG_ERR {
                    log::warn!("Could not ignore signal {sig}");
                    None
                } else {
                    Some((sig, old))
                }
            })
            .collect();
        log::debug!("Termination signals ignored until reconciliation ends");
        Self { previous }
    }

    #[cfg(not(unix))]
    pub fn engage() -> Self {
        Self {}
    }
}

impl Drop for SignalShield {
    fn drop(&mut self) {
        #[cfg(unix)]
        for &(sig, handler) in &self.previous {
            // SAFETY: restores the disposition that was installed before engage()
            unsafe {
                libc::signal(sig, handler);
            }
        }
    }
}
