//! Human and JSON rendering of a run

use anyhow::{Context, Result};
use netkit::{Action, Outcome, Progress, RunReport};

use crate::ui;

/// Prints each action as it starts and how it ended
pub struct VerboseProgress {
    total: usize,
    current: usize,
}

impl VerboseProgress {
    pub fn new(total: usize) -> Self {
        Self { total, current: 0 }
    }
}

impl Progress for VerboseProgress {
    fn on_action_start(&mut self, action: &Action) {
        self.current += 1;
        ui::step(self.current, self.total, &action.to_string());
    }

    fn on_action_complete(&mut self, _action: &Action, outcome: &Outcome) {
        match outcome {
            Outcome::NoChangeNeeded => ui::unchanged(),
            Outcome::Applied(change) => ui::applied(change),
            Outcome::Failed(reason) => ui::failed(reason),
        }
    }
}

/// Print final summary
pub fn print_summary(report: &RunReport) {
    if report.results.is_empty() {
        ui::info("Nothing to reconcile");
        return;
    }

    println!();
    if report.is_success() {
        ui::success("Network identity reconciled");
    } else {
        ui::warn("Network identity reconciled with errors");
    }

    if report.applied() > 0 {
        ui::tally(report.applied(), "changed");
    }
    if report.unchanged() > 0 {
        ui::tally(report.unchanged(), "already up to date");
    }
    if report.failed() > 0 {
        ui::tally(report.failed(), "failed");
    }
}

/// Print the report as pretty JSON on stdout
pub fn print_json(report: &RunReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize run report")?;
    println!("{json}");
    Ok(())
}
