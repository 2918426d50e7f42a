mod audit;
mod cli;
mod paths;
mod report;
mod runner;
mod signals;
mod sudo;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::Cli;
use netkit::{NoProgress, Orchestrator};
use std::io;
use std::process::ExitCode;

use audit::SyslogRecorder;
use report::VerboseProgress;
use runner::LocalProbe;
use signals::SignalShield;
use sudo::SudoExecutor;

fn main() -> ExitCode {
    // Usage errors exit 1 before anything is touched
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = cli::parse_error_code(&e);
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    if let Some(shell) = cli.completions {
        generate(shell, &mut Cli::command(), "netident", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            ui::error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

/// Reconcile everything requested; `Ok(false)` if any action failed
fn run(cli: &Cli) -> Result<bool> {
    let desired = cli.desired_state();
    let paths = paths::system_paths();
    let progress_output = cli.verbose > 0 && !cli.quiet && !cli.json;

    // Held until the report is out, so no action is cut short
    let _shield = SignalShield::engage();

    let probe = LocalProbe;
    let exec = SudoExecutor::detect();
    let recorder = SyslogRecorder::default();
    let orchestrator = Orchestrator::new(&probe, &exec, &recorder, &paths);

    let report = if progress_output {
        ui::header("Reconciling network identity");
        let mut progress = VerboseProgress::new(desired.action_count());
        orchestrator.run(&desired, &mut progress)
    } else {
        orchestrator.run(&desired, &mut NoProgress)
    };

    if cli.json {
        report::print_json(&report)?;
    } else if progress_output {
        report::print_summary(&report);
    }

    Ok(report.is_success())
}
