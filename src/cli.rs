use clap::{ArgAction, Parser};
use clap_complete::Shell;
use netkit::DesiredState;

#[derive(Parser, Debug)]
#[command(name = "netident")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Reconcile hostname, primary IP and /etc/hosts entries", long_about = None)]
pub struct Cli {
    /// Desired hostname
    #[arg(long, value_name = "HOSTNAME", env = "NETIDENT_NAME")]
    pub name: Option<String>,

    /// Desired IPv4 address for the primary interface (assigned as /24)
    #[arg(long, value_name = "ADDRESS", env = "NETIDENT_IP")]
    pub ip: Option<String>,

    /// Ensure HOSTNAME resolves to ADDRESS in /etc/hosts (repeatable)
    #[arg(
        long = "hostentry",
        num_args = 2,
        value_names = ["HOSTNAME", "ADDRESS"],
        action = ArgAction::Append
    )]
    pub hostentry: Vec<String>,

    /// Print progress to stdout (repeat for more log detail)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,

    /// Generate shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

impl Cli {
    /// The validated request handed to the reconcilers
    pub fn desired_state(&self) -> DesiredState {
        let host_entries = self
            .hostentry
            .chunks_exact(2)
            .map(|pair| (pair[0].clone(), pair[1].clone()))
            .collect();
        DesiredState::new(self.name.clone(), self.ip.clone(), host_entries)
    }
}

/// Exit code for a failed parse: 0 for `--help`/`--version`, 1 otherwise
pub fn parse_error_code(err: &clap::Error) -> u8 {
    u8::from(err.use_stderr())
}
