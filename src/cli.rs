use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "armoury",
    about = "GPU MUX, dGPU disable and eGPU toggles for gaming laptops",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output as JSON instead of formatted tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Use this config file instead of /etc/armoury and ~/.config/armoury
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// ACPI device to attach to (e.g. ATK4001:00); defaults to the first match
    #[arg(long, global = true)]
    pub device: Option<String>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// List ACPI devices armoury can attach to
    Devices,

    /// Show detected vendor, firmware dialect and supported toggles
    Info,

    /// Read an attribute (gpu_mux, dgpu_disable, egpu_enable, vendor, product, supported_features)
    Read {
        attribute: String,
    },

    /// Write 0 or 1 to a toggle attribute (gpu_mux, dgpu_disable, egpu_enable)
    Write {
        attribute: String,
        value: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (auto-detected if omitted)
        shell: Option<Shell>,
    },
}

/// Print shell completions to stdout.
pub fn print_completions(shell: Option<Shell>) {
    let shell = shell.or_else(Shell::from_env).unwrap_or_else(|| {
        eprintln!(
            "Could not detect shell. Specify one: armoury completions bash|zsh|fish|elvish|powershell"
        );
        std::process::exit(1);
    });
    clap_complete::generate(shell, &mut Cli::command(), "armoury", &mut std::io::stdout());
}
