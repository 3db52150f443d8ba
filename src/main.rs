use anyhow::Result;
use armoury::cli::{Cli, Command};
use armoury::config::{ArmouryConfig, BackendKind};
use armoury::detect::SystemInfo;
use armoury::device::DeviceContext;
use armoury::registry::DeviceRegistry;
use armoury::surface::Surface;
use armoury::sysfs::SysfsRoot;
use clap::Parser;
use colored::Colorize;
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = armoury::config::load(cli.config.as_ref());
    if cli.device.is_some() {
        config.device.name = cli.device.clone();
    }

    match cli.command {
        Command::Devices => cmd_devices(cli.json),
        Command::Info => cmd_info(&config, cli.json)?,
        Command::Read { attribute } => cmd_read(&config, &attribute)?,
        Command::Write { attribute, value } => cmd_write(&config, &attribute, &value)?,
        Command::Completions { shell } => armoury::cli::print_completions(shell),
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env("ARMOURY_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Detect the system and attach the configured device.
fn attach(config: &ArmouryConfig, operation: &str) -> Result<Arc<DeviceContext>> {
    if config.backend.kind == BackendKind::AcpiCall && !nix::unistd::geteuid().is_root() {
        return Err(armoury::Error::NotRoot {
            operation: operation.to_string(),
        }
        .into());
    }

    let sysfs = SysfsRoot::system();
    let system = SystemInfo::detect(&sysfs);
    let registry = DeviceRegistry::new();
    Ok(registry.attach_detected(&sysfs, &system, config)?)
}

fn cmd_devices(json: bool) {
    let system = SystemInfo::detect(&SysfsRoot::system());
    if json {
        armoury::output::print_devices_json(&system.acpi_devices);
    } else {
        armoury::output::print_devices(&system.acpi_devices);
    }
}

fn cmd_info(config: &ArmouryConfig, json: bool) -> Result<()> {
    let device = attach(config, "info")?;
    let report = armoury::output::InfoReport::collect(&device)?;

    if json {
        armoury::output::print_info_json(&report);
    } else {
        armoury::output::print_info(&report);
        if report.features.none() {
            println!(
                "  {} No toggles answered on this machine. Try {} to see why.",
                "Note:".yellow(),
                "armoury -vv info".cyan()
            );
        }
    }

    device.detach();
    Ok(())
}

fn cmd_read(config: &ArmouryConfig, attribute: &str) -> Result<()> {
    let surface = Surface::new(attach(config, "read")?);
    let result = surface.show_named(attribute);
    surface.device().detach();

    match result {
        Ok(text) => {
            print!("{}", text);
            Ok(())
        }
        Err(e) => exit_with(e),
    }
}

fn cmd_write(config: &ArmouryConfig, attribute: &str, value: &str) -> Result<()> {
    let surface = Surface::new(attach(config, "write")?);
    let result = surface.store_named(attribute, value);
    surface.device().detach();

    match result {
        Ok(_) => Ok(()),
        Err(e) => exit_with(e),
    }
}

/// Report a surface error and exit with its errno as status.
fn exit_with(e: armoury::SurfaceError) -> ! {
    let errno = e.errno();
    eprintln!("{} {} ({})", "error:".red().bold(), e, errno);
    std::process::exit(errno as i32);
}
