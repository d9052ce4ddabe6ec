//! IDG4400 thermal daemon (idg-thermald)
//!
//! Drives the platform thermal loop at a fixed period on the switch host.
//!
//! # Responsibilities
//! - **Thermal**: one `manage_fans` pass per period, watchdog kept alive
//! - **LEDs**: fan tray, PSU and system LEDs follow the sampled state
//! - **Voltages**: out-of-range rails logged on transition
//! - **Signals**: SIGINT/SIGTERM stop the loop after the current pass

mod cli;
mod supervisor;

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use idg4400::config::load_control;
use idg4400::registers::{DevPortBus, IorwBus, MemoryBus};
use idg4400::sensors::SysfsPlatform;
use idg4400::system::platform_info;
use idg4400::thermal::ThermalController;
use tokio::sync::Notify;
use tracing::level_filters::LevelFilter;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use cli::{Cli, RegisterAccess};
use supervisor::{Bus, Supervisor};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log filter override
const LOG_ENV: &str = "IDG_LOG";

/// Syslog identifier in the journal
const JOURNAL_IDENTIFIER: &str = "idg-thermal";

// ============================================================================
// Logging
// ============================================================================

/// `IDG_LOG` first, then the control file's `syslog_level`, then `warn`
fn log_filter(control_file: &Path) -> EnvFilter {
    if let Ok(directives) = std::env::var(LOG_ENV) {
        return EnvFilter::new(directives);
    }
    let level = load_control(control_file)
        .map(|control| control.syslog_level.level_filter())
        .unwrap_or(LevelFilter::WARN);
    EnvFilter::default().add_directive(level.into())
}

/// Journal when available, stdout otherwise. Returns true for the journal.
fn init_logging(control_file: &Path) -> bool {
    use tracing_subscriber::prelude::*;

    let filter = log_filter(control_file);

    if Path::new("/run/systemd/journal/socket").exists() {
        match tracing_journald::layer() {
            Ok(layer) => {
                tracing_subscriber::registry()
                    .with(layer.with_syslog_identifier(JOURNAL_IDENTIFIER.to_string()))
                    .with(filter)
                    .init();
                return true;
            }
            Err(e) => {
                eprintln!("Failed to create journald layer: {}, falling back to stdout", e);
            }
        }
    }

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
    false
}

// ============================================================================
// Startup
// ============================================================================

fn check_privileges(access: RegisterAccess) {
    // SAFETY: geteuid has no preconditions and only returns the effective user id.
    let euid = unsafe { libc::geteuid() };
    if euid != 0 && access != RegisterAccess::Memory {
        warn!(euid, "Not running as root, register and BSP access will likely fail");
    }
}

fn register_bus(access: RegisterAccess) -> Bus {
    match access {
        RegisterAccess::Devport => Box::new(DevPortBus::new()),
        RegisterAccess::Iorw => Box::new(IorwBus::new()),
        RegisterAccess::Memory => Box::new(MemoryBus::new()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let journald = init_logging(&cli.config);

    info!("STARTUP: idg-thermald {} starting", VERSION);
    info!("STARTUP: Logging to {}", if journald { "systemd journal" } else { "stderr" });
    info!("STARTUP: BSP root: {}", cli.bsp_root.display());
    info!("STARTUP: Register access: {:?}", cli.register_access);

    check_privileges(cli.register_access);

    match platform_info(&cli.bsp_root) {
        Ok(info) => info!("STARTUP: CPLD versions {}", info),
        Err(e) => warn!(error = %e, "Could not read CPLD versions"),
    }

    let controller = ThermalController::new(SysfsPlatform::new(&cli.bsp_root), register_bus(cli.register_access))
        .with_control_file(&cli.config);
    let supervisor = Supervisor::new(controller);

    if cli.once {
        let status = supervisor::run_once(supervisor, cli.json).await?;
        if status != 0 {
            error!(status, "Thermal pass failed");
            std::process::exit(status.unsigned_abs() as i32);
        }
        return Ok(());
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    let wake = Arc::new(Notify::new());
    {
        let shutdown = shutdown.clone();
        let wake = wake.clone();
        if let Err(e) = ctrlc::set_handler(move || {
            info!("SIGNAL: Received SIGINT/SIGTERM - stopping after the current pass");
            shutdown.store(true, Ordering::SeqCst);
            wake.notify_one();
        }) {
            warn!("Failed to set signal handler: {}. Shutdown via signals may not work cleanly.", e);
        }
    }

    supervisor::run(supervisor, Duration::from_secs(cli.interval_secs), shutdown, wake, cli.json).await?;

    info!("SHUTDOWN: idg-thermald stopped");
    Ok(())
}
