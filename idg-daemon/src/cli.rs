//! Command line interface

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use idg4400::constants::{paths, timing};

#[derive(Parser, Debug)]
#[command(name = "idg-thermald")]
#[command(version)]
#[command(about = "IDG4400 thermal management daemon")]
#[command(long_about = "IDG4400 thermal management daemon

Runs the chassis thermal control loop, the front-panel LED manager and the
voltage rail monitor once per period.

EXAMPLES:
    idg-thermald                                  Run with the BSP tree at /bsp
    idg-thermald --once --json                    One pass, report as JSON
    idg-thermald --bsp-root /tmp/bsp --register-access memory

ENVIRONMENT VARIABLES:
    IDG_LOG=debug          Log filter, overrides the control file syslog_level
    IDG_IORW=/path/iorw    Register helper used by --register-access iorw

FILES:
    /usr/src/local/mlnx/idg4400/.thermal_algorithm_control   enable / syslog_level")]
pub struct Cli {
    /// Root of the BSP sysfs tree
    #[arg(long, default_value = paths::BSP_ROOT)]
    pub bsp_root: PathBuf,

    /// Thermal algorithm control file
    #[arg(long, default_value = paths::ALGORITHM_CONTROL_FILE)]
    pub config: PathBuf,

    /// Seconds between control passes
    #[arg(long, default_value_t = timing::DEFAULT_INTERVAL.as_secs(), value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_secs: u64,

    /// How CPLD registers are reached
    #[arg(long, value_enum, default_value_t = RegisterAccess::Devport)]
    pub register_access: RegisterAccess,

    /// Run a single pass and exit with its status
    #[arg(long)]
    pub once: bool,

    /// Print every pass report as a JSON line on stdout
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RegisterAccess {
    /// Port I/O through /dev/port
    Devport,
    /// The vendor iorw helper
    Iorw,
    /// In-memory registers, for bench runs without a CPLD
    Memory,
}
