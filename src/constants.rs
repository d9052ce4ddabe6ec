/*
 * This file is part of idg4400.
 *
 * Copyright (C) 2025 idg4400 contributors
 *
 * idg4400 is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * idg4400 is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with idg4400. If not, see <https://www.gnu.org/licenses/>.
 */

//! Constants for the IDG4400 platform
//!
//! Paths, register addresses, fan limits and thermal-algorithm tunables.
//! Other modules take their numbers from here.

/// Filesystem locations
pub mod paths {
    /// Root of the board support package sysfs tree
    pub const BSP_ROOT: &str = "/bsp";

    /// Thermal algorithm control file
    pub const ALGORITHM_CONTROL_FILE: &str = "/usr/src/local/mlnx/idg4400/.thermal_algorithm_control";

    /// Port I/O device used by the direct register backend
    pub const DEV_PORT: &str = "/dev/port";

    /// Register helper binary used by the subprocess backend
    pub const IORW_BINARY: &str = "iorw";

    /// Environment override for the register helper (emulators, tests)
    pub const IORW_ENV: &str = "IDG_IORW";

    /// Shared chassis fan speed control, relative to the BSP root
    pub const FAN_SPEED_SET: &str = "fan/fan_speed_set";
}

/// Platform identification
pub mod platform {
    pub const ONL_NAME: &str = "x86-64-mlnx-idg4400-r0";
    pub const ONIE_NAME: &str = "x86_64-mlnx_idg4400-r0";

    pub const CPLD_BOARD_VERSION: &str = "cpld/cpld_brd_version";
    pub const CPLD_MGMT_VERSION: &str = "cpld/cpld_mgmt_version";
    pub const CPLD_PORT_VERSION: &str = "cpld/cpld_port_version";
}

/// Entity counts of the fixed topology
pub mod topology {
    pub const CHASSIS_FAN_COUNT: u8 = 8;
    pub const FAN_COUNT: u8 = 10;
    pub const PSU_COUNT: u8 = 2;
    pub const THERMAL_COUNT: u8 = 13;
    pub const VOLTAGE_COUNT: u8 = 16;
}

/// LPC register map
pub mod registers {
    /// CPLD LPC base address
    pub const LPC_BASE: u32 = 0x2500;

    /// Register width used for every access
    pub const WIDTH: u8 = 1;

    /// Board status; bit 2 is clear once shutdown has latched
    pub const SHUTDOWN_STATUS: u32 = 0x2e;
    pub const SHUTDOWN_STATUS_MASK: u32 = 0x4;
    pub const SHUTDOWN_STATUS_SHIFT: u32 = 2;

    /// Shutdown write protection
    pub const SHUTDOWN_PROTECT: u32 = 0x2f;
    /// Value written to both shutdown registers to latch shutdown
    pub const SHUTDOWN_TRIGGER_VALUE: u32 = 0xfb;

    /// Watchdog clear / trigger
    pub const WATCHDOG_CLEAR: u32 = 0xc7;
    /// Watchdog clear protection
    pub const WATCHDOG_CLEAR_PROTECT: u32 = 0xc8;
    /// Watchdog timeout, as a power of two in milliseconds
    pub const WATCHDOG_TIMEOUT: u32 = 0xc9;
    /// Watchdog expiry action
    pub const WATCHDOG_ACTION: u32 = 0xcb;

    /// 2^14 ms, about 16 seconds
    pub const WATCHDOG_TIMEOUT_VALUE: u32 = 14;
    /// Full speed fans + counter increment on expiry
    pub const WATCHDOG_ACTION_VALUE: u32 = 0x90;
    pub const WATCHDOG_UNPROTECT_VALUE: u32 = 0xee;
    pub const WATCHDOG_ARM_VALUE: u32 = 0x11;
    pub const WATCHDOG_REFRESH_VALUE: u32 = 0x01;
}

/// Fan RPM limits per position
pub mod fan {
    pub const FRONT_MIN_RPM: u32 = 6300;
    pub const FRONT_MAX_RPM: u32 = 21000;
    pub const REAR_MIN_RPM: u32 = 5400;
    pub const REAR_MAX_RPM: u32 = 18000;
    pub const PSU_MAX_RPM: u32 = 18000;

    /// Valid-speed window, percent of the configured min / max
    pub const MIN_RPM_TOLERANCE_PCT: u32 = 87;
    pub const MAX_RPM_TOLERANCE_PCT: u32 = 112;

    /// LED goes red below this percentage of the minimum RPM
    pub const LED_MIN_RPM_PCT: u32 = 90;

    /// Full scale of the speed-set register
    pub const SPEED_SET_MAX: u32 = 255;
}

/// Thermal algorithm tunables
pub mod algorithm {
    /// Rate-of-rise trigger, milli-degrees since the last baseline
    pub const FAST_RISE_DELTA_MCELSIUS: i32 = 4000;
    /// Fast-rise escalation, percent of current speed
    pub const FAST_RISE_FACTOR_PCT: u32 = 120;
    /// Steady-climb escalation, percent of current speed
    pub const STEADY_CLIMB_FACTOR_PCT: u32 = 110;
    /// Cold decay, percent of current speed
    pub const COLD_DECAY_FACTOR_PCT: u32 = 90;
    /// Ticks suppressed after a speed change (30 x 10 s = 5 min)
    pub const COOLDOWN_TICKS: u32 = 30;
    /// Lowest speed the chassis fans accept
    pub const PLATFORM_MIN_PCT: u32 = 60;
    pub const FULL_SPEED_PCT: u32 = 100;
}

/// Scheduler timing
pub mod timing {
    use std::time::Duration;

    /// Period between control passes
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);
}
