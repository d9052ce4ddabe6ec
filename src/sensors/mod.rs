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

//! Sensor records and the accessor boundary
//!
//! Records are built fresh on every accessor call and never cached.
//! [`Platform`] is everything the thermal loop and the LED manager need
//! from the hardware; [`SysfsPlatform`] implements it over the BSP tree.

pub mod file;
pub mod sysfs;

use idg_error::Result;
use serde::Serialize;

use crate::types::{FanId, LedId, LedMode, PsuId, ThermalId, VoltageId};

pub use sysfs::SysfsPlatform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FanInfo {
    pub id: FanId,
    pub present: bool,
    pub failed: bool,
    pub rpm: i32,
    /// Speed as a percentage of the position's maximum RPM
    pub percentage: u32,
}

impl FanInfo {
    pub fn not_present(id: FanId) -> Self {
        Self { id, present: false, failed: false, rpm: 0, percentage: 0 }
    }
}

/// Per-sensor limits in milli-degrees; 0 means none
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ThermalThresholds {
    pub warning: i32,
    pub shutdown: i32,
}

impl ThermalThresholds {
    pub fn exceeds_shutdown(&self, mcelsius: i32) -> bool {
        self.shutdown > 0 && mcelsius > self.shutdown
    }

    pub fn exceeds_warning(&self, mcelsius: i32) -> bool {
        self.warning > 0 && mcelsius > self.warning
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThermalInfo {
    pub id: ThermalId,
    pub present: bool,
    pub failed: bool,
    pub mcelsius: i32,
    pub thresholds: ThermalThresholds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PsuInfo {
    pub id: PsuId,
    pub present: bool,
    /// Present but without input power
    pub unplugged: bool,
    pub failed: bool,
}

impl PsuInfo {
    /// Present and powered
    pub fn is_operational(&self) -> bool {
        self.present && !self.unplugged
    }
}

/// Valid rail range in millivolts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct VoltageRange {
    pub min: i32,
    pub max: i32,
}

impl VoltageRange {
    /// Ranges with `max <= min` carry no information
    pub fn is_defined(&self) -> bool {
        self.max > self.min
    }

    pub fn contains(&self, millivolts: i32) -> bool {
        self.min <= millivolts && millivolts <= self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoltageInfo {
    pub id: VoltageId,
    pub present: bool,
    pub failed: bool,
    pub millivolts: i32,
    pub range: VoltageRange,
}

/// Hardware accessors consumed by the control loop
///
/// Errors follow the platform status classes: I/O failures are `INTERNAL`,
/// missing capabilities `UNSUPPORTED`, rejected speeds `INVALID` / `PARAM`.
#[cfg_attr(test, mockall::automock)]
pub trait Platform {
    fn fan_info(&self, id: FanId) -> Result<FanInfo>;
    fn thermal_info(&self, id: ThermalId) -> Result<ThermalInfo>;
    fn psu_info(&self, id: PsuId) -> Result<PsuInfo>;
    fn voltage_info(&self, id: VoltageId) -> Result<VoltageInfo>;
    fn set_fan_percentage(&self, id: FanId, percentage: u32) -> Result<()>;
    fn set_led_mode(&self, id: LedId, mode: LedMode) -> Result<()>;
}

impl<P: Platform + ?Sized> Platform for &P {
    fn fan_info(&self, id: FanId) -> Result<FanInfo> {
        (**self).fan_info(id)
    }

    fn thermal_info(&self, id: ThermalId) -> Result<ThermalInfo> {
        (**self).thermal_info(id)
    }

    fn psu_info(&self, id: PsuId) -> Result<PsuInfo> {
        (**self).psu_info(id)
    }

    fn voltage_info(&self, id: VoltageId) -> Result<VoltageInfo> {
        (**self).voltage_info(id)
    }

    fn set_fan_percentage(&self, id: FanId, percentage: u32) -> Result<()> {
        (**self).set_fan_percentage(id, percentage)
    }

    fn set_led_mode(&self, id: LedId, mode: LedMode) -> Result<()> {
        (**self).set_led_mode(id, mode)
    }
}
