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

//! Typed identifiers for every entity of the fixed IDG4400 topology
//!
//! Fans 1-8 sit on the main board in front/rear pairs sharing one FRU;
//! fans 9 and 10 are the single fans of PSU1 and PSU2.

use std::fmt;

use idg_error::{PlatformError, Result};
use serde::Serialize;

use crate::constants::{fan, topology};

/// Mounting position of a fan, which decides its RPM limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FanPosition {
    Front,
    Rear,
    Psu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FanId(u8);

impl FanId {
    /// Chassis fan carrying the shared speed setting
    pub const PRIMARY: FanId = FanId(1);

    pub fn new(id: u8) -> Result<Self> {
        if (1..=topology::FAN_COUNT).contains(&id) {
            Ok(FanId(id))
        } else {
            Err(PlatformError::invalid_entity(format!("fan {}", id)))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Main-board fans in ascending order
    pub fn chassis() -> impl Iterator<Item = FanId> {
        (1..=topology::CHASSIS_FAN_COUNT).map(FanId)
    }

    /// PSU fans in ascending order
    pub fn psu_fans() -> impl Iterator<Item = FanId> {
        (topology::CHASSIS_FAN_COUNT + 1..=topology::FAN_COUNT).map(FanId)
    }

    pub fn all() -> impl Iterator<Item = FanId> {
        (1..=topology::FAN_COUNT).map(FanId)
    }

    pub fn is_chassis(self) -> bool {
        self.0 <= topology::CHASSIS_FAN_COUNT
    }

    pub fn position(self) -> FanPosition {
        if !self.is_chassis() {
            FanPosition::Psu
        } else if self.0 % 2 == 1 {
            FanPosition::Front
        } else {
            FanPosition::Rear
        }
    }

    /// Fan tray (FRU) holding this chassis fan; two fans per tray
    pub fn fru(self) -> u8 {
        (self.0 + 1) / 2
    }

    /// PSU carrying this fan, if any
    pub fn psu(self) -> Option<PsuId> {
        if self.is_chassis() {
            None
        } else {
            Some(PsuId(self.0 - topology::CHASSIS_FAN_COUNT))
        }
    }

    pub fn min_rpm(self) -> u32 {
        match self.position() {
            FanPosition::Front => fan::FRONT_MIN_RPM,
            FanPosition::Rear => fan::REAR_MIN_RPM,
            FanPosition::Psu => 0,
        }
    }

    pub fn max_rpm(self) -> u32 {
        match self.position() {
            FanPosition::Front => fan::FRONT_MAX_RPM,
            FanPosition::Rear => fan::REAR_MAX_RPM,
            FanPosition::Psu => fan::PSU_MAX_RPM,
        }
    }

    /// `min * 0.87 < rpm < max * 1.12`, evaluated in integers
    pub fn rpm_in_valid_range(self, rpm: i32) -> bool {
        let rpm = i64::from(rpm) * 100;
        let low = i64::from(self.min_rpm()) * i64::from(fan::MIN_RPM_TOLERANCE_PCT);
        let high = i64::from(self.max_rpm()) * i64::from(fan::MAX_RPM_TOLERANCE_PCT);
        low < rpm && rpm < high
    }
}

impl fmt::Display for FanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.psu() {
            Some(psu) => write!(f, "PSU-{} Fan", psu.get()),
            None => write!(f, "Chassis Fan {}", self.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PsuId(u8);

impl PsuId {
    pub fn new(id: u8) -> Result<Self> {
        if (1..=topology::PSU_COUNT).contains(&id) {
            Ok(PsuId(id))
        } else {
            Err(PlatformError::invalid_entity(format!("psu {}", id)))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = PsuId> {
        (1..=topology::PSU_COUNT).map(PsuId)
    }

    /// The fan built into this PSU
    pub fn fan(self) -> FanId {
        FanId(topology::CHASSIS_FAN_COUNT + self.0)
    }
}

impl fmt::Display for PsuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PSU-{}", self.0)
    }
}

/// Thermal sensors, in platform table order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThermalId {
    CpuCore0,
    CpuCore1,
    CpuCore2,
    CpuCore3,
    CpuPack,
    Front,
    Rear,
    Pex,
    Nps,
    Tcam,
    Mnb,
    Psu1,
    Psu2,
}

impl ThermalId {
    pub const ALL: [ThermalId; topology::THERMAL_COUNT as usize] = [
        ThermalId::CpuCore0,
        ThermalId::CpuCore1,
        ThermalId::CpuCore2,
        ThermalId::CpuCore3,
        ThermalId::CpuPack,
        ThermalId::Front,
        ThermalId::Rear,
        ThermalId::Pex,
        ThermalId::Nps,
        ThermalId::Tcam,
        ThermalId::Mnb,
        ThermalId::Psu1,
        ThermalId::Psu2,
    ];

    /// Sensor file name under `thermal/`
    pub fn file_name(self) -> &'static str {
        match self {
            ThermalId::CpuCore0 => "cpu_core0",
            ThermalId::CpuCore1 => "cpu_core1",
            ThermalId::CpuCore2 => "cpu_core2",
            ThermalId::CpuCore3 => "cpu_core3",
            ThermalId::CpuPack => "cpu_pack",
            ThermalId::Front => "board_amb",
            ThermalId::Rear => "port_amb",
            ThermalId::Pex => "pex",
            ThermalId::Nps => "nps",
            ThermalId::Tcam => "tcam",
            ThermalId::Mnb => "mnb",
            ThermalId::Psu1 => "psu1",
            ThermalId::Psu2 => "psu2",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ThermalId::CpuCore0 => "CPU Core 0",
            ThermalId::CpuCore1 => "CPU Core 1",
            ThermalId::CpuCore2 => "CPU Core 2",
            ThermalId::CpuCore3 => "CPU Core 3",
            ThermalId::CpuPack => "CPU pack",
            ThermalId::Front => "Chassis Thermal Sensor (Front)",
            ThermalId::Rear => "Chassis Thermal Sensor (Rear)",
            ThermalId::Pex => "PEX",
            ThermalId::Nps => "NPS",
            ThermalId::Tcam => "TCAM",
            ThermalId::Mnb => "MNB",
            ThermalId::Psu1 => "PSU-1 Thermal Sensor",
            ThermalId::Psu2 => "PSU-2 Thermal Sensor",
        }
    }

    /// PSU housing this sensor, if any
    pub fn psu(self) -> Option<PsuId> {
        match self {
            ThermalId::Psu1 => Some(PsuId(1)),
            ThermalId::Psu2 => Some(PsuId(2)),
            _ => None,
        }
    }
}

impl fmt::Display for ThermalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Monitored voltage rails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VoltageId {
    Cpu0V9,
    Cpu1V05,
    Cpu1V8,
    CpuPch,
    Ddr3V0675,
    Ddr3V135,
    Lan,
    Psu2Vin,
    Psu2Vout,
    Sys,
    Usb,
    VcoreVin,
    VcoreVout1,
    VcoreVout2,
    VmonVin,
    VmonVout,
}

impl VoltageId {
    pub const ALL: [VoltageId; topology::VOLTAGE_COUNT as usize] = [
        VoltageId::Cpu0V9,
        VoltageId::Cpu1V05,
        VoltageId::Cpu1V8,
        VoltageId::CpuPch,
        VoltageId::Ddr3V0675,
        VoltageId::Ddr3V135,
        VoltageId::Lan,
        VoltageId::Psu2Vin,
        VoltageId::Psu2Vout,
        VoltageId::Sys,
        VoltageId::Usb,
        VoltageId::VcoreVin,
        VoltageId::VcoreVout1,
        VoltageId::VcoreVout2,
        VoltageId::VmonVin,
        VoltageId::VmonVout,
    ];

    /// File stem under `voltage/`; `_in`, `_min` and `_max` are appended
    pub fn file_stem(self) -> &'static str {
        match self {
            VoltageId::Cpu0V9 => "cpu_0_9",
            VoltageId::Cpu1V05 => "cpu_1_05",
            VoltageId::Cpu1V8 => "cpu_1_8",
            VoltageId::CpuPch => "cpu_pch",
            VoltageId::Ddr3V0675 => "ddr3_0_675",
            VoltageId::Ddr3V135 => "ddr3_1_35",
            VoltageId::Lan => "lan",
            VoltageId::Psu2Vin => "psu2_vin",
            VoltageId::Psu2Vout => "psu2_vout",
            VoltageId::Sys => "sys",
            VoltageId::Usb => "usb",
            VoltageId::VcoreVin => "vcore_vin",
            VoltageId::VcoreVout1 => "vcore_vout1",
            VoltageId::VcoreVout2 => "vcore_vout2",
            VoltageId::VmonVin => "vmon_vin",
            VoltageId::VmonVout => "vmon_vout",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VoltageId::Cpu0V9 => "CPU 0.9V",
            VoltageId::Cpu1V05 => "CPU 1.05V",
            VoltageId::Cpu1V8 => "CPU 1.8V",
            VoltageId::CpuPch => "CPU/PCH 1.05V",
            VoltageId::Ddr3V0675 => "DDR3 0.675V",
            VoltageId::Ddr3V135 => "DDR3 1.35V",
            VoltageId::Lan => "1.05V LAN",
            VoltageId::Psu2Vin => "PSU2 Voltage In",
            VoltageId::Psu2Vout => "PSU2 Voltage Out",
            VoltageId::Sys => "SYS 3.3V",
            VoltageId::Usb => "USB 5V",
            VoltageId::VcoreVin => "Vcore Voltage In",
            VoltageId::VcoreVout1 => "Vcore Voltage Out1",
            VoltageId::VcoreVout2 => "Vcore Voltage Out2",
            VoltageId::VmonVin => "VMon Voltage In",
            VoltageId::VmonVout => "VMon Voltage Out",
        }
    }
}

impl fmt::Display for VoltageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Front-panel LEDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LedId {
    System,
    Fan1,
    Fan2,
    Fan3,
    Fan4,
    Psu,
    BadPort,
    Uid,
}

impl LedId {
    /// Fan tray LEDs, indexed by FRU - 1
    pub const FAN_TRAYS: [LedId; 4] = [LedId::Fan1, LedId::Fan2, LedId::Fan3, LedId::Fan4];

    /// LED file name under `led/`
    pub fn file_name(self) -> &'static str {
        match self {
            LedId::System => "led_status",
            LedId::Fan1 => "led_fan1",
            LedId::Fan2 => "led_fan2",
            LedId::Fan3 => "led_fan3",
            LedId::Fan4 => "led_fan4",
            LedId::Psu => "led_psu",
            LedId::BadPort => "led_bad_port",
            LedId::Uid => "led_uid",
        }
    }
}

impl fmt::Display for LedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LedMode {
    Off,
    Green,
    Red,
}

impl LedMode {
    pub fn as_str(self) -> &'static str {
        match self {
            LedMode::Off => "off",
            LedMode::Green => "green",
            LedMode::Red => "red",
        }
    }
}
