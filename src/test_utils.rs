/*
 * Test utilities and mock helpers for idg4400
 *
 * This module provides a simulated chassis and common helpers that can be
 * used across the unit test modules.
 */

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

use idg_error::{PlatformError, Result};
use tempfile::NamedTempFile;

use crate::sensors::sysfs::thermal_thresholds;
use crate::sensors::{FanInfo, Platform, PsuInfo, ThermalInfo, VoltageInfo, VoltageRange};
use crate::types::{FanId, LedId, LedMode, PsuId, ThermalId, VoltageId};

/// Reading reported for sensors no test has set; low band everywhere
pub const IDLE_MCELSIUS: i32 = 45000;

#[derive(Debug, Default)]
struct SimState {
    fans: BTreeMap<FanId, FanInfo>,
    psus: BTreeMap<PsuId, PsuInfo>,
    thermals: BTreeMap<ThermalId, i32>,
    voltages: BTreeMap<VoltageId, VoltageInfo>,
    failing_fans: BTreeSet<FanId>,
    failing_thermals: BTreeSet<ThermalId>,
    failing_psus: BTreeSet<PsuId>,
    failing_voltages: BTreeSet<VoltageId>,
    fail_fan_writes: bool,
    fail_psu_fan_reads: bool,
    chassis_sets: Vec<u32>,
    leds: BTreeMap<LedId, LedMode>,
}

/// In-memory chassis. Chassis speed changes apply to all eight fans, like
/// the single speed register on the real board.
#[derive(Debug, Default)]
pub struct SimPlatform {
    state: RefCell<SimState>,
}

fn fan(id: u8) -> FanId {
    FanId::new(id).expect("valid fan id")
}

fn psu(id: u8) -> PsuId {
    PsuId::new(id).expect("valid psu id")
}

fn running(id: FanId, percentage: u32) -> FanInfo {
    let rpm = (id.max_rpm() * percentage / 100) as i32;
    FanInfo { id, present: true, failed: false, rpm, percentage }
}

impl SimPlatform {
    /// Creates a chassis with every FRU present and all fans at `percentage`
    pub fn healthy(percentage: u32) -> Self {
        let sim = Self::default();
        {
            let mut state = sim.state.borrow_mut();
            for id in FanId::all() {
                state.fans.insert(id, running(id, percentage));
            }
            for id in PsuId::all() {
                state.psus.insert(id, PsuInfo { id, present: true, unplugged: false, failed: false });
            }
            for id in VoltageId::ALL {
                state.voltages.insert(
                    id,
                    VoltageInfo { id, present: true, failed: false, millivolts: 1000, range: VoltageRange { min: 900, max: 1100 } },
                );
            }
        }
        sim
    }

    pub fn set_thermal(&self, id: ThermalId, mcelsius: i32) {
        self.state.borrow_mut().thermals.insert(id, mcelsius);
    }

    pub fn fail_thermal(&self, id: ThermalId) {
        self.state.borrow_mut().failing_thermals.insert(id);
    }

    pub fn set_fan_present(&self, id: u8, present: bool) {
        let id = fan(id);
        let info = if present { running(id, 70) } else { FanInfo::not_present(id) };
        self.state.borrow_mut().fans.insert(id, info);
    }

    pub fn set_fan_rpm(&self, id: u8, rpm: i32) {
        if let Some(info) = self.state.borrow_mut().fans.get_mut(&fan(id)) {
            info.rpm = rpm;
            info.failed = rpm <= 0;
        }
    }

    pub fn fail_fan_read(&self, id: u8) {
        self.state.borrow_mut().failing_fans.insert(fan(id));
    }

    pub fn fail_fan_writes(&self) {
        self.state.borrow_mut().fail_fan_writes = true;
    }

    pub fn fail_psu_fan_reads(&self) {
        self.state.borrow_mut().fail_psu_fan_reads = true;
    }

    pub fn set_psu_present(&self, id: u8, present: bool) {
        if let Some(info) = self.state.borrow_mut().psus.get_mut(&psu(id)) {
            info.present = present;
        }
    }

    pub fn set_psu_unplugged(&self, id: u8, unplugged: bool) {
        if let Some(info) = self.state.borrow_mut().psus.get_mut(&psu(id)) {
            info.unplugged = unplugged;
        }
    }

    pub fn fail_psu_read(&self, id: u8) {
        self.state.borrow_mut().failing_psus.insert(psu(id));
    }

    pub fn set_psu_fan_percentage(&self, id: u8, percentage: u32) {
        let fan_id = psu(id).fan();
        self.state.borrow_mut().fans.insert(fan_id, running(fan_id, percentage));
    }

    pub fn psu_fan_percentage(&self, id: u8) -> u32 {
        self.state.borrow().fans.get(&psu(id).fan()).map_or(0, |f| f.percentage)
    }

    pub fn set_voltage(&self, id: VoltageId, millivolts: i32) {
        if let Some(info) = self.state.borrow_mut().voltages.get_mut(&id) {
            info.millivolts = millivolts;
        }
    }

    pub fn fail_voltage(&self, id: VoltageId) {
        self.state.borrow_mut().failing_voltages.insert(id);
    }

    /// Every speed applied to the chassis group, in order
    pub fn chassis_sets(&self) -> Vec<u32> {
        self.state.borrow().chassis_sets.clone()
    }

    pub fn led(&self, id: LedId) -> Option<LedMode> {
        self.state.borrow().leds.get(&id).copied()
    }
}

impl Platform for SimPlatform {
    fn fan_info(&self, id: FanId) -> Result<FanInfo> {
        let state = self.state.borrow();
        if state.failing_fans.contains(&id) || (state.fail_psu_fan_reads && !id.is_chassis()) {
            return Err(PlatformError::internal(format!("{} unreadable", id)));
        }
        if let Some(psu) = id.psu() {
            if !state.psus.get(&psu).map_or(false, |p| p.present) {
                return Ok(FanInfo::not_present(id));
            }
        }
        Ok(state.fans.get(&id).copied().unwrap_or_else(|| FanInfo::not_present(id)))
    }

    fn thermal_info(&self, id: ThermalId) -> Result<ThermalInfo> {
        let state = self.state.borrow();
        if state.failing_thermals.contains(&id) {
            return Err(PlatformError::internal(format!("{} unreadable", id)));
        }
        let present = id.psu().map_or(true, |p| state.psus.get(&p).map_or(false, |info| info.present));
        let mcelsius = if present { state.thermals.get(&id).copied().unwrap_or(IDLE_MCELSIUS) } else { 0 };
        Ok(ThermalInfo { id, present, failed: false, mcelsius, thresholds: thermal_thresholds(id) })
    }

    fn psu_info(&self, id: PsuId) -> Result<PsuInfo> {
        let state = self.state.borrow();
        if state.failing_psus.contains(&id) {
            return Err(PlatformError::internal(format!("{} unreadable", id)));
        }
        state
            .psus
            .get(&id)
            .copied()
            .ok_or_else(|| PlatformError::invalid_entity(id.to_string()))
    }

    fn voltage_info(&self, id: VoltageId) -> Result<VoltageInfo> {
        let state = self.state.borrow();
        if state.failing_voltages.contains(&id) {
            return Err(PlatformError::internal(format!("{} unreadable", id.label())));
        }
        state
            .voltages
            .get(&id)
            .copied()
            .ok_or_else(|| PlatformError::invalid_entity(id.label()))
    }

    fn set_fan_percentage(&self, id: FanId, percentage: u32) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_fan_writes {
            return Err(PlatformError::internal("fan speed register unwritable"));
        }
        if id.is_chassis() {
            state.chassis_sets.push(percentage);
            for fan_id in FanId::chassis() {
                if let Some(info) = state.fans.get_mut(&fan_id) {
                    if info.present {
                        *info = running(fan_id, percentage);
                    }
                }
            }
        } else {
            state.fans.insert(id, running(id, percentage));
        }
        Ok(())
    }

    fn set_led_mode(&self, id: LedId, mode: LedMode) -> Result<()> {
        self.state.borrow_mut().leds.insert(id, mode);
        Ok(())
    }
}

/// Creates a control file that enables the thermal algorithm
pub fn enabled_control_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create control file");
    writeln!(file, "enable=1").expect("write control file");
    file
}
