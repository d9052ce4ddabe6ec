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

//! Front-panel LED management
//!
//! Fan tray LEDs follow the two fans of their tray, the PSU LED follows both
//! supplies and the system LED follows the shutdown latch and the board
//! temperature sensors. Anything unreadable shows red.

use idg_error::Result;
use serde::Serialize;
use tracing::{debug, warn};

use crate::constants::fan::LED_MIN_RPM_PCT;
use crate::registers::RegisterBus;
use crate::sensors::Platform;
use crate::thermal::ShutdownGuard;
use crate::types::{FanId, LedId, LedMode, PsuId, ThermalId};

/// Board sensors watched by the system LED
const SYSTEM_LED_SENSORS: usize = 11;

/// Modes applied in one pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LedReport {
    pub modes: Vec<(LedId, LedMode)>,
}

impl LedReport {
    pub fn mode(&self, id: LedId) -> Option<LedMode> {
        self.modes.iter().find(|(led, _)| *led == id).map(|(_, mode)| *mode)
    }
}

fn fan_healthy<P: Platform>(platform: &P, id: FanId) -> bool {
    match platform.fan_info(id) {
        Ok(info) => {
            let floor = i64::from(id.min_rpm()) * i64::from(LED_MIN_RPM_PCT);
            info.present && !info.failed && i64::from(info.rpm) * 100 >= floor
        }
        Err(e) => {
            debug!(fan = %id, error = %e, "Fan unreadable for LED");
            false
        }
    }
}

fn fan_tray_mode<P: Platform>(platform: &P, tray: u8) -> Result<LedMode> {
    let front = FanId::new(tray * 2 - 1)?;
    let rear = FanId::new(tray * 2)?;
    let ok = fan_healthy(platform, front) && fan_healthy(platform, rear);
    Ok(if ok { LedMode::Green } else { LedMode::Red })
}

fn psu_mode<P: Platform>(platform: &P) -> LedMode {
    let ok = PsuId::all().all(|id| match platform.psu_info(id) {
        Ok(info) => info.is_operational() && !info.failed,
        Err(e) => {
            debug!(psu = %id, error = %e, "PSU unreadable for LED");
            false
        }
    });
    if ok {
        LedMode::Green
    } else {
        LedMode::Red
    }
}

fn system_mode<P: Platform, B: RegisterBus>(platform: &P, guard: &ShutdownGuard<B>) -> Result<LedMode> {
    if guard.is_system_in_shutdown_state()? {
        return Ok(LedMode::Red);
    }

    let ok = ThermalId::ALL[..SYSTEM_LED_SENSORS].iter().all(|id| match platform.thermal_info(*id) {
        Ok(info) => info.present && !info.failed && !info.thresholds.exceeds_shutdown(info.mcelsius),
        Err(e) => {
            debug!(sensor = %id, error = %e, "Sensor unreadable for LED");
            false
        }
    });
    Ok(if ok { LedMode::Green } else { LedMode::Red })
}

fn apply<P: Platform>(platform: &P, report: &mut LedReport, led: LedId, mode: LedMode) {
    if let Err(e) = platform.set_led_mode(led, mode) {
        warn!(led = %led, mode = mode.as_str(), error = %e, "Failed to set LED");
    }
    report.modes.push((led, mode));
}

/// Compute and apply every managed LED. Write failures are logged and the
/// remaining LEDs are still set.
///
/// Fan tray and PSU LEDs are applied before the shutdown register is read,
/// so a register failure still leaves them current.
pub fn manage_leds<P: Platform, B: RegisterBus>(platform: &P, guard: &ShutdownGuard<B>) -> Result<LedReport> {
    let mut report = LedReport::default();

    for (index, led) in LedId::FAN_TRAYS.iter().enumerate() {
        let mode = fan_tray_mode(platform, index as u8 + 1)?;
        apply(platform, &mut report, *led, mode);
    }
    apply(platform, &mut report, LedId::Psu, psu_mode(platform));

    let mode = system_mode(platform, guard)?;
    apply(platform, &mut report, LedId::System, mode);
    Ok(report)
}
