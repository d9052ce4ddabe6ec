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

//! [`Platform`] over the BSP attribute tree
//!
//! Layout below the root (default `/bsp`):
//!
//! | Entity | Files |
//! |--------|-------|
//! | chassis fan | `module/fan<fru>_status`, `fan/fan<id>_speed_get`, `fan/fan_speed_set` |
//! | PSU fan | `module/psu<n>_status`, `fan/psu<n>_fan1_speed_get` |
//! | thermal | `thermal/<sensor>` |
//! | PSU | `module/psu<n>_status`, `power/psu<n>_pwr_status` |
//! | voltage | `voltage/<rail>_in`, `_min`, `_max` |
//! | LED | `led/<led>` |

use std::path::{Path, PathBuf};

use idg_error::{PlatformError, Result};
use tracing::trace;

use super::file::{read_int, write_value};
use super::{FanInfo, Platform, PsuInfo, ThermalInfo, ThermalThresholds, VoltageInfo, VoltageRange};
use crate::constants::{algorithm, fan, paths};
use crate::types::{FanId, LedId, LedMode, PsuId, ThermalId, VoltageId};

/// Module status value meaning "inserted"
const MODULE_PRESENT: i32 = 1;

/// Static warning / shutdown limits
pub fn thermal_thresholds(id: ThermalId) -> ThermalThresholds {
    match id {
        ThermalId::CpuCore0
        | ThermalId::CpuCore1
        | ThermalId::CpuCore2
        | ThermalId::CpuCore3
        | ThermalId::CpuPack
        | ThermalId::Nps => ThermalThresholds { warning: 90000, shutdown: 100000 },
        ThermalId::Pex => ThermalThresholds { warning: 95000, shutdown: 105000 },
        ThermalId::Tcam => ThermalThresholds { warning: 80000, shutdown: 90000 },
        _ => ThermalThresholds::default(),
    }
}

#[derive(Debug, Clone)]
pub struct SysfsPlatform {
    root: PathBuf,
}

impl SysfsPlatform {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    fn module_present(&self, name: &str) -> Result<bool> {
        Ok(read_int(&self.path(format!("module/{}_status", name)))? == MODULE_PRESENT)
    }

    fn psu_present(&self, psu: PsuId) -> Result<bool> {
        self.module_present(&format!("psu{}", psu.get()))
    }
}

impl Default for SysfsPlatform {
    fn default() -> Self {
        Self::new(paths::BSP_ROOT)
    }
}

impl Platform for SysfsPlatform {
    fn fan_info(&self, id: FanId) -> Result<FanInfo> {
        let (present, speed_path) = match id.psu() {
            Some(psu) => (
                self.psu_present(psu)?,
                self.path(format!("fan/psu{}_fan1_speed_get", psu.get())),
            ),
            None => (
                self.module_present(&format!("fan{}", id.fru()))?,
                self.path(format!("fan/fan{}_speed_get", id.get())),
            ),
        };
        if !present {
            return Ok(FanInfo::not_present(id));
        }

        let rpm = read_int(&speed_path)?;
        if rpm <= 0 {
            return Ok(FanInfo { id, present: true, failed: true, rpm, percentage: 0 });
        }

        let percentage = u32::try_from(i64::from(rpm) * 100 / i64::from(id.max_rpm())).unwrap_or(u32::MAX);
        trace!(fan = %id, rpm, percentage, "fan sampled");
        Ok(FanInfo { id, present: true, failed: false, rpm, percentage })
    }

    fn thermal_info(&self, id: ThermalId) -> Result<ThermalInfo> {
        let thresholds = thermal_thresholds(id);
        if let Some(psu) = id.psu() {
            if !self.psu_present(psu)? {
                return Ok(ThermalInfo { id, present: false, failed: false, mcelsius: 0, thresholds });
            }
        }

        let mcelsius = read_int(&self.path(format!("thermal/{}", id.file_name())))?;
        Ok(ThermalInfo { id, present: true, failed: false, mcelsius, thresholds })
    }

    fn psu_info(&self, id: PsuId) -> Result<PsuInfo> {
        if !self.psu_present(id)? {
            return Ok(PsuInfo { id, present: false, unplugged: false, failed: false });
        }
        let power = read_int(&self.path(format!("power/psu{}_pwr_status", id.get())))?;
        Ok(PsuInfo { id, present: true, unplugged: power == 0, failed: false })
    }

    fn voltage_info(&self, id: VoltageId) -> Result<VoltageInfo> {
        let stem = id.file_stem();
        let millivolts = read_int(&self.path(format!("voltage/{}_in", stem)))?;
        let min = read_int(&self.path(format!("voltage/{}_min", stem)))?;
        let max = read_int(&self.path(format!("voltage/{}_max", stem)))?;
        Ok(VoltageInfo {
            id,
            present: true,
            failed: false,
            millivolts,
            range: VoltageRange { min, max },
        })
    }

    fn set_fan_percentage(&self, id: FanId, percentage: u32) -> Result<()> {
        if !id.is_chassis() {
            return Err(PlatformError::unsupported(format!("{} has no speed control", id)));
        }
        if percentage == 0 {
            return Err(PlatformError::ZeroPercentage { value: percentage });
        }
        if !(algorithm::PLATFORM_MIN_PCT..=algorithm::FULL_SPEED_PCT).contains(&percentage) {
            return Err(PlatformError::PercentageOutOfRange {
                value: percentage,
                min: algorithm::PLATFORM_MIN_PCT,
                max: algorithm::FULL_SPEED_PCT,
            });
        }

        // one control register drives every chassis fan
        let raw = percentage * fan::SPEED_SET_MAX / 100;
        write_value(&self.path(paths::FAN_SPEED_SET), raw)
    }

    fn set_led_mode(&self, id: LedId, mode: LedMode) -> Result<()> {
        write_value(&self.path(format!("led/{}", id.file_name())), mode.as_str())
    }
}
