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

//! Voltage rail monitoring

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::sensors::Platform;
use crate::types::VoltageId;

/// A rail reading outside its valid range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoltageAlarm {
    pub rail: VoltageId,
    pub millivolts: i32,
    pub min: i32,
    pub max: i32,
}

/// Scans every rail and remembers which ones are out of range, so a rail
/// is logged once when it leaves its range and once when it returns
#[derive(Debug, Default)]
pub struct VoltageMonitor {
    alarmed: BTreeSet<VoltageId>,
}

impl VoltageMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_alarmed(&self, rail: VoltageId) -> bool {
        self.alarmed.contains(&rail)
    }

    /// Read every rail and return those currently out of range
    pub fn scan<P: Platform>(&mut self, platform: &P) -> Vec<VoltageAlarm> {
        let mut alarms = Vec::new();

        for rail in VoltageId::ALL {
            let info = match platform.voltage_info(rail) {
                Ok(info) => info,
                Err(e) => {
                    error!(rail = %rail, error = %e, "Failed to retrieve voltage info");
                    continue;
                }
            };
            if !info.present || info.failed || !info.range.is_defined() {
                continue;
            }

            if info.range.contains(info.millivolts) {
                if self.alarmed.remove(&rail) {
                    info!(rail = %rail, millivolts = info.millivolts, "Voltage back in range");
                }
                continue;
            }

            if self.alarmed.insert(rail) {
                warn!(
                    rail = %rail,
                    millivolts = info.millivolts,
                    min = info.range.min,
                    max = info.range.max,
                    "Voltage out of range"
                );
            }
            alarms.push(VoltageAlarm {
                rail,
                millivolts: info.millivolts,
                min: info.range.min,
                max: info.range.max,
            });
        }

        alarms
    }
}
