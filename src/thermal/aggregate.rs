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

//! Worst-case severity across one sampling pass

use serde::Serialize;

use super::ranges::Band;
use crate::types::ThermalId;

/// Sensor that set the aggregate band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorstSensor {
    pub id: ThermalId,
    pub mcelsius: i32,
}

/// Running maximum of sensor bands
///
/// Starts at [`Band::Low`]. Only a strictly hotter band replaces the current
/// one, so the first sensor reaching a band is the one reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeverityAggregate {
    band: Band,
    worst: Option<WorstSensor>,
}

impl SeverityAggregate {
    pub fn new() -> Self {
        Self { band: Band::Low, worst: None }
    }

    /// Fold one classified reading in; unclassified readings change nothing
    pub fn observe(&mut self, id: ThermalId, band: Option<Band>, mcelsius: i32) {
        if let Some(band) = band {
            if band > self.band {
                self.band = band;
                self.worst = Some(WorstSensor { id, mcelsius });
            }
        }
    }

    pub fn band(&self) -> Band {
        self.band
    }

    pub fn worst(&self) -> Option<WorstSensor> {
        self.worst
    }
}

impl Default for SeverityAggregate {
    fn default() -> Self {
        Self::new()
    }
}
