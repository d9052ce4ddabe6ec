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

//! Thermal severity bands
//!
//! Every sensor owns five milli-degree bands. A reading is classified by
//! walking the bands from critical down to low and taking the first active
//! band that strictly contains it, so critical wins when bands overlap.
//! A band whose `high` is not above its `low` is inactive; a sensor with no
//! active band takes no part in the algorithm.

use std::fmt;

use serde::Serialize;

use crate::types::ThermalId;

/// Severity bands, ordered from coolest to hottest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Low,
    Desired,
    High,
    VeryHigh,
    Critical,
}

impl Band {
    /// Precedence used by the classifier
    pub const PRECEDENCE: [Band; 5] = [Band::Critical, Band::VeryHigh, Band::High, Band::Desired, Band::Low];
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Band::Low => "low",
            Band::Desired => "desired",
            Band::High => "high",
            Band::VeryHigh => "very high",
            Band::Critical => "critical",
        };
        f.write_str(name)
    }
}

/// Open interval `(low, high)` in milli-degrees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BandRange {
    pub low: i32,
    pub high: i32,
}

impl BandRange {
    pub const INACTIVE: BandRange = BandRange { low: 0, high: 0 };

    pub const fn new(low: i32, high: i32) -> Self {
        Self { low, high }
    }

    pub fn is_active(&self) -> bool {
        self.high > self.low
    }

    pub fn contains(&self, mcelsius: i32) -> bool {
        self.is_active() && self.low < mcelsius && mcelsius < self.high
    }
}

/// The five bands of one sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SensorRanges {
    pub low: BandRange,
    pub desired: BandRange,
    pub high: BandRange,
    pub very_high: BandRange,
    pub critical: BandRange,
}

impl SensorRanges {
    pub const NONE: SensorRanges = SensorRanges {
        low: BandRange::INACTIVE,
        desired: BandRange::INACTIVE,
        high: BandRange::INACTIVE,
        very_high: BandRange::INACTIVE,
        critical: BandRange::INACTIVE,
    };

    /// Contiguous bands split at four boundaries, starting from 0
    pub const fn stepped(desired: i32, high: i32, very_high: i32, critical: i32, ceiling: i32) -> Self {
        Self {
            low: BandRange::new(0, desired),
            desired: BandRange::new(desired, high),
            high: BandRange::new(high, very_high),
            very_high: BandRange::new(very_high, critical),
            critical: BandRange::new(critical, ceiling),
        }
    }

    pub fn band(&self, band: Band) -> BandRange {
        match band {
            Band::Low => self.low,
            Band::Desired => self.desired,
            Band::High => self.high,
            Band::VeryHigh => self.very_high,
            Band::Critical => self.critical,
        }
    }

    pub fn is_relevant(&self) -> bool {
        Band::PRECEDENCE.iter().any(|b| self.band(*b).is_active())
    }

    /// Highest-precedence band containing the reading, if any
    pub fn classify(&self, mcelsius: i32) -> Option<Band> {
        Band::PRECEDENCE
            .iter()
            .copied()
            .find(|b| self.band(*b).contains(mcelsius))
    }
}

/// Band table for every thermal sensor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeTable {
    entries: Vec<(ThermalId, SensorRanges)>,
}

impl RangeTable {
    /// IDG4400 production table
    pub fn platform() -> Self {
        const CPU: SensorRanges = SensorRanges::stepped(60000, 65000, 70000, 90000, 105000);
        const PEX: SensorRanges = SensorRanges::stepped(65000, 70000, 75000, 95000, 110000);
        const TCAM: SensorRanges = SensorRanges::stepped(50000, 55000, 60000, 80000, 95000);

        let entries = ThermalId::ALL
            .iter()
            .map(|id| {
                let ranges = match id {
                    ThermalId::CpuCore0
                    | ThermalId::CpuCore1
                    | ThermalId::CpuCore2
                    | ThermalId::CpuCore3
                    | ThermalId::CpuPack
                    | ThermalId::Nps => CPU,
                    ThermalId::Pex => PEX,
                    ThermalId::Tcam => TCAM,
                    _ => SensorRanges::NONE,
                };
                (*id, ranges)
            })
            .collect();
        Self { entries }
    }

    /// Table with custom bands; unlisted sensors are irrelevant
    pub fn from_entries(entries: impl IntoIterator<Item = (ThermalId, SensorRanges)>) -> Self {
        let mut entries: Vec<_> = entries.into_iter().collect();
        entries.sort_by_key(|(id, _)| *id);
        entries.dedup_by_key(|(id, _)| *id);
        Self { entries }
    }

    pub fn ranges(&self, id: ThermalId) -> SensorRanges {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == id)
            .map(|(_, ranges)| *ranges)
            .unwrap_or(SensorRanges::NONE)
    }

    pub fn classify(&self, id: ThermalId, mcelsius: i32) -> Option<Band> {
        self.ranges(id).classify(mcelsius)
    }

    /// Sensors with at least one active band, in table order
    pub fn relevant_sensors(&self) -> impl Iterator<Item = ThermalId> + '_ {
        self.entries
            .iter()
            .filter(|(_, ranges)| ranges.is_relevant())
            .map(|(id, _)| *id)
    }
}

impl Default for RangeTable {
    fn default() -> Self {
        Self::platform()
    }
}
