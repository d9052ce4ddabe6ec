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

//! State carried between control passes

use std::collections::BTreeMap;

use serde::Serialize;

use super::ranges::Band;
use crate::sensors::{FanInfo, PsuInfo};
use crate::types::{FanId, PsuId, ThermalId};

/// Temperatures of one pass, keyed by sensor
pub type ThermalSamples = BTreeMap<ThermalId, i32>;

/// Mutable control-loop state, owned by the caller and passed to every pass
///
/// A fresh value is all zero: not initialised, algorithm disabled until the
/// control file has been read, no baseline.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ControlState {
    /// Passes left before another cooldown-gated speed change is allowed
    pub cooldown_ticks: u32,
    /// Temperatures recorded at the last speed change
    pub baseline: ThermalSamples,
    pub algorithm_enabled: bool,
    pub init_called: bool,
    /// Shutdown latch already reported and handled
    pub shutdown_reported: bool,
    pub previous_band: Option<Band>,
    pub previous_fans: BTreeMap<FanId, FanInfo>,
    pub previous_psus: BTreeMap<PsuId, PsuInfo>,
}

impl ControlState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick_cooldown(&mut self) {
        self.cooldown_ticks = self.cooldown_ticks.saturating_sub(1);
    }

    pub fn cooldown_elapsed(&self) -> bool {
        self.cooldown_ticks == 0
    }

    /// Baseline temperature; sensors never recorded count as 0
    pub fn baseline_of(&self, id: ThermalId) -> i32 {
        self.baseline.get(&id).copied().unwrap_or(0)
    }

    /// Overwrite the baseline with this pass's samples
    pub fn store_baseline(&mut self, samples: &ThermalSamples) {
        self.baseline.extend(samples.iter().map(|(id, m)| (*id, *m)));
    }
}
