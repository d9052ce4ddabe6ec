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

//! Fan speed actuator
//!
//! Sets the chassis fan group, then drags the PSU fans up to the same
//! speed. PSU fans are only ever raised here, never lowered.

use idg_error::{ErrorKind, Result};
use tracing::{debug, error, info};

use super::state::{ControlState, ThermalSamples};
use crate::config::AlgorithmParams;
use crate::sensors::{Platform, PsuInfo};
use crate::types::{FanId, PsuId};

/// Where the actuator learns PSU presence from
#[derive(Debug, Clone, Copy)]
pub enum PsuView<'a> {
    /// Records sampled earlier in this pass
    Sampled(&'a [PsuInfo]),
    /// Query each PSU now and set its fan without comparing speeds
    Query,
}

/// Apply `percentage` to every fan and restart the cooldown window
///
/// A failure on the chassis group is returned; PSU fan failures are logged
/// and left for the next pass. When `samples` is given they become the new
/// rate-of-rise baseline.
pub fn set_all_fans_speed<P: Platform>(
    platform: &P,
    state: &mut ControlState,
    params: &AlgorithmParams,
    percentage: u32,
    psus: PsuView<'_>,
    samples: Option<&ThermalSamples>,
) -> Result<()> {
    platform.set_fan_percentage(FanId::PRIMARY, percentage).map_err(|e| {
        error!(fan = %FanId::PRIMARY, percentage, error = %e, "Failed to set fan speed");
        e
    })?;

    for psu in PsuId::all() {
        match psus {
            PsuView::Sampled(sampled) => {
                let Some(info) = sampled.iter().find(|p| p.id == psu) else {
                    continue;
                };
                if info.is_operational() {
                    raise_psu_fan(platform, psu, percentage);
                }
            }
            PsuView::Query => match platform.psu_info(psu) {
                Ok(info) if info.is_operational() => {
                    if let Err(e) = platform.set_fan_percentage(psu.fan(), percentage) {
                        debug!(psu = %psu, error = %e, "PSU fan speed not set");
                    }
                }
                Ok(_) => {}
                Err(e) => debug!(psu = %psu, error = %e, "PSU state unavailable"),
            },
        }
    }

    state.cooldown_ticks = params.cooldown_ticks;
    if let Some(samples) = samples {
        state.store_baseline(samples);
    }

    info!(percentage, "Fans speed was set to {}%", percentage);
    Ok(())
}

fn raise_psu_fan<P: Platform>(platform: &P, psu: PsuId, percentage: u32) {
    let fan = psu.fan();
    let current = match platform.fan_info(fan) {
        Ok(info) => info.percentage,
        Err(e) => {
            error!(psu = %psu, error = %e, "Failed to retrieve PSU fan info");
            return;
        }
    };
    if current >= percentage {
        return;
    }

    match platform.set_fan_percentage(fan, percentage) {
        Ok(()) => debug!(psu = %psu, from = current, to = percentage, "PSU fan raised"),
        Err(e) if e.kind() == ErrorKind::Unsupported => {
            debug!(psu = %psu, "PSU fan speed is not controllable")
        }
        Err(e) => error!(psu = %psu, percentage, error = %e, "Failed to set PSU fan speed"),
    }
}
