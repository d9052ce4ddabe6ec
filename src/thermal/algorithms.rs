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

//! Cold and hot speed adjustment
//!
//! Both algorithms are pure: they look at the current chassis speed, the
//! samples and the state, and return the speed to apply (if any). Percent
//! math is done in integers, truncating like the fan driver does.

use serde::Serialize;
use tracing::{debug, info};

use super::state::{ControlState, ThermalSamples};
use crate::config::AlgorithmParams;
use crate::types::ThermalId;

/// Why the hot algorithm escalated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HotTrigger {
    /// A sensor rose more than the fast-rise delta since the baseline
    FastRise { sensor: ThermalId, delta: i32 },
    /// Cooldown elapsed while still very hot
    SteadyClimb,
}

fn scale(percentage: u32, factor_pct: u32) -> u32 {
    percentage * factor_pct / 100
}

/// Low band: decay by the cold factor once per cooldown window, never
/// below the platform minimum
pub fn cold_algorithm(current: u32, state: &ControlState, params: &AlgorithmParams) -> Option<u32> {
    if !state.cooldown_elapsed() {
        return None;
    }
    if current <= params.platform_min_pct {
        debug!("The fans are running at the minimum speed");
        return None;
    }
    Some(scale(current, params.cold_decay_factor_pct).max(params.platform_min_pct))
}

/// Very-high band: escalate on a fast rise at any time, otherwise on a
/// steady climb once the cooldown window has passed
pub fn hot_algorithm(
    current: u32,
    samples: &ThermalSamples,
    state: &ControlState,
    params: &AlgorithmParams,
) -> Option<(u32, HotTrigger)> {
    if current >= params.full_speed_pct {
        debug!("The fans are running at the maximum speed");
        return None;
    }

    let fast_rise = samples.iter().find_map(|(id, mcelsius)| {
        let delta = mcelsius - state.baseline_of(*id);
        (delta > params.fast_rise_delta_mcelsius).then_some(HotTrigger::FastRise { sensor: *id, delta })
    });

    let (factor, trigger) = match fast_rise {
        Some(trigger @ HotTrigger::FastRise { sensor, delta }) => {
            info!(sensor = %sensor, delta_mcelsius = delta, "Temperature increased by more than {} [mcelsius] from the previous sample", params.fast_rise_delta_mcelsius);
            (params.fast_rise_factor_pct, trigger)
        }
        _ if state.cooldown_elapsed() => (params.steady_climb_factor_pct, HotTrigger::SteadyClimb),
        _ => return None,
    };

    let target = scale(current, factor)
        .min(params.full_speed_pct)
        .max(params.platform_min_pct);
    Some((target, trigger))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(cooldown: u32, baseline: &[(ThermalId, i32)]) -> ControlState {
        let mut state = ControlState { cooldown_ticks: cooldown, ..Default::default() };
        state.store_baseline(&baseline.iter().copied().collect());
        state
    }

    #[test]
    fn test_cold_decays_after_cooldown() {
        let params = AlgorithmParams::default();
        assert_eq!(cold_algorithm(80, &state(0, &[]), &params), Some(72));
        assert_eq!(cold_algorithm(100, &state(0, &[]), &params), Some(90));
    }

    #[test]
    fn test_cold_idle_within_cooldown() {
        let params = AlgorithmParams::default();
        assert_eq!(cold_algorithm(80, &state(12, &[]), &params), None);
    }

    #[test]
    fn test_cold_respects_platform_minimum() {
        let params = AlgorithmParams::default();
        assert_eq!(cold_algorithm(60, &state(0, &[]), &params), None);
        assert_eq!(cold_algorithm(55, &state(0, &[]), &params), None);
        // 65 * 0.9 = 58, floored
        assert_eq!(cold_algorithm(65, &state(0, &[]), &params), Some(60));
    }

    #[test]
    fn test_hot_fast_rise() {
        let params = AlgorithmParams::default();
        let samples = ThermalSamples::from([(ThermalId::CpuCore0, 67000)]);
        let result = hot_algorithm(70, &samples, &state(0, &[(ThermalId::CpuCore0, 62000)]), &params);
        assert_eq!(
            result,
            Some((84, HotTrigger::FastRise { sensor: ThermalId::CpuCore0, delta: 5000 }))
        );
    }

    #[test]
    fn test_hot_fast_rise_ignores_cooldown() {
        let params = AlgorithmParams::default();
        let samples = ThermalSamples::from([(ThermalId::Pex, 80000)]);
        let result = hot_algorithm(70, &samples, &state(20, &[(ThermalId::Pex, 75000)]), &params);
        assert_eq!(result.map(|(p, _)| p), Some(84));
    }

    #[test]
    fn test_hot_first_rising_sensor_wins() {
        let params = AlgorithmParams::default();
        let samples = ThermalSamples::from([(ThermalId::CpuCore1, 80000), (ThermalId::Tcam, 70000)]);
        let baseline = [(ThermalId::CpuCore1, 70000), (ThermalId::Tcam, 60000)];
        let (_, trigger) = hot_algorithm(70, &samples, &state(0, &baseline), &params).unwrap();
        assert_eq!(trigger, HotTrigger::FastRise { sensor: ThermalId::CpuCore1, delta: 10000 });
    }

    #[test]
    fn test_hot_steady_climb() {
        let params = AlgorithmParams::default();
        let samples = ThermalSamples::from([(ThermalId::CpuCore0, 75000)]);
        let baseline = [(ThermalId::CpuCore0, 74000)];
        assert_eq!(
            hot_algorithm(70, &samples, &state(0, &baseline), &params),
            Some((77, HotTrigger::SteadyClimb))
        );
        // exactly the delta is not a fast rise
        let samples = ThermalSamples::from([(ThermalId::CpuCore0, 78000)]);
        assert_eq!(hot_algorithm(70, &samples, &state(3, &baseline), &params), None);
    }

    #[test]
    fn test_hot_never_exceeds_full_speed() {
        let params = AlgorithmParams::default();
        let samples = ThermalSamples::from([(ThermalId::CpuCore0, 99000)]);
        for current in 60..100 {
            let fast = hot_algorithm(current, &samples, &state(0, &[(ThermalId::CpuCore0, 70000)]), &params);
            let steady = hot_algorithm(current, &samples, &state(0, &[(ThermalId::CpuCore0, 99000)]), &params);
            for result in [fast, steady] {
                let (target, _) = result.unwrap();
                assert!(target <= 100, "current {} -> {}", current, target);
                assert!(target >= current);
            }
        }
        assert_eq!(hot_algorithm(100, &samples, &state(0, &[]), &params), None);
    }
}
