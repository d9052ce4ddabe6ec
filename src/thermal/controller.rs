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

//! Thermal control loop
//!
//! One call to [`ThermalController::manage_fans`] is one control pass:
//!
//! 1. first call only: read the control file, arm the watchdog, record a
//!    baseline (retried on the next call if it fails)
//! 2. stop here when the algorithm is disabled
//! 3. refresh the watchdog, count the cooldown down
//! 4. shutdown already latched: full speed once, then nothing
//! 5. sample fans and PSUs; any problem means full speed and no algorithm
//! 6. sample the relevant thermal sensors, enforce shutdown thresholds,
//!    classify and aggregate
//! 7. dispatch on the worst band and apply at most one speed change
//!
//! A failing chassis fan read or any register failure ends the pass with an
//! error; other sensor failures are logged and skipped.

use std::path::{Path, PathBuf};

use idg_error::Result;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::actuator::{set_all_fans_speed, PsuView};
use super::aggregate::{SeverityAggregate, WorstSensor};
use super::algorithms::{cold_algorithm, hot_algorithm};
use super::guard::ShutdownGuard;
use super::ranges::{Band, RangeTable};
use super::state::{ControlState, ThermalSamples};
use crate::config::{control_file_path, load_control_or_default, AlgorithmControl, AlgorithmParams};
use crate::leds::{self, LedReport};
use crate::registers::RegisterBus;
use crate::sensors::{Platform, PsuInfo};
use crate::types::{FanId, PsuId, ThermalId};

/// Outcome of one control pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PassReport {
    /// Algorithm disabled by the control file
    Disabled,
    /// Board already latched into shutdown
    ShutdownLatched {
        /// Full speed was requested during this pass
        first_report: bool,
    },
    /// A sensor crossed its shutdown threshold and shutdown was latched
    ShutdownTriggered {
        sensor: ThermalId,
        mcelsius: i32,
        threshold: i32,
    },
    Managed {
        band: Band,
        worst: Option<WorstSensor>,
        fans_problem: bool,
        psus_problem: bool,
        /// Speed handed to the actuator, if any
        applied_speed: Option<u32>,
    },
}

/// Fan and PSU health of one pass
struct HealthSample {
    current_speed: u32,
    fans_problem: bool,
    psus_problem: bool,
    psus: Vec<PsuInfo>,
}

/// Thermal readings of one pass, or the sensor that forced shutdown
enum ThermalSample {
    Sampled {
        samples: ThermalSamples,
        aggregate: SeverityAggregate,
    },
    ShutdownTriggered {
        sensor: ThermalId,
        mcelsius: i32,
        threshold: i32,
    },
}

/// Closed-loop fan controller for the IDG4400 chassis
#[derive(Debug)]
pub struct ThermalController<P, B> {
    platform: P,
    guard: ShutdownGuard<B>,
    ranges: RangeTable,
    params: AlgorithmParams,
    control_file: PathBuf,
}

impl<P: Platform, B: RegisterBus> ThermalController<P, B> {
    pub fn new(platform: P, bus: B) -> Self {
        Self {
            platform,
            guard: ShutdownGuard::new(bus),
            ranges: RangeTable::platform(),
            params: AlgorithmParams::default(),
            control_file: control_file_path(),
        }
    }

    pub fn with_params(mut self, params: AlgorithmParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_ranges(mut self, ranges: RangeTable) -> Self {
        self.ranges = ranges;
        self
    }

    pub fn with_control_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.control_file = path.into();
        self
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn guard(&self) -> &ShutdownGuard<B> {
        &self.guard
    }

    pub fn params(&self) -> &AlgorithmParams {
        &self.params
    }

    pub fn control_file(&self) -> &Path {
        &self.control_file
    }

    /// Update the front-panel LEDs from current fan, PSU and thermal state
    pub fn manage_leds(&self) -> Result<LedReport> {
        leds::manage_leds(&self.platform, &self.guard)
    }

    /// Run one control pass
    pub fn manage_fans(&self, state: &mut ControlState) -> Result<PassReport> {
        if !state.init_called {
            self.init(state).map_err(|e| {
                error!(error = %e, "Thermal algorithm initialization failed");
                e
            })?;
            state.init_called = true;
        }

        if !state.algorithm_enabled {
            return Ok(PassReport::Disabled);
        }

        self.guard.refresh_watchdog()?;
        state.tick_cooldown();

        if self.guard.is_system_in_shutdown_state()? {
            return self.handle_latched_shutdown(state);
        }

        let health = self.sample_health(state)?;

        let (samples, aggregate) = match self.sample_thermals()? {
            ThermalSample::Sampled { samples, aggregate } => (samples, aggregate),
            ThermalSample::ShutdownTriggered { sensor, mcelsius, threshold } => {
                return Ok(PassReport::ShutdownTriggered { sensor, mcelsius, threshold });
            }
        };

        let band = aggregate.band();
        if state.previous_band != Some(band) {
            log_band_change(band, aggregate.worst());
            state.previous_band = Some(band);
        }

        let mut target = None;
        if health.fans_problem || health.psus_problem {
            if health.current_speed < self.params.full_speed_pct {
                target = Some(self.params.full_speed_pct);
            }
        } else {
            target = self.dispatch(band, health.current_speed, &samples, state);
        }

        if let Some(percentage) = target {
            set_all_fans_speed(
                &self.platform,
                state,
                &self.params,
                percentage,
                PsuView::Sampled(&health.psus),
                Some(&samples),
            )?;
        }

        Ok(PassReport::Managed {
            band,
            worst: aggregate.worst(),
            fans_problem: health.fans_problem,
            psus_problem: health.psus_problem,
            applied_speed: target,
        })
    }

    fn init(&self, state: &mut ControlState) -> Result<()> {
        let AlgorithmControl { enabled, syslog_level } = load_control_or_default(&self.control_file);
        state.algorithm_enabled = enabled;
        debug!(?syslog_level, "Control file loaded");

        if !enabled {
            warn!("The thermal algorithm is disabled!");
            return Ok(());
        }

        info!("The thermal algorithm is enabled, initializing the watchdog...");
        self.guard.arm_watchdog()?;

        if !self.guard.is_system_in_shutdown_state()? {
            let samples = self.read_relevant_temperatures();
            state.store_baseline(&samples);
        }
        Ok(())
    }

    /// Baseline read; unreadable sensors record 0
    fn read_relevant_temperatures(&self) -> ThermalSamples {
        self.ranges
            .relevant_sensors()
            .map(|id| match self.platform.thermal_info(id) {
                Ok(info) => (id, info.mcelsius),
                Err(e) => {
                    error!(sensor = %id, error = %e, "Failed to retrieve sensor info");
                    (id, 0)
                }
            })
            .collect()
    }

    fn handle_latched_shutdown(&self, state: &mut ControlState) -> Result<PassReport> {
        if state.shutdown_reported {
            return Ok(PassReport::ShutdownLatched { first_report: false });
        }

        error!("The system is in shut-down state! Power cycle must be done to recover the system (electric unplug for about 8 seconds and then replug)");
        set_all_fans_speed(
            &self.platform,
            state,
            &self.params,
            self.params.full_speed_pct,
            PsuView::Query,
            None,
        )?;
        state.shutdown_reported = true;
        Ok(PassReport::ShutdownLatched { first_report: true })
    }

    fn sample_health(&self, state: &mut ControlState) -> Result<HealthSample> {
        let mut current_speed = 0;
        let mut fans_problem = false;
        let mut fans_problem_logged = false;

        for id in FanId::chassis() {
            let info = self.platform.fan_info(id).map_err(|e| {
                error!(fan = %id, error = %e, "Failed to retrieve fan info");
                e
            })?;
            let previous = state.previous_fans.get(&id);

            if !info.present {
                fans_problem = true;
                if previous.map_or(true, |p| p.present) {
                    error!(fan = %id, "Fan is not present");
                    fans_problem_logged = true;
                }
            } else if !id.rpm_in_valid_range(info.rpm) {
                fans_problem = true;
                if previous.map_or(true, |p| id.rpm_in_valid_range(p.rpm)) {
                    error!(fan = %id, rpm = info.rpm, "Fan RPM is not in the valid RPM range");
                    fans_problem_logged = true;
                }
            } else {
                current_speed = info.percentage;
            }
            state.previous_fans.insert(id, info);
        }

        if fans_problem && fans_problem_logged {
            error!("Will set fans speed percentage to 100% due to the above fan(s) problem(s)");
        }

        let mut psus_problem = false;
        let mut psus_problem_logged = false;
        let mut psus = Vec::new();

        for id in PsuId::all() {
            let previous = state.previous_psus.get(&id).copied();
            match self.platform.psu_info(id) {
                Ok(info) => {
                    if !info.present {
                        psus_problem = true;
                        if previous.map_or(true, |p| p.present) {
                            error!(psu = %id, "PSU is not present");
                            psus_problem_logged = true;
                        }
                    }
                    state.previous_psus.insert(id, info);
                    psus.push(info);
                }
                Err(e) => {
                    psus_problem = true;
                    psus_problem_logged = true;
                    error!(psu = %id, error = %e, "Failed to retrieve PSU info");
                }
            }
        }

        if psus_problem && psus_problem_logged {
            error!("Will set fans speed percentage to 100% due to the above PSU(s) problem(s)");
        }

        Ok(HealthSample { current_speed, fans_problem, psus_problem, psus })
    }

    fn sample_thermals(&self) -> Result<ThermalSample> {
        let mut samples = ThermalSamples::new();
        let mut aggregate = SeverityAggregate::new();

        for id in self.ranges.relevant_sensors() {
            let info = match self.platform.thermal_info(id) {
                Ok(info) if info.present && !info.failed => info,
                Ok(_) => {
                    debug!(sensor = %id, "Sensor absent or failed, skipped");
                    continue;
                }
                Err(e) => {
                    error!(sensor = %id, error = %e, "Failed to retrieve sensor info");
                    continue;
                }
            };
            let mcelsius = info.mcelsius;
            samples.insert(id, mcelsius);

            if info.thresholds.exceeds_shutdown(mcelsius) {
                error!(
                    sensor = %id,
                    mcelsius,
                    threshold = info.thresholds.shutdown,
                    "Sensor reached its shutdown threshold, shutting down the system..."
                );
                self.guard.trigger_shutdown()?;
                return Ok(ThermalSample::ShutdownTriggered {
                    sensor: id,
                    mcelsius,
                    threshold: info.thresholds.shutdown,
                });
            }
            if info.thresholds.exceeds_warning(mcelsius) {
                warn!(sensor = %id, mcelsius, threshold = info.thresholds.warning, "Sensor reached its warning threshold");
            }

            aggregate.observe(id, self.ranges.classify(id, mcelsius), mcelsius);
        }

        Ok(ThermalSample::Sampled { samples, aggregate })
    }

    fn dispatch(&self, band: Band, current: u32, samples: &ThermalSamples, state: &ControlState) -> Option<u32> {
        match band {
            Band::Low => cold_algorithm(current, state, &self.params),
            Band::Desired => None,
            Band::High => (current < self.params.platform_min_pct).then_some(self.params.platform_min_pct),
            Band::VeryHigh => hot_algorithm(current, samples, state, &self.params).map(|(target, _)| target),
            Band::Critical => (current < self.params.full_speed_pct).then_some(self.params.full_speed_pct),
        }
    }
}

fn log_band_change(band: Band, worst: Option<WorstSensor>) {
    let (sensor, mcelsius) = match worst {
        Some(w) => (Some(w.id), w.mcelsius),
        None => (None, 0),
    };
    match band {
        Band::Low | Band::Desired => info!("System temperature is in the {} range", band),
        Band::High | Band::VeryHigh => {
            info!(sensor = ?sensor, mcelsius, "System temperature is in the {} range", band)
        }
        Band::Critical => {
            error!(sensor = ?sensor, mcelsius, "System temperature is in the critical range")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::registers::*;
    use crate::registers::{MemoryBus, RegisterWrite};
    use crate::test_utils::{enabled_control_file, SimPlatform};
    use tempfile::NamedTempFile;

    fn controller<'a>(sim: &'a SimPlatform, bus: &'a MemoryBus, control: &NamedTempFile) -> ThermalController<&'a SimPlatform, &'a MemoryBus> {
        ThermalController::new(sim, bus).with_control_file(control.path())
    }

    /// State as it is after a successful init with an empty baseline
    fn running_state() -> ControlState {
        ControlState { init_called: true, algorithm_enabled: true, ..Default::default() }
    }

    #[test]
    fn test_init_arms_watchdog_and_records_baseline() {
        let sim = SimPlatform::healthy(70);
        sim.set_thermal(ThermalId::CpuCore0, 61000);
        let bus = MemoryBus::new();
        let control = enabled_control_file();
        let mut state = ControlState::new();

        controller(&sim, &bus, &control).manage_fans(&mut state).unwrap();

        assert!(state.init_called && state.algorithm_enabled);
        assert_eq!(state.baseline_of(ThermalId::CpuCore0), 61000);
        let writes: Vec<u32> = bus.writes().iter().map(|w| w.offset).collect();
        assert_eq!(&writes[..5], &[WATCHDOG_TIMEOUT, WATCHDOG_ACTION, WATCHDOG_CLEAR_PROTECT, WATCHDOG_CLEAR, WATCHDOG_CLEAR]);
    }

    #[test]
    fn test_init_failure_is_retried() {
        let sim = SimPlatform::healthy(70);
        let bus = MemoryBus::new();
        bus.fail_offset(WATCHDOG_TIMEOUT);
        let control = enabled_control_file();
        let mut state = ControlState::new();

        assert!(controller(&sim, &bus, &control).manage_fans(&mut state).is_err());
        assert!(!state.init_called);
        assert!(sim.chassis_sets().is_empty());
    }

    #[test]
    fn test_disabled_algorithm_is_noop() {
        let sim = SimPlatform::healthy(70);
        let bus = MemoryBus::new();
        let mut control = NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut control, b"enable=0\n").unwrap();
        let mut state = ControlState::new();

        let report = controller(&sim, &bus, &control).manage_fans(&mut state).unwrap();
        assert_eq!(report, PassReport::Disabled);
        assert!(bus.writes().is_empty());
        assert!(sim.chassis_sets().is_empty());
    }

    #[test]
    fn test_refresh_precedes_sampling_and_cooldown_ticks() {
        let sim = SimPlatform::healthy(75);
        sim.set_thermal(ThermalId::CpuCore0, 62000);
        let bus = MemoryBus::new();
        let control = enabled_control_file();
        let mut state = ControlState { cooldown_ticks: 5, ..running_state() };

        controller(&sim, &bus, &control).manage_fans(&mut state).unwrap();
        assert_eq!(bus.writes(), vec![RegisterWrite { base: LPC_BASE, offset: WATCHDOG_CLEAR, value: 0x1 }]);
        assert_eq!(state.cooldown_ticks, 4);
    }

    #[test]
    fn test_desired_band_is_noop() {
        let sim = SimPlatform::healthy(75);
        sim.set_thermal(ThermalId::CpuCore0, 62000);
        let bus = MemoryBus::new();
        let control = enabled_control_file();
        let mut state = running_state();

        let report = controller(&sim, &bus, &control).manage_fans(&mut state).unwrap();
        assert!(matches!(report, PassReport::Managed { band: Band::Desired, applied_speed: None, .. }));
        assert!(sim.chassis_sets().is_empty());
    }

    #[test]
    fn test_fast_rise_in_very_high_band() {
        let sim = SimPlatform::healthy(70);
        sim.set_thermal(ThermalId::CpuCore0, 75000);
        let bus = MemoryBus::new();
        let control = enabled_control_file();
        let mut state = running_state();
        state.store_baseline(&ThermalSamples::from([(ThermalId::CpuCore0, 70500)]));

        let report = controller(&sim, &bus, &control).manage_fans(&mut state).unwrap();
        assert!(matches!(report, PassReport::Managed { band: Band::VeryHigh, applied_speed: Some(84), .. }));
        assert_eq!(sim.chassis_sets(), vec![84]);
        assert_eq!(state.cooldown_ticks, 30);
        assert_eq!(state.baseline_of(ThermalId::CpuCore0), 75000);
    }

    #[test]
    fn test_high_band_enforces_minimum() {
        let sim = SimPlatform::healthy(55);
        sim.set_thermal(ThermalId::Tcam, 57000);
        let bus = MemoryBus::new();
        let control = enabled_control_file();
        let mut state = running_state();

        controller(&sim, &bus, &control).manage_fans(&mut state).unwrap();
        assert_eq!(sim.chassis_sets(), vec![60]);
    }

    #[test]
    fn test_critical_band_goes_full_speed() {
        let sim = SimPlatform::healthy(80);
        sim.set_thermal(ThermalId::Pex, 98000);
        let bus = MemoryBus::new();
        let control = enabled_control_file();
        let mut state = running_state();

        let report = controller(&sim, &bus, &control).manage_fans(&mut state).unwrap();
        match report {
            PassReport::Managed { band, worst, .. } => {
                assert_eq!(band, Band::Critical);
                assert_eq!(worst, Some(WorstSensor { id: ThermalId::Pex, mcelsius: 98000 }));
            }
            other => panic!("unexpected report {:?}", other),
        }
        assert_eq!(sim.chassis_sets(), vec![100]);
    }

    #[test]
    fn test_cold_band_decays_once_per_window() {
        let sim = SimPlatform::healthy(80);
        let bus = MemoryBus::new();
        let control = enabled_control_file();
        let ctl = controller(&sim, &bus, &control);
        let mut state = running_state();

        ctl.manage_fans(&mut state).unwrap();
        assert_eq!(sim.chassis_sets(), vec![72]);

        ctl.manage_fans(&mut state).unwrap();
        assert_eq!(sim.chassis_sets(), vec![72]);
    }

    #[test]
    fn test_latched_shutdown_sets_full_speed_once() {
        let sim = SimPlatform::healthy(70);
        sim.set_thermal(ThermalId::CpuCore0, 80000);
        let bus = MemoryBus::new();
        bus.set(LPC_BASE, SHUTDOWN_STATUS, 0xfb);
        let control = enabled_control_file();
        let ctl = controller(&sim, &bus, &control);
        let mut state = running_state();

        assert_eq!(ctl.manage_fans(&mut state).unwrap(), PassReport::ShutdownLatched { first_report: true });
        assert_eq!(ctl.manage_fans(&mut state).unwrap(), PassReport::ShutdownLatched { first_report: false });
        assert_eq!(sim.chassis_sets(), vec![100]);
        assert_eq!(state.previous_band, None);
    }

    #[test]
    fn test_shutdown_threshold_latches_hardware() {
        let sim = SimPlatform::healthy(100);
        sim.set_thermal(ThermalId::CpuCore2, 101000);
        let bus = MemoryBus::new();
        let control = enabled_control_file();
        let mut state = running_state();

        let report = controller(&sim, &bus, &control).manage_fans(&mut state).unwrap();
        assert_eq!(
            report,
            PassReport::ShutdownTriggered { sensor: ThermalId::CpuCore2, mcelsius: 101000, threshold: 100000 }
        );
        let offsets: Vec<u32> = bus.writes().iter().map(|w| w.offset).collect();
        assert_eq!(offsets, vec![WATCHDOG_CLEAR, SHUTDOWN_PROTECT, SHUTDOWN_STATUS]);
        assert!(sim.chassis_sets().is_empty());
    }

    #[test]
    fn test_missing_fan_forces_full_speed() {
        let sim = SimPlatform::healthy(70);
        sim.set_fan_present(3, false);
        sim.set_thermal(ThermalId::CpuCore0, 45000);
        let bus = MemoryBus::new();
        let control = enabled_control_file();
        let mut state = running_state();

        let report = controller(&sim, &bus, &control).manage_fans(&mut state).unwrap();
        assert!(matches!(report, PassReport::Managed { fans_problem: true, applied_speed: Some(100), .. }));
        assert_eq!(sim.chassis_sets(), vec![100]);
    }

    #[test]
    fn test_missing_psu_forces_full_speed() {
        let sim = SimPlatform::healthy(70);
        sim.set_psu_present(2, false);
        let bus = MemoryBus::new();
        let control = enabled_control_file();
        let mut state = running_state();

        let report = controller(&sim, &bus, &control).manage_fans(&mut state).unwrap();
        assert!(matches!(report, PassReport::Managed { psus_problem: true, applied_speed: Some(100), .. }));
    }

    #[test]
    fn test_fan_outside_rpm_window_forces_full_speed() {
        let sim = SimPlatform::healthy(70);
        // rear ceiling is 18000 * 1.12 = 20160
        sim.set_fan_rpm(2, 25000);
        let bus = MemoryBus::new();
        let control = enabled_control_file();
        let mut state = running_state();

        let report = controller(&sim, &bus, &control).manage_fans(&mut state).unwrap();
        // low band would otherwise decay 70 to 63
        assert!(matches!(
            report,
            PassReport::Managed { band: Band::Low, fans_problem: true, psus_problem: false, applied_speed: Some(100), .. }
        ));
        assert_eq!(sim.chassis_sets(), vec![100]);
        assert_eq!(state.cooldown_ticks, 30);
    }

    #[test]
    fn test_psu_read_failure_forces_full_speed() {
        let sim = SimPlatform::healthy(70);
        sim.fail_psu_read(1);
        let bus = MemoryBus::new();
        let control = enabled_control_file();
        let mut state = running_state();

        let report = controller(&sim, &bus, &control).manage_fans(&mut state).unwrap();
        assert!(matches!(
            report,
            PassReport::Managed { fans_problem: false, psus_problem: true, applied_speed: Some(100), .. }
        ));
        assert_eq!(sim.chassis_sets(), vec![100]);
        // unreadable PSU left alone, the other one raised
        assert_eq!(sim.psu_fan_percentage(1), 70);
        assert_eq!(sim.psu_fan_percentage(2), 100);
    }

    #[test]
    fn test_fan_read_failure_is_fatal() {
        let sim = SimPlatform::healthy(70);
        sim.fail_fan_read(4);
        let bus = MemoryBus::new();
        let control = enabled_control_file();
        let mut state = running_state();

        assert!(controller(&sim, &bus, &control).manage_fans(&mut state).is_err());
        assert!(sim.chassis_sets().is_empty());
    }

    #[test]
    fn test_thermal_read_failure_is_skipped() {
        let sim = SimPlatform::healthy(75);
        sim.set_thermal(ThermalId::CpuCore0, 62000);
        sim.set_thermal(ThermalId::Pex, 99000);
        sim.fail_thermal(ThermalId::Pex);
        let bus = MemoryBus::new();
        let control = enabled_control_file();
        let mut state = running_state();

        let report = controller(&sim, &bus, &control).manage_fans(&mut state).unwrap();
        assert!(matches!(report, PassReport::Managed { band: Band::Desired, .. }));
    }

    #[test]
    fn test_register_failure_is_fatal() {
        let sim = SimPlatform::healthy(75);
        let bus = MemoryBus::new();
        bus.fail_offset(SHUTDOWN_STATUS);
        let control = enabled_control_file();
        let mut state = running_state();

        assert!(controller(&sim, &bus, &control).manage_fans(&mut state).is_err());
    }

    #[test]
    fn test_report_json_shape() {
        let json = serde_json::to_value(PassReport::ShutdownLatched { first_report: true }).unwrap();
        assert_eq!(json, serde_json::json!({ "outcome": "shutdown_latched", "first_report": true }));
    }

    #[test]
    fn test_band_change_tracked() {
        let sim = SimPlatform::healthy(75);
        sim.set_thermal(ThermalId::CpuCore0, 67000);
        let bus = MemoryBus::new();
        let control = enabled_control_file();
        let mut state = running_state();

        controller(&sim, &bus, &control).manage_fans(&mut state).unwrap();
        assert_eq!(state.previous_band, Some(Band::High));
    }
}
