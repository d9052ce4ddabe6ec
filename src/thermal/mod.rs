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

//! Thermal management core

pub mod actuator;
pub mod aggregate;
pub mod algorithms;
pub mod controller;
pub mod guard;
pub mod ranges;
pub mod state;

pub use actuator::{set_all_fans_speed, PsuView};
pub use aggregate::{SeverityAggregate, WorstSensor};
pub use algorithms::{cold_algorithm, hot_algorithm, HotTrigger};
pub use controller::{PassReport, ThermalController};
pub use guard::ShutdownGuard;
pub use ranges::{Band, BandRange, RangeTable, SensorRanges};
pub use state::{ControlState, ThermalSamples};
