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

//! idg4400 - Thermal platform layer for the Mellanox IDG4400 switch
//!
//! This library provides typed access to the board sensors through the BSP
//! sysfs tree, the CPLD watchdog and shutdown registers, and the closed-loop
//! fan controller that keeps the chassis inside its thermal envelope.

pub mod config;
pub mod constants;
pub mod leds;
pub mod registers;
pub mod sensors;
pub mod system;
pub mod thermal;
pub mod types;
pub mod voltage;

#[cfg(test)]
pub mod test_utils;

pub use idg_error::{ErrorKind, PlatformError, Result};
