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

use std::fmt;
use std::path::Path;

use idg_error::Result;
use serde::Serialize;

use crate::constants::platform::{CPLD_BOARD_VERSION, CPLD_MGMT_VERSION, CPLD_PORT_VERSION, ONIE_NAME, ONL_NAME};
use crate::sensors::file::read_int;

/// CPLD revisions of the three board CPLDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlatformInfo {
    pub cpld_board: i32,
    pub cpld_mgmt: i32,
    pub cpld_port: i32,
}

impl fmt::Display for PlatformInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "brd={}, mgmt={}, port={}", self.cpld_board, self.cpld_mgmt, self.cpld_port)
    }
}

pub fn platform_info(root: &Path) -> Result<PlatformInfo> {
    Ok(PlatformInfo {
        cpld_board: read_int(&root.join(CPLD_BOARD_VERSION))?,
        cpld_mgmt: read_int(&root.join(CPLD_MGMT_VERSION))?,
        cpld_port: read_int(&root.join(CPLD_PORT_VERSION))?,
    })
}

/// Map the ONIE platform name to the ONL one
pub fn platform_name(onie: &str) -> Option<&'static str> {
    (onie == ONIE_NAME).then_some(ONL_NAME)
}
