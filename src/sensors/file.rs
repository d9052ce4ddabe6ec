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

//! Small read/write helpers for BSP attribute files
//!
//! BSP attributes hold one decimal integer or one keyword per file.

use std::fs;
use std::path::Path;

use idg_error::{PlatformError, Result};

/// Read a decimal integer attribute
pub fn read_int(path: &Path) -> Result<i32> {
    let content = fs::read_to_string(path).map_err(|e| PlatformError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    content.trim().parse::<i32>().map_err(|_| PlatformError::Parse {
        path: path.to_path_buf(),
        content: content.trim().to_string(),
    })
}

/// Write an attribute value
pub fn write_value(path: &Path, value: impl ToString) -> Result<()> {
    fs::write(path, value.to_string()).map_err(|e| PlatformError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
