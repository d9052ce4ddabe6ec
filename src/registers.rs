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

//! CPLD register access
//!
//! The control loop talks to the board CPLD through [`RegisterBus`]. Three
//! backends exist:
//! - [`DevPortBus`]: port I/O through `/dev/port` (default)
//! - [`IorwBus`]: the vendor `iorw` helper, one blocking process per access
//! - [`MemoryBus`]: an in-memory register file for bench runs and tests

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Mutex, MutexGuard};

use idg_error::{PlatformError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, trace};

use crate::constants::paths;

lazy_static! {
    static ref IORW_VALUE: Option<Regex> = Regex::new(r"= 0x([0-9a-fA-F]+)").ok();
}

/// Byte-addressed register access relative to a base address
#[cfg_attr(test, mockall::automock)]
pub trait RegisterBus {
    fn read_register(&self, base: u32, offset: u32, width: u8) -> Result<u32>;
    fn write_register(&self, base: u32, offset: u32, width: u8, value: u32) -> Result<()>;
}

fn check_width(width: u8) -> Result<usize> {
    if (1..=4).contains(&width) {
        Ok(usize::from(width))
    } else {
        Err(PlatformError::internal(format!("unsupported register width {}", width)))
    }
}

// ============================================================================
// /dev/port
// ============================================================================

/// Direct port I/O; requires root
#[derive(Debug, Clone)]
pub struct DevPortBus {
    path: PathBuf,
}

impl DevPortBus {
    pub fn new() -> Self {
        Self::with_path(paths::DEV_PORT)
    }

    /// Use another port device, e.g. a plain file in tests
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for DevPortBus {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBus for DevPortBus {
    fn read_register(&self, base: u32, offset: u32, width: u8) -> Result<u32> {
        let len = check_width(width)?;
        let mut port = OpenOptions::new()
            .read(true)
            .open(&self.path)
            .map_err(|e| PlatformError::register_read(base, offset, format!("open {}: {}", self.path.display(), e)))?;
        port.seek(SeekFrom::Start(u64::from(base) + u64::from(offset)))
            .map_err(|e| PlatformError::register_read(base, offset, format!("seek: {}", e)))?;

        let mut buf = [0u8; 4];
        port.read_exact(&mut buf[..len])
            .map_err(|e| PlatformError::register_read(base, offset, format!("read: {}", e)))?;
        let value = u32::from_le_bytes(buf);

        trace!(base = format_args!("{:#x}", base), offset = format_args!("{:#x}", offset), value = format_args!("{:#x}", value), "port read");
        Ok(value)
    }

    fn write_register(&self, base: u32, offset: u32, width: u8, value: u32) -> Result<()> {
        let len = check_width(width)?;
        let mut port = OpenOptions::new()
            .write(true)
            .open(&self.path)
            .map_err(|e| PlatformError::register_write(base, offset, value, format!("open {}: {}", self.path.display(), e)))?;
        port.seek(SeekFrom::Start(u64::from(base) + u64::from(offset)))
            .map_err(|e| PlatformError::register_write(base, offset, value, format!("seek: {}", e)))?;
        port.write_all(&value.to_le_bytes()[..len])
            .map_err(|e| PlatformError::register_write(base, offset, value, format!("write: {}", e)))?;

        trace!(base = format_args!("{:#x}", base), offset = format_args!("{:#x}", offset), value = format_args!("{:#x}", value), "port write");
        Ok(())
    }
}

// ============================================================================
// iorw helper process
// ============================================================================

/// Register access through the `iorw` helper
///
/// `IDG_IORW` overrides the helper binary, which lets an emulator stand in
/// for the CPLD.
#[derive(Debug, Clone)]
pub struct IorwBus {
    program: PathBuf,
}

impl IorwBus {
    pub fn new() -> Self {
        let program = std::env::var_os(paths::IORW_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(paths::IORW_BINARY));
        Self { program }
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self, base: u32, offset: u32, width: u8) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-b")
            .arg(base.to_string())
            .arg(format!("-l{}", width))
            .arg("-o")
            .arg(offset.to_string());
        cmd
    }
}

impl Default for IorwBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the value from `iorw -r` output (`... = 0x<hex>`)
pub fn parse_iorw_output(output: &str) -> Option<u32> {
    let caps = IORW_VALUE.as_ref()?.captures(output)?;
    u32::from_str_radix(caps.get(1)?.as_str(), 16).ok()
}

impl RegisterBus for IorwBus {
    fn read_register(&self, base: u32, offset: u32, width: u8) -> Result<u32> {
        check_width(width)?;
        let mut cmd = self.command(base, offset, width);
        cmd.arg("-r");

        debug!("Executing: {} {:?}", self.program.display(), cmd.get_args().collect::<Vec<_>>());

        let output = cmd
            .output()
            .map_err(|e| PlatformError::register_read(base, offset, format!("failed to execute {}: {}", self.program.display(), e)))?;

        if !output.status.success() {
            return Err(PlatformError::register_read(
                base,
                offset,
                format!("{} exited with {}: {}", self.program.display(), output.status, String::from_utf8_lossy(&output.stderr).trim()),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_iorw_output(&stdout)
            .ok_or_else(|| PlatformError::register_read(base, offset, format!("unexpected output '{}'", stdout.trim())))
    }

    fn write_register(&self, base: u32, offset: u32, width: u8, value: u32) -> Result<()> {
        check_width(width)?;
        let mut cmd = self.command(base, offset, width);
        cmd.arg("-w").arg("-v").arg(value.to_string());

        debug!("Executing: {} {:?}", self.program.display(), cmd.get_args().collect::<Vec<_>>());

        let output = cmd
            .output()
            .map_err(|e| PlatformError::register_write(base, offset, value, format!("failed to execute {}: {}", self.program.display(), e)))?;

        if !output.status.success() {
            return Err(PlatformError::register_write(
                base,
                offset,
                value,
                format!("{} exited with {}: {}", self.program.display(), output.status, String::from_utf8_lossy(&output.stderr).trim()),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// In-memory register file
// ============================================================================

/// One recorded register write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegisterWrite {
    pub base: u32,
    pub offset: u32,
    pub value: u32,
}

#[derive(Debug, Default)]
struct MemoryState {
    values: HashMap<(u32, u32), u32>,
    writes: Vec<RegisterWrite>,
    failing_offsets: Vec<u32>,
}

/// Register file kept in memory. Unwritten registers read as `0xff`.
#[derive(Debug, Default)]
pub struct MemoryBus {
    state: Mutex<MemoryState>,
}

impl MemoryBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Preload a register without recording a write
    pub fn set(&self, base: u32, offset: u32, value: u32) {
        self.lock().values.insert((base, offset), value);
    }

    pub fn get(&self, base: u32, offset: u32) -> u32 {
        self.lock().values.get(&(base, offset)).copied().unwrap_or(0xff)
    }

    /// Make every access to `offset` fail
    pub fn fail_offset(&self, offset: u32) {
        self.lock().failing_offsets.push(offset);
    }

    pub fn writes(&self) -> Vec<RegisterWrite> {
        self.lock().writes.clone()
    }

    pub fn clear_writes(&self) {
        self.lock().writes.clear();
    }
}

impl RegisterBus for MemoryBus {
    fn read_register(&self, base: u32, offset: u32, width: u8) -> Result<u32> {
        check_width(width)?;
        let state = self.lock();
        if state.failing_offsets.contains(&offset) {
            return Err(PlatformError::register_read(base, offset, "injected failure"));
        }
        Ok(state.values.get(&(base, offset)).copied().unwrap_or(0xff))
    }

    fn write_register(&self, base: u32, offset: u32, width: u8, value: u32) -> Result<()> {
        check_width(width)?;
        let mut state = self.lock();
        if state.failing_offsets.contains(&offset) {
            return Err(PlatformError::register_write(base, offset, value, "injected failure"));
        }
        state.values.insert((base, offset), value);
        state.writes.push(RegisterWrite { base, offset, value });
        Ok(())
    }
}

impl<B: RegisterBus + ?Sized> RegisterBus for &B {
    fn read_register(&self, base: u32, offset: u32, width: u8) -> Result<u32> {
        (**self).read_register(base, offset, width)
    }

    fn write_register(&self, base: u32, offset: u32, width: u8, value: u32) -> Result<()> {
        (**self).write_register(base, offset, width, value)
    }
}

impl<B: RegisterBus + ?Sized> RegisterBus for Box<B> {
    fn read_register(&self, base: u32, offset: u32, width: u8) -> Result<u32> {
        (**self).read_register(base, offset, width)
    }

    fn write_register(&self, base: u32, offset: u32, width: u8, value: u32) -> Result<()> {
        (**self).write_register(base, offset, width, value)
    }
}
