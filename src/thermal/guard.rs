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

//! Shutdown latch and hardware watchdog
//!
//! The CPLD watchdog forces the fans to full speed when software stops
//! clearing it. The shutdown path is one-way: once latched, only a power
//! cycle brings the board back.

use idg_error::Result;
use tracing::debug;

use crate::constants::registers::*;
use crate::registers::RegisterBus;

/// Register-level safety operations
#[derive(Debug)]
pub struct ShutdownGuard<B> {
    bus: B,
}

impl<B: RegisterBus> ShutdownGuard<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    fn write(&self, offset: u32, value: u32) -> Result<()> {
        self.bus.write_register(LPC_BASE, offset, WIDTH, value)
    }

    /// True once the board has latched into emergency shutdown (status bit
    /// 2 is active-low)
    pub fn is_system_in_shutdown_state(&self) -> Result<bool> {
        let raw = self.bus.read_register(LPC_BASE, SHUTDOWN_STATUS, WIDTH)?;
        Ok(((!raw) & SHUTDOWN_STATUS_MASK) >> SHUTDOWN_STATUS_SHIFT == 1)
    }

    /// Program timeout, action, clear protection, then start the timer.
    /// Stops at the first failing write.
    pub fn arm_watchdog(&self) -> Result<()> {
        self.write(WATCHDOG_TIMEOUT, WATCHDOG_TIMEOUT_VALUE)?;
        self.write(WATCHDOG_ACTION, WATCHDOG_ACTION_VALUE)?;
        self.write(WATCHDOG_CLEAR_PROTECT, WATCHDOG_UNPROTECT_VALUE)?;
        self.write(WATCHDOG_CLEAR, WATCHDOG_ARM_VALUE)?;
        debug!(timeout_ms = 1u32 << WATCHDOG_TIMEOUT_VALUE, "Watchdog armed");
        Ok(())
    }

    pub fn refresh_watchdog(&self) -> Result<()> {
        debug!("Reset the watchdog timer");
        self.write(WATCHDOG_CLEAR, WATCHDOG_REFRESH_VALUE)
    }

    /// Latch the hardware shutdown path. The host reboots and the switch
    /// board powers down after the second write.
    pub fn trigger_shutdown(&self) -> Result<()> {
        self.write(SHUTDOWN_PROTECT, SHUTDOWN_TRIGGER_VALUE)?;
        self.write(SHUTDOWN_STATUS, SHUTDOWN_TRIGGER_VALUE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::{MemoryBus, MockRegisterBus, RegisterWrite};
    use idg_error::PlatformError;
    use mockall::predicate::eq;

    fn write(offset: u32, value: u32) -> RegisterWrite {
        RegisterWrite { base: LPC_BASE, offset, value }
    }

    #[test]
    fn test_shutdown_bit_is_active_low() {
        let bus = MemoryBus::new();
        let guard = ShutdownGuard::new(&bus);

        bus.set(LPC_BASE, SHUTDOWN_STATUS, 0xff);
        assert!(!guard.is_system_in_shutdown_state().unwrap());

        bus.set(LPC_BASE, SHUTDOWN_STATUS, 0xfb);
        assert!(guard.is_system_in_shutdown_state().unwrap());

        // other bits don't matter
        bus.set(LPC_BASE, SHUTDOWN_STATUS, 0x04);
        assert!(!guard.is_system_in_shutdown_state().unwrap());
    }

    #[test]
    fn test_arm_sequence() {
        let bus = MemoryBus::new();
        ShutdownGuard::new(&bus).arm_watchdog().unwrap();
        assert_eq!(
            bus.writes(),
            vec![write(0xc9, 14), write(0xcb, 0x90), write(0xc8, 0xee), write(0xc7, 0x11)]
        );
    }

    #[test]
    fn test_arm_aborts_on_first_failure() {
        let bus = MemoryBus::new();
        bus.fail_offset(WATCHDOG_ACTION);
        let err = ShutdownGuard::new(&bus).arm_watchdog().unwrap_err();
        assert!(matches!(err, PlatformError::RegisterWrite { offset: 0xcb, .. }));
        assert_eq!(bus.writes(), vec![write(0xc9, 14)]);
    }

    #[test]
    fn test_refresh_and_trigger() {
        let bus = MemoryBus::new();
        let guard = ShutdownGuard::new(&bus);
        guard.refresh_watchdog().unwrap();
        guard.trigger_shutdown().unwrap();
        assert_eq!(bus.writes(), vec![write(0xc7, 0x1), write(0x2f, 0xfb), write(0x2e, 0xfb)]);
    }

    #[test]
    fn test_read_failure_propagates() {
        let mut bus = MockRegisterBus::new();
        bus.expect_read_register()
            .with(eq(0x2500), eq(0x2e), eq(1))
            .times(1)
            .returning(|base, offset, _| Err(PlatformError::register_read(base, offset, "helper crashed")));
        let guard = ShutdownGuard::new(bus);
        assert!(guard.is_system_in_shutdown_state().is_err());
    }
}
