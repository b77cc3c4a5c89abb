//! I2C configuration

use crate::errors::{Error, Result};
use crate::units::*;

/// Fastest SCL clock the ESP-IDF master driver accepts.
pub const MAX_BAUDRATE: Hertz = Hertz(1_000_000);

/// Raw GPIO numbers of a bus, as the contract passes them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusPins {
    pub sda: i32,
    pub scl: i32,
}

impl BusPins {
    pub const fn new(sda: i32, scl: i32) -> Self {
        Self { sda, scl }
    }
}

/// I2C Master bus configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub pullup_enabled: bool,
    pub glitch_ignore_cnt: u8,
    pub intr_priority: i32,
}

impl Config {
    pub fn new() -> Self {
        Default::default()
    }

    #[must_use]
    pub fn enable_pullup(mut self, enable: bool) -> Self {
        self.pullup_enabled = enable;
        self
    }

    #[must_use]
    pub fn glitch_ignore_count(mut self, count: u8) -> Self {
        self.glitch_ignore_cnt = count;
        self
    }

    #[must_use]
    pub fn intr_priority(mut self, priority: i32) -> Self {
        self.intr_priority = priority;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pullup_enabled: true,
            glitch_ignore_cnt: 7,
            intr_priority: 0,
        }
    }
}

/// A 7-bit addressed peripheral on a master bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    pub address: u8,
    pub baudrate: Hertz,
}

impl DeviceConfig {
    pub const fn new(address: u8) -> Self {
        Self {
            address,
            baudrate: Hertz(100_000),
        }
    }

    #[must_use]
    pub fn baudrate(mut self, baudrate: Hertz) -> Self {
        self.baudrate = baudrate;
        self
    }

    /// Rejects what the driver would refuse anyway: addresses outside the
    /// 7-bit range and clocks that are zero or above [`MAX_BAUDRATE`].
    pub fn validate(&self) -> Result<()> {
        if self.address > 0x7f {
            return Err(Error::InvalidArg);
        }

        // i2c_device_config_t documentation says that clock speed must be no higher than 1 MHz
        if self.baudrate == Hertz::zero() || self.baudrate > MAX_BAUDRATE {
            return Err(Error::InvalidArg);
        }

        Ok(())
    }
}
