//! The boundary to the vendor I2C master driver.
//!
//! A [`MasterBus`] owns one controller (the `i2c_master_bus_handle_t`), a
//! [`MasterDevice`] one addressed peripheral on it (the
//! `i2c_master_dev_handle_t`). Both release their driver object on drop.

use crate::errors::Result;
use crate::timeout::TransferTimeout;

use super::config::{BusPins, Config, DeviceConfig};

pub trait MasterBus: Sized {
    type Device<'a>: MasterDevice
    where
        Self: 'a;

    /// Claims controller `port` on the given pins.
    fn new(port: u8, pins: BusPins, config: &Config) -> Result<Self>;

    /// Attaches a peripheral to the bus. The device borrows the bus, so the
    /// bus can not be deleted while a transfer is in flight.
    fn add_device(&self, config: &DeviceConfig) -> Result<Self::Device<'_>>;

    /// Checks whether anything ACKs `address`.
    fn probe(&self, address: u8, timeout: TransferTimeout) -> Result<()>;
}

pub trait MasterDevice {
    fn receive(&mut self, buffer: &mut [u8], timeout: TransferTimeout) -> Result<()>;

    fn transmit(&mut self, bytes: &[u8], timeout: TransferTimeout) -> Result<()>;

    /// Write then read with a repeated start in between.
    fn transmit_receive(
        &mut self,
        bytes: &[u8],
        buffer: &mut [u8],
        timeout: TransferTimeout,
    ) -> Result<()>;
}
