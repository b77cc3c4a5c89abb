//! [`MasterBus`] on top of ESP-IDF's `driver/i2c_master.h`.

use core::marker::PhantomData;
use core::ptr;

use esp_idf_sys::{
    i2c_addr_bit_len_t_I2C_ADDR_BIT_LEN_7, i2c_del_master_bus, i2c_device_config_t,
    i2c_master_bus_add_device, i2c_master_bus_config_t, i2c_master_bus_config_t__bindgen_ty_1,
    i2c_master_bus_handle_t, i2c_master_bus_rm_device, i2c_master_dev_handle_t,
    i2c_master_probe, i2c_master_receive, i2c_master_transmit, i2c_master_transmit_receive,
    i2c_new_master_bus, soc_periph_i2c_clk_src_t_I2C_CLK_SRC_DEFAULT,
};

use crate::errors::Result;
use crate::timeout::TransferTimeout;
use crate::LOG_TARGET;

use super::config::{BusPins, Config, DeviceConfig};
use super::driver::{MasterBus, MasterDevice};

/// One claimed I2C controller.
pub struct EspMasterBus {
    port: u8,
    handle: i2c_master_bus_handle_t,
}

unsafe impl Send for EspMasterBus {}

impl EspMasterBus {
    pub fn port(&self) -> u8 {
        self.port
    }
}

impl MasterBus for EspMasterBus {
    type Device<'a> = EspMasterDevice<'a>;

    fn new(port: u8, pins: BusPins, config: &Config) -> Result<Self> {
        let config = i2c_master_bus_config_t {
            i2c_port: port as _,
            sda_io_num: pins.sda as _,
            scl_io_num: pins.scl as _,
            clk_source: soc_periph_i2c_clk_src_t_I2C_CLK_SRC_DEFAULT,
            glitch_ignore_cnt: config.glitch_ignore_cnt,
            intr_priority: config.intr_priority,
            // Synchronous transfers only.
            trans_queue_depth: 0,
            flags: {
                let mut flags = i2c_master_bus_config_t__bindgen_ty_1::default();
                flags.set_enable_internal_pullup(config.pullup_enabled as _);
                flags
            },
            ..Default::default()
        };

        let mut handle: i2c_master_bus_handle_t = ptr::null_mut();

        crate::esp!(unsafe { i2c_new_master_bus(&config, &mut handle as _) })?;

        Ok(Self { port, handle })
    }

    fn add_device(&self, config: &DeviceConfig) -> Result<EspMasterDevice<'_>> {
        config.validate()?;

        let config = i2c_device_config_t {
            dev_addr_length: i2c_addr_bit_len_t_I2C_ADDR_BIT_LEN_7,
            device_address: config.address as u16,
            scl_speed_hz: config.baudrate.into(),
            ..Default::default()
        };

        let mut handle: i2c_master_dev_handle_t = ptr::null_mut();

        crate::esp!(unsafe { i2c_master_bus_add_device(self.handle, &config, &mut handle as _) })?;

        Ok(EspMasterDevice {
            handle,
            _bus: PhantomData,
        })
    }

    fn probe(&self, address: u8, timeout: TransferTimeout) -> Result<()> {
        crate::esp!(unsafe {
            i2c_master_probe(self.handle, address as u16, timeout.as_millis())
        })
    }
}

impl Drop for EspMasterBus {
    fn drop(&mut self) {
        if let Err(err) = crate::esp!(unsafe { i2c_del_master_bus(self.handle) }) {
            ::log::warn!(target: LOG_TARGET, "Failed to delete I2C bus {}: {}", self.port, err);
        }
    }
}

/// A peripheral attached to an [`EspMasterBus`] for as long as it lives.
pub struct EspMasterDevice<'a> {
    handle: i2c_master_dev_handle_t,
    _bus: PhantomData<&'a EspMasterBus>,
}

impl MasterDevice for EspMasterDevice<'_> {
    fn receive(&mut self, buffer: &mut [u8], timeout: TransferTimeout) -> Result<()> {
        crate::esp!(unsafe {
            i2c_master_receive(
                self.handle,
                buffer.as_mut_ptr(),
                buffer.len(),
                timeout.as_millis(),
            )
        })
    }

    fn transmit(&mut self, bytes: &[u8], timeout: TransferTimeout) -> Result<()> {
        crate::esp!(unsafe {
            i2c_master_transmit(self.handle, bytes.as_ptr(), bytes.len(), timeout.as_millis())
        })
    }

    fn transmit_receive(
        &mut self,
        bytes: &[u8],
        buffer: &mut [u8],
        timeout: TransferTimeout,
    ) -> Result<()> {
        crate::esp!(unsafe {
            i2c_master_transmit_receive(
                self.handle,
                bytes.as_ptr(),
                bytes.len(),
                buffer.as_mut_ptr(),
                buffer.len(),
                timeout.as_millis(),
            )
        })
    }
}

impl Drop for EspMasterDevice<'_> {
    fn drop(&mut self) {
        if let Err(err) = crate::esp!(unsafe { i2c_master_bus_rm_device(self.handle) }) {
            ::log::warn!(target: LOG_TARGET, "Failed to remove I2C device: {}", err);
        }
    }
}
