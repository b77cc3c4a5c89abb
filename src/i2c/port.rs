use core::fmt;

use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource, Operation, SevenBitAddress};

use crate::errors::Error;
use crate::timeout::TransferTimeout;
use crate::units::*;
use crate::LOG_TARGET;

use super::config::{BusPins, Config, DeviceConfig};
use super::driver::{MasterBus, MasterDevice};

/// Number of I2C controllers on the target chip.
pub const PORT_COUNT: usize = if cfg!(any(esp32c2, esp32c3, esp32c6)) {
    1
} else {
    2
};

/// Looks up a unit by the name PicoRuby scripts use for it.
pub fn unit_name_to_unit_num(unit_name: &str) -> Result<u8, PortError> {
    let unit = match unit_name {
        "I2C0" | "ESP32_I2C0" => 0,
        "I2C1" | "ESP32_I2C1" => 1,
        _ => return Err(PortError::UnknownUnit),
    };

    if unit as usize >= PORT_COUNT {
        return Err(PortError::UnknownUnit);
    }

    Ok(unit)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortError {
    /// The unit name matches no controller
    UnknownUnit,
    /// The unit number is out of range
    InvalidUnit(i32),
    /// The unit has not been set up with `gpio_init`
    NotInitialized(u8),
    /// The driver refused to create the master bus
    BusInit(Error),
    /// The driver failed to attach the device or to run the transfer
    Driver(Error),
}

impl PortError {
    /// Errors the C contract reports as `ERROR_INVALID_UNIT`.
    pub fn is_unit_error(&self) -> bool {
        !matches!(self, PortError::Driver(_))
    }
}

impl fmt::Display for PortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortError::UnknownUnit => write!(f, "Unknown I2C unit"),
            PortError::InvalidUnit(unit) => write!(f, "Invalid I2C unit: {unit}"),
            PortError::NotInitialized(unit) => write!(f, "I2C unit {unit} not initialized"),
            PortError::BusInit(err) => write!(f, "Failed to initialize I2C master bus: {err}"),
            PortError::Driver(err) => write!(f, "I2C driver error: {err}"),
        }
    }
}

impl std::error::Error for PortError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PortError::BusInit(err) | PortError::Driver(err) => Some(err),
            _ => None,
        }
    }
}

impl embedded_hal::i2c::Error for PortError {
    fn kind(&self) -> ErrorKind {
        match self {
            PortError::Driver(Error::NotFound) => {
                ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
            }
            PortError::Driver(Error::Fail | Error::InvalidResponse) => {
                ErrorKind::NoAcknowledge(NoAcknowledgeSource::Unknown)
            }
            _ => ErrorKind::Other,
        }
    }
}

/// An initialized unit: the bus it owns plus the clock its devices run at.
///
/// Every transfer attaches a device for `addr`, runs, and detaches it again,
/// whatever the outcome.
pub struct Port<B: MasterBus> {
    unit: u8,
    bus: B,
    frequency: Hertz,
    timeout: TransferTimeout,
}

impl<B: MasterBus> Port<B> {
    pub fn unit(&self) -> u8 {
        self.unit
    }

    pub fn frequency(&self) -> Hertz {
        self.frequency
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Timeout of the `embedded-hal` transfers.
    pub fn timeout(&self) -> TransferTimeout {
        self.timeout
    }

    pub fn set_timeout(&mut self, timeout: TransferTimeout) {
        self.timeout = timeout;
    }

    fn device(&self, addr: u8) -> Result<B::Device<'_>, PortError> {
        let config = DeviceConfig::new(addr).baudrate(self.frequency);

        self.bus.add_device(&config).map_err(|err| {
            ::log::debug!(target: LOG_TARGET, "Failed to add I2C device 0x{:02X}: {}", addr, err);
            PortError::Driver(err)
        })
    }

    pub fn read(
        &mut self,
        addr: u8,
        buffer: &mut [u8],
        timeout: TransferTimeout,
    ) -> Result<usize, PortError> {
        let mut device = self.device(addr)?;

        device.receive(buffer, timeout).map_err(|err| {
            ::log::debug!(target: LOG_TARGET, "I2C read from 0x{:02X} failed: {}", addr, err);
            PortError::Driver(err)
        })?;

        Ok(buffer.len())
    }

    pub fn write(
        &mut self,
        addr: u8,
        bytes: &[u8],
        timeout: TransferTimeout,
    ) -> Result<usize, PortError> {
        let mut device = self.device(addr)?;

        device.transmit(bytes, timeout).map_err(|err| {
            ::log::debug!(target: LOG_TARGET, "I2C write to 0x{:02X} failed: {}", addr, err);
            PortError::Driver(err)
        })?;

        Ok(bytes.len())
    }

    pub fn write_read(
        &mut self,
        addr: u8,
        bytes: &[u8],
        buffer: &mut [u8],
        timeout: TransferTimeout,
    ) -> Result<(), PortError> {
        let mut device = self.device(addr)?;

        device
            .transmit_receive(bytes, buffer, timeout)
            .map_err(|err| {
                ::log::debug!(
                    target: LOG_TARGET,
                    "I2C write-read with 0x{:02X} failed: {}",
                    addr,
                    err
                );
                PortError::Driver(err)
            })
    }

    pub fn probe(&mut self, addr: u8, timeout: TransferTimeout) -> Result<(), PortError> {
        self.bus.probe(addr, timeout).map_err(PortError::Driver)
    }
}

impl<B: MasterBus> embedded_hal::i2c::ErrorType for Port<B> {
    type Error = PortError;
}

impl<B: MasterBus> embedded_hal::i2c::I2c<SevenBitAddress> for Port<B> {
    fn read(&mut self, address: u8, read: &mut [u8]) -> Result<(), Self::Error> {
        let timeout = self.timeout;
        Port::read(self, address, read, timeout).map(drop)
    }

    fn write(&mut self, address: u8, write: &[u8]) -> Result<(), Self::Error> {
        let timeout = self.timeout;
        Port::write(self, address, write, timeout).map(drop)
    }

    fn write_read(
        &mut self,
        address: u8,
        write: &[u8],
        read: &mut [u8],
    ) -> Result<(), Self::Error> {
        let timeout = self.timeout;
        Port::write_read(self, address, write, read, timeout)
    }

    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let timeout = self.timeout;

        // The master driver only knows single transfers and write-then-read.
        match operations {
            [] => Ok(()),
            [Operation::Read(read)] => Port::read(self, address, read, timeout).map(drop),
            [Operation::Write(write)] => Port::write(self, address, write, timeout).map(drop),
            [Operation::Write(write), Operation::Read(read)] => {
                Port::write_read(self, address, write, read, timeout)
            }
            _ => Err(PortError::Driver(Error::NotSupported)),
        }
    }
}

/// The unit table behind the PicoRuby I2C contract.
pub struct I2cPorts<B: MasterBus> {
    ports: [Option<Port<B>>; PORT_COUNT],
}

impl<B: MasterBus> I2cPorts<B> {
    const EMPTY: Option<Port<B>> = None;

    pub const fn new() -> Self {
        Self {
            ports: [Self::EMPTY; PORT_COUNT],
        }
    }

    fn index(unit: i32) -> Result<usize, PortError> {
        usize::try_from(unit)
            .ok()
            .filter(|unit| *unit < PORT_COUNT)
            .ok_or(PortError::InvalidUnit(unit))
    }

    pub fn is_initialized(&self, unit: i32) -> bool {
        Self::index(unit).is_ok_and(|index| self.ports[index].is_some())
    }

    pub fn port(&self, unit: i32) -> Result<&Port<B>, PortError> {
        let index = Self::index(unit)?;

        self.ports[index]
            .as_ref()
            .ok_or(PortError::NotInitialized(index as u8))
    }

    pub fn port_mut(&mut self, unit: i32) -> Result<&mut Port<B>, PortError> {
        let index = Self::index(unit)?;

        self.ports[index]
            .as_mut()
            .ok_or(PortError::NotInitialized(index as u8))
    }

    /// Sets up `unit` with the default bus configuration.
    pub fn gpio_init(
        &mut self,
        unit: i32,
        frequency: Hertz,
        sda_pin: i32,
        scl_pin: i32,
    ) -> Result<(), PortError> {
        self.gpio_init_with_config(unit, frequency, BusPins::new(sda_pin, scl_pin), &Config::new())
    }

    /// Claims the controller of `unit`, releasing the bus it held before.
    ///
    /// When the driver refuses the new bus the unit is left uninitialized.
    pub fn gpio_init_with_config(
        &mut self,
        unit: i32,
        frequency: Hertz,
        pins: BusPins,
        config: &Config,
    ) -> Result<(), PortError> {
        let index = Self::index(unit).inspect_err(|_| {
            ::log::debug!(target: LOG_TARGET, "Invalid I2C unit: {}", unit);
        })?;

        if self.ports[index].take().is_some() {
            ::log::debug!(
                target: LOG_TARGET,
                "I2C unit {} already initialized, reinitializing",
                unit
            );
        }

        let bus = B::new(index as u8, pins, config).map_err(|err| {
            ::log::debug!(target: LOG_TARGET, "Failed to initialize I2C master bus: {}", err);
            PortError::BusInit(err)
        })?;

        self.ports[index] = Some(Port {
            unit: index as u8,
            bus,
            frequency,
            timeout: TransferTimeout::default(),
        });

        ::log::debug!(
            target: LOG_TARGET,
            "I2C unit {} initialized (SDA:{}, SCL:{}, freq:{})",
            unit,
            pins.sda,
            pins.scl,
            frequency
        );

        Ok(())
    }

    /// Releases the bus of `unit`. Releasing an idle unit is not an error.
    pub fn deinit(&mut self, unit: i32) -> Result<(), PortError> {
        let index = Self::index(unit)?;

        if self.ports[index].take().is_some() {
            ::log::debug!(target: LOG_TARGET, "I2C unit {} released", unit);
        }

        Ok(())
    }

    fn initialized(&mut self, unit: i32) -> Result<&mut Port<B>, PortError> {
        self.port_mut(unit).inspect_err(|_| {
            ::log::debug!(target: LOG_TARGET, "I2C unit {} not initialized", unit);
        })
    }

    /// Reads `dst.len()` bytes from `addr`, returning the count read.
    ///
    /// `nostop` is accepted for the contract's sake only: every receive of
    /// the master driver ends with a STOP.
    pub fn read_timeout_us(
        &mut self,
        unit: i32,
        addr: u8,
        dst: &mut [u8],
        nostop: bool,
        timeout_us: u32,
    ) -> Result<usize, PortError> {
        let port = self.initialized(unit)?;

        if nostop {
            ::log::trace!(target: LOG_TARGET, "nostop ignored on read from 0x{:02X}", addr);
        }

        port.read(addr, dst, TransferTimeout::from_micros(timeout_us))
    }

    /// Writes all of `src` to `addr`, returning the count written.
    ///
    /// `nostop` is ignored as in [`I2cPorts::read_timeout_us`].
    pub fn write_timeout_us(
        &mut self,
        unit: i32,
        addr: u8,
        src: &[u8],
        nostop: bool,
        timeout_us: u32,
    ) -> Result<usize, PortError> {
        let port = self.initialized(unit)?;

        if nostop {
            ::log::trace!(target: LOG_TARGET, "nostop ignored on write to 0x{:02X}", addr);
        }

        port.write(addr, src, TransferTimeout::from_micros(timeout_us))
    }
}

impl<B: MasterBus> Default for I2cPorts<B> {
    fn default() -> Self {
        Self::new()
    }
}
