//! A recording stand-in for the ESP-IDF master driver.
//!
//! Every test thread gets its own simulated controllers: peripherals attached
//! with [`attach`] answer like register files (first written byte selects the
//! register, further bytes auto-increment), everything else NACKs.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::marker::PhantomData;

use picoruby_i2c_esp_idf::errors::{Error, Result};
use picoruby_i2c_esp_idf::i2c::{BusPins, Config, DeviceConfig, MasterBus, MasterDevice};
use picoruby_i2c_esp_idf::timeout::TransferTimeout;
use picoruby_i2c_esp_idf::units::Hertz;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    BusCreated {
        port: u8,
        pins: BusPins,
        config: Config,
    },
    BusDeleted {
        port: u8,
    },
    DeviceAdded {
        port: u8,
        addr: u8,
        baudrate: Hertz,
    },
    DeviceRemoved {
        port: u8,
        addr: u8,
    },
    Receive {
        addr: u8,
        len: usize,
        timeout_ms: i32,
    },
    Transmit {
        addr: u8,
        bytes: Vec<u8>,
        timeout_ms: i32,
    },
    TransmitReceive {
        addr: u8,
        bytes: Vec<u8>,
        len: usize,
        timeout_ms: i32,
    },
    Probe {
        addr: u8,
        timeout_ms: i32,
    },
}

#[derive(Clone)]
pub struct RegisterDevice {
    pub registers: [u8; 256],
    pointer: u8,
}

impl RegisterDevice {
    pub fn new() -> Self {
        Self {
            registers: [0; 256],
            pointer: 0,
        }
    }

    #[must_use]
    pub fn with_register(mut self, register: u8, value: u8) -> Self {
        self.registers[register as usize] = value;
        self
    }

    fn write(&mut self, bytes: &[u8]) {
        if let Some((register, data)) = bytes.split_first() {
            self.pointer = *register;
            for byte in data {
                self.registers[self.pointer as usize] = *byte;
                self.pointer = self.pointer.wrapping_add(1);
            }
        }
    }

    fn read(&mut self, buffer: &mut [u8]) {
        for byte in buffer {
            *byte = self.registers[self.pointer as usize];
            self.pointer = self.pointer.wrapping_add(1);
        }
    }
}

#[derive(Default)]
struct State {
    events: Vec<Event>,
    peripherals: HashMap<(u8, u8), RegisterDevice>,
    bus_init_error: Option<Error>,
    add_device_error: Option<Error>,
    transfer_error: Option<Error>,
}

thread_local! {
    static STATE: RefCell<State> = RefCell::new(State::default());
}

fn with_state<R>(f: impl FnOnce(&mut State) -> R) -> R {
    STATE.with(|state| f(&mut state.borrow_mut()))
}

fn record(event: Event) {
    with_state(|state| state.events.push(event));
}

pub fn attach(port: u8, addr: u8, device: RegisterDevice) {
    with_state(|state| {
        state.peripherals.insert((port, addr), device);
    });
}

pub fn peripheral(port: u8, addr: u8) -> Option<RegisterDevice> {
    with_state(|state| state.peripherals.get(&(port, addr)).cloned())
}

pub fn fail_bus_init(err: Option<Error>) {
    with_state(|state| state.bus_init_error = err);
}

pub fn fail_add_device(err: Option<Error>) {
    with_state(|state| state.add_device_error = err);
}

pub fn fail_transfers(err: Option<Error>) {
    with_state(|state| state.transfer_error = err);
}

/// Drains the events recorded so far.
pub fn take_events() -> Vec<Event> {
    with_state(|state| std::mem::take(&mut state.events))
}

pub struct MockBus {
    port: u8,
}

impl MasterBus for MockBus {
    type Device<'a> = MockDevice<'a>;

    fn new(port: u8, pins: BusPins, config: &Config) -> Result<Self> {
        if let Some(err) = with_state(|state| state.bus_init_error) {
            return Err(err);
        }

        record(Event::BusCreated {
            port,
            pins,
            config: config.clone(),
        });

        Ok(Self { port })
    }

    fn add_device(&self, config: &DeviceConfig) -> Result<MockDevice<'_>> {
        config.validate()?;

        if let Some(err) = with_state(|state| state.add_device_error) {
            return Err(err);
        }

        record(Event::DeviceAdded {
            port: self.port,
            addr: config.address,
            baudrate: config.baudrate,
        });

        Ok(MockDevice {
            port: self.port,
            addr: config.address,
            _bus: PhantomData,
        })
    }

    fn probe(&self, address: u8, timeout: TransferTimeout) -> Result<()> {
        record(Event::Probe {
            addr: address,
            timeout_ms: timeout.as_millis(),
        });

        if with_state(|state| state.peripherals.contains_key(&(self.port, address))) {
            Ok(())
        } else {
            Err(Error::NotFound)
        }
    }
}

impl Drop for MockBus {
    fn drop(&mut self) {
        record(Event::BusDeleted { port: self.port });
    }
}

pub struct MockDevice<'a> {
    port: u8,
    addr: u8,
    _bus: PhantomData<&'a MockBus>,
}

impl MockDevice<'_> {
    fn with_peripheral(&self, f: impl FnOnce(&mut RegisterDevice)) -> Result<()> {
        with_state(|state| {
            if let Some(err) = state.transfer_error {
                return Err(err);
            }

            match state.peripherals.get_mut(&(self.port, self.addr)) {
                Some(peripheral) => {
                    f(peripheral);
                    Ok(())
                }
                None => Err(Error::Fail),
            }
        })
    }
}

impl MasterDevice for MockDevice<'_> {
    fn receive(&mut self, buffer: &mut [u8], timeout: TransferTimeout) -> Result<()> {
        record(Event::Receive {
            addr: self.addr,
            len: buffer.len(),
            timeout_ms: timeout.as_millis(),
        });

        self.with_peripheral(|peripheral| peripheral.read(buffer))
    }

    fn transmit(&mut self, bytes: &[u8], timeout: TransferTimeout) -> Result<()> {
        record(Event::Transmit {
            addr: self.addr,
            bytes: bytes.to_vec(),
            timeout_ms: timeout.as_millis(),
        });

        self.with_peripheral(|peripheral| peripheral.write(bytes))
    }

    fn transmit_receive(
        &mut self,
        bytes: &[u8],
        buffer: &mut [u8],
        timeout: TransferTimeout,
    ) -> Result<()> {
        record(Event::TransmitReceive {
            addr: self.addr,
            bytes: bytes.to_vec(),
            len: buffer.len(),
            timeout_ms: timeout.as_millis(),
        });

        self.with_peripheral(|peripheral| {
            peripheral.write(bytes);
            peripheral.read(buffer);
        })
    }
}

impl Drop for MockDevice<'_> {
    fn drop(&mut self) {
        record(Event::DeviceRemoved {
            port: self.port,
            addr: self.addr,
        });
    }
}
