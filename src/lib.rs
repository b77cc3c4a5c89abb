//! PicoRuby's I2C port layer for ESP32 chips, on top of the ESP-IDF v5 I2C
//! master driver.
//!
//! The PicoRuby `picoruby-i2c` gem talks to the hardware through a small C
//! contract: resolve a unit name, bring a unit up on a pair of pins, then read
//! or write a buffer with a timeout. [`ffi`] exports that contract. Rust code
//! can use the same unit table directly through [`i2c::I2cPorts`], or drive an
//! initialized [`i2c::Port`] through `embedded-hal`.

pub mod errors;
pub mod ffi;
pub mod i2c;
pub mod timeout;
pub mod units;

/// Log target of everything this crate logs; the ESP-IDF tag of the port.
pub const LOG_TARGET: &str = "picoruby_i2c";
