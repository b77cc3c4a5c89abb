//! The C side of the PicoRuby I2C port contract (`include/i2c.h`).
//!
//! The entry points here take the unit table by reference so that they can
//! run against any [`MasterBus`]. On ESP-IDF targets they are exported under
//! the names the `picoruby-i2c` gem links against, backed by one process-wide
//! table of [`EspMasterBus`](crate::i2c::esp::EspMasterBus) units.

use core::ffi::{c_char, c_int, CStr};
use core::slice;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::i2c::driver::MasterBus;
use crate::i2c::port::{self, I2cPorts, PortError};
use crate::units::Hertz;

/// `i2c_status_t`
#[allow(non_camel_case_types)]
pub type i2c_status_t = c_int;

pub const ERROR_NONE: i2c_status_t = 0;
pub const ERROR_INVALID_UNIT: i2c_status_t = -1;

/// What a failed read or write returns.
pub const TRANSFER_FAILED: c_int = -1;

fn lock<B: MasterBus>(ports: &Mutex<I2cPorts<B>>) -> MutexGuard<'_, I2cPorts<B>> {
    // A panic inside a transfer leaves the table itself consistent.
    ports.lock().unwrap_or_else(PoisonError::into_inner)
}

fn transfer_result(result: Result<usize, PortError>) -> c_int {
    match result {
        Ok(len) => c_int::try_from(len).unwrap_or(c_int::MAX),
        Err(err) if err.is_unit_error() => ERROR_INVALID_UNIT,
        Err(_) => TRANSFER_FAILED,
    }
}

/// # Safety
///
/// `unit_name` must be null or point to a NUL-terminated string.
pub unsafe fn unit_name_to_unit_num(unit_name: *const c_char) -> c_int {
    if unit_name.is_null() {
        return ERROR_INVALID_UNIT;
    }

    let unit_name = CStr::from_ptr(unit_name);

    unit_name
        .to_str()
        .map_err(|_| PortError::UnknownUnit)
        .and_then(port::unit_name_to_unit_num)
        .map_or(ERROR_INVALID_UNIT, c_int::from)
}

pub fn gpio_init<B: MasterBus>(
    ports: &Mutex<I2cPorts<B>>,
    unit_num: c_int,
    frequency: u32,
    sda_pin: i8,
    scl_pin: i8,
) -> i2c_status_t {
    match lock(ports).gpio_init(unit_num, Hertz(frequency), sda_pin.into(), scl_pin.into()) {
        Ok(()) => ERROR_NONE,
        Err(_) => ERROR_INVALID_UNIT,
    }
}

/// # Safety
///
/// `dst` must be valid for writes of `len` bytes, or null.
pub unsafe fn read_timeout_us<B: MasterBus>(
    ports: &Mutex<I2cPorts<B>>,
    unit_num: c_int,
    addr: u8,
    dst: *mut u8,
    len: usize,
    nostop: bool,
    timeout_us: u32,
) -> c_int {
    let dst: &mut [u8] = if len == 0 {
        &mut []
    } else if dst.is_null() {
        return TRANSFER_FAILED;
    } else {
        slice::from_raw_parts_mut(dst, len)
    };

    transfer_result(lock(ports).read_timeout_us(unit_num, addr, dst, nostop, timeout_us))
}

/// # Safety
///
/// `src` must be valid for reads of `len` bytes, or null.
pub unsafe fn write_timeout_us<B: MasterBus>(
    ports: &Mutex<I2cPorts<B>>,
    unit_num: c_int,
    addr: u8,
    src: *const u8,
    len: usize,
    nostop: bool,
    timeout_us: u32,
) -> c_int {
    let src: &[u8] = if len == 0 {
        &[]
    } else if src.is_null() {
        return TRANSFER_FAILED;
    } else {
        slice::from_raw_parts(src, len)
    };

    transfer_result(lock(ports).write_timeout_us(unit_num, addr, src, nostop, timeout_us))
}

#[cfg(target_os = "espidf")]
mod exports {
    use core::ffi::{c_char, c_int};
    use std::sync::Mutex;

    use crate::i2c::esp::EspMasterBus;
    use crate::i2c::port::I2cPorts;

    use super::i2c_status_t;

    static PORTS: Mutex<I2cPorts<EspMasterBus>> = Mutex::new(I2cPorts::new());

    #[no_mangle]
    pub unsafe extern "C" fn I2C_unit_name_to_unit_num(unit_name: *const c_char) -> c_int {
        super::unit_name_to_unit_num(unit_name)
    }

    #[no_mangle]
    pub extern "C" fn I2C_gpio_init(
        unit_num: c_int,
        frequency: u32,
        sda_pin: i8,
        scl_pin: i8,
    ) -> i2c_status_t {
        super::gpio_init(&PORTS, unit_num, frequency, sda_pin, scl_pin)
    }

    #[no_mangle]
    pub unsafe extern "C" fn I2C_read_timeout_us(
        unit_num: c_int,
        addr: u8,
        dst: *mut u8,
        len: usize,
        nostop: bool,
        timeout_us: u32,
    ) -> c_int {
        super::read_timeout_us(&PORTS, unit_num, addr, dst, len, nostop, timeout_us)
    }

    // The header declares `src` as `uint8_t *`.
    #[no_mangle]
    pub unsafe extern "C" fn I2C_write_timeout_us(
        unit_num: c_int,
        addr: u8,
        src: *mut u8,
        len: usize,
        nostop: bool,
        timeout_us: u32,
    ) -> c_int {
        super::write_timeout_us(&PORTS, unit_num, addr, src, len, nostop, timeout_us)
    }
}
