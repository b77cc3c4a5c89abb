mod common;

use std::ptr;
use std::sync::Mutex;

use common::{Event, MockBus, RegisterDevice};

use picoruby_i2c_esp_idf::ffi::{self, ERROR_INVALID_UNIT, ERROR_NONE, TRANSFER_FAILED};
use picoruby_i2c_esp_idf::i2c::I2cPorts;

const VL53L0X: u8 = 0x29;

fn table() -> Mutex<I2cPorts<MockBus>> {
    Mutex::new(I2cPorts::new())
}

#[test]
fn gpio_init_reports_status_codes() {
    let ports = table();

    assert_eq!(ffi::gpio_init(&ports, 0, 100_000, 21, 22), ERROR_NONE);
    assert_eq!(ffi::gpio_init(&ports, -1, 100_000, 21, 22), ERROR_INVALID_UNIT);
    assert_eq!(ffi::gpio_init(&ports, 2, 100_000, 21, 22), ERROR_INVALID_UNIT);

    common::fail_bus_init(Some(picoruby_i2c_esp_idf::errors::Error::InvalidArg));
    assert_eq!(ffi::gpio_init(&ports, 0, 100_000, 21, 22), ERROR_INVALID_UNIT);
}

#[test]
fn pins_are_sign_extended() {
    let ports = table();

    assert_eq!(ffi::gpio_init(&ports, 0, 100_000, -1, 22), ERROR_NONE);

    assert!(matches!(
        common::take_events()[0],
        Event::BusCreated { pins, .. } if pins.sda == -1 && pins.scl == 22
    ));
}

#[test]
fn transfers_on_a_down_unit_report_invalid_unit() {
    let ports = table();
    let mut buf = [0u8; 4];

    unsafe {
        assert_eq!(
            ffi::read_timeout_us(&ports, 0, VL53L0X, buf.as_mut_ptr(), buf.len(), false, 1_000),
            ERROR_INVALID_UNIT
        );
        assert_eq!(
            ffi::write_timeout_us(&ports, 5, VL53L0X, buf.as_ptr(), buf.len(), false, 1_000),
            ERROR_INVALID_UNIT
        );
    }
}

#[test]
fn transfers_return_the_byte_count() {
    let ports = table();
    assert_eq!(ffi::gpio_init(&ports, 0, 400_000, 21, 22), ERROR_NONE);
    common::attach(0, VL53L0X, RegisterDevice::new().with_register(0x00, 0x42));

    let mut buf = [0u8; 4];
    let reg = [0x00u8];

    unsafe {
        assert_eq!(
            ffi::write_timeout_us(&ports, 0, VL53L0X, reg.as_ptr(), reg.len(), true, 1_000),
            1
        );
        assert_eq!(
            ffi::read_timeout_us(&ports, 0, VL53L0X, buf.as_mut_ptr(), buf.len(), false, 1_000),
            4
        );
    }

    assert_eq!(buf[0], 0x42);
}

#[test]
fn nack_reports_transfer_failure() {
    let ports = table();
    assert_eq!(ffi::gpio_init(&ports, 0, 100_000, 21, 22), ERROR_NONE);

    let mut buf = [0u8; 1];

    unsafe {
        assert_eq!(
            ffi::read_timeout_us(&ports, 0, 0x50, buf.as_mut_ptr(), 1, false, 1_000),
            TRANSFER_FAILED
        );
    }
}

#[test]
fn null_buffers_are_refused_before_the_driver() {
    let ports = table();
    assert_eq!(ffi::gpio_init(&ports, 0, 100_000, 21, 22), ERROR_NONE);
    common::take_events();

    unsafe {
        assert_eq!(
            ffi::read_timeout_us(&ports, 0, VL53L0X, ptr::null_mut(), 2, false, 1_000),
            TRANSFER_FAILED
        );
        assert_eq!(
            ffi::write_timeout_us(&ports, 0, VL53L0X, ptr::null(), 2, false, 1_000),
            TRANSFER_FAILED
        );
    }

    assert!(common::take_events().is_empty());
}

#[test]
fn zero_length_transfers_may_pass_null() {
    let ports = table();
    assert_eq!(ffi::gpio_init(&ports, 0, 100_000, 21, 22), ERROR_NONE);
    common::attach(0, VL53L0X, RegisterDevice::new());

    unsafe {
        assert_eq!(
            ffi::read_timeout_us(&ports, 0, VL53L0X, ptr::null_mut(), 0, false, 1_000),
            0
        );
        assert_eq!(
            ffi::write_timeout_us(&ports, 0, VL53L0X, ptr::null(), 0, false, 1_000),
            0
        );
    }
}

#[test]
fn poisoned_table_keeps_working() {
    let ports = table();
    assert_eq!(ffi::gpio_init(&ports, 0, 100_000, 21, 22), ERROR_NONE);

    let _ = std::panic::catch_unwind(|| {
        let _guard = ports.lock().unwrap();
        panic!("transfer panicked");
    });
    assert!(ports.is_poisoned());

    assert_eq!(ffi::gpio_init(&ports, 0, 100_000, 21, 22), ERROR_NONE);
}
