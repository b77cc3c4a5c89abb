//! ESP-IDF error codes and their typed counterpart.

use core::fmt;

/// Raw `esp_err_t` as returned by ESP-IDF driver calls.
#[allow(non_camel_case_types)]
pub type esp_err_t = i32;

/// `esp_err_t` values from `esp_err.h` that the I2C master driver can return.
pub mod code {
    use super::esp_err_t;

    pub const ESP_OK: esp_err_t = 0;
    pub const ESP_FAIL: esp_err_t = -1;
    pub const ESP_ERR_NO_MEM: esp_err_t = 0x101;
    pub const ESP_ERR_INVALID_ARG: esp_err_t = 0x102;
    pub const ESP_ERR_INVALID_STATE: esp_err_t = 0x103;
    pub const ESP_ERR_INVALID_SIZE: esp_err_t = 0x104;
    pub const ESP_ERR_NOT_FOUND: esp_err_t = 0x105;
    pub const ESP_ERR_NOT_SUPPORTED: esp_err_t = 0x106;
    pub const ESP_ERR_TIMEOUT: esp_err_t = 0x107;
    pub const ESP_ERR_INVALID_RESPONSE: esp_err_t = 0x108;
}

pub struct EspError(pub esp_err_t);

impl EspError {
    pub fn into_result(self) -> Result<()> {
        Result::from(self)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// Generic failure, also what the driver reports for a NACK
    Fail,
    /// Out of memory
    NoMem,
    /// Invalid argument
    InvalidArg,
    /// Invalid state
    InvalidState,
    /// Invalid size
    InvalidSize,
    /// Requested resource not found
    NotFound,
    /// Operation or feature not supported
    NotSupported,
    /// Operation timed out
    Timeout,
    /// Received response was invalid
    InvalidResponse,

    Other(esp_err_t),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

impl Error {
    pub fn code(&self) -> esp_err_t {
        use code::*;

        match self {
            Error::Fail => ESP_FAIL,
            Error::NoMem => ESP_ERR_NO_MEM,
            Error::InvalidArg => ESP_ERR_INVALID_ARG,
            Error::InvalidState => ESP_ERR_INVALID_STATE,
            Error::InvalidSize => ESP_ERR_INVALID_SIZE,
            Error::NotFound => ESP_ERR_NOT_FOUND,
            Error::NotSupported => ESP_ERR_NOT_SUPPORTED,
            Error::Timeout => ESP_ERR_TIMEOUT,
            Error::InvalidResponse => ESP_ERR_INVALID_RESPONSE,
            Error::Other(code) => *code,
        }
    }

    /// Name of the code, as `esp_err_to_name` would print it.
    pub fn name(&self) -> &'static str {
        match self {
            Error::Fail => "ESP_FAIL",
            Error::NoMem => "ESP_ERR_NO_MEM",
            Error::InvalidArg => "ESP_ERR_INVALID_ARG",
            Error::InvalidState => "ESP_ERR_INVALID_STATE",
            Error::InvalidSize => "ESP_ERR_INVALID_SIZE",
            Error::NotFound => "ESP_ERR_NOT_FOUND",
            Error::NotSupported => "ESP_ERR_NOT_SUPPORTED",
            Error::Timeout => "ESP_ERR_TIMEOUT",
            Error::InvalidResponse => "ESP_ERR_INVALID_RESPONSE",
            Error::Other(_) => "UNKNOWN ERROR",
        }
    }
}

impl From<EspError> for Result<()> {
    fn from(value: EspError) -> Self {
        use code::*;
        use Error::*;

        Err(match value.0 {
            ESP_OK => return Ok(()),
            ESP_FAIL => Fail,
            ESP_ERR_NO_MEM => NoMem,
            ESP_ERR_INVALID_ARG => InvalidArg,
            ESP_ERR_INVALID_STATE => InvalidState,
            ESP_ERR_INVALID_SIZE => InvalidSize,
            ESP_ERR_NOT_FOUND => NotFound,
            ESP_ERR_NOT_SUPPORTED => NotSupported,
            ESP_ERR_TIMEOUT => Timeout,
            ESP_ERR_INVALID_RESPONSE => InvalidResponse,
            other => Other(other),
        })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Other(code) => write!(f, "ESP-IDF error {code:#x}"),
            known => write!(f, "{} ({:#x})", known.name(), known.code()),
        }
    }
}

impl std::error::Error for Error {}

/// Converts an `esp_err_t` expression into a [`Result`].
#[macro_export]
macro_rules! esp {
    ($err:expr) => {{
        $crate::errors::EspError($err as $crate::errors::esp_err_t).into_result()
    }};
}
