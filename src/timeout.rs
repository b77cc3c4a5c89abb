//! Transfer timeouts.
//!
//! The PicoRuby contract hands timeouts over in microseconds, while the ESP-IDF
//! master driver takes `xfer_timeout_ms` as a C `int` of milliseconds, with
//! `-1` meaning "wait forever".
//!
//! ```
//! use picoruby_i2c_esp_idf::timeout::TransferTimeout;
//!
//! // Rounded up to whole milliseconds, never below the floor.
//! assert_eq!(TransferTimeout::from_micros(25_001).as_millis(), 26);
//! assert_eq!(TransferTimeout::from_micros(500).as_millis(), 10);
//! ```

use core::time::Duration;

use crate::units::*;

/// Shortest timeout handed to the driver. Anything below a couple of FreeRTOS
/// ticks makes every transfer time out before the first byte is clocked.
pub const MIN_TIMEOUT_MS: u32 = 10;

/// Sentinel value used as "maximum blocking" marker by the driver.
pub const BLOCK: TransferTimeout = TransferTimeout(-1);

/// Transparent wrapper around the driver's millisecond timeout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct TransferTimeout(i32);

impl TransferTimeout {
    /// Converts a contract timeout: round up to whole milliseconds, then
    /// apply [`MIN_TIMEOUT_MS`].
    pub const fn from_micros(us: u32) -> Self {
        Self::from_millis(MicroSeconds(us).ceil_millis().0)
    }

    pub const fn from_millis(ms: u32) -> Self {
        let ms = if ms < MIN_TIMEOUT_MS {
            MIN_TIMEOUT_MS
        } else {
            ms
        };

        if ms > i32::MAX as u32 {
            Self(i32::MAX)
        } else {
            Self(ms as i32)
        }
    }

    pub const fn is_blocking(&self) -> bool {
        self.0 < 0
    }

    /// Milliseconds as passed to the driver.
    pub const fn as_millis(&self) -> i32 {
        self.0
    }
}

impl Default for TransferTimeout {
    fn default() -> Self {
        Self::from_millis(MIN_TIMEOUT_MS)
    }
}

impl From<MicroSeconds> for TransferTimeout {
    fn from(us: MicroSeconds) -> Self {
        Self::from_micros(us.0)
    }
}

impl From<MilliSeconds> for TransferTimeout {
    fn from(ms: MilliSeconds) -> Self {
        Self::from_millis(ms.0)
    }
}

impl From<Duration> for TransferTimeout {
    fn from(duration: Duration) -> Self {
        let mut ms = duration.as_millis();
        if duration.subsec_nanos() % 1_000_000 != 0 {
            ms += 1;
        }

        Self::from_millis(u32::try_from(ms).unwrap_or(u32::MAX))
    }
}

impl From<Option<Duration>> for TransferTimeout {
    fn from(duration: Option<Duration>) -> Self {
        duration.map_or(BLOCK, Self::from)
    }
}

impl From<TransferTimeout> for Option<Duration> {
    fn from(timeout: TransferTimeout) -> Self {
        if timeout.is_blocking() {
            None
        } else {
            Some(Duration::from_millis(timeout.0 as u64))
        }
    }
}
