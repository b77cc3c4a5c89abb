//! Units of measurement for bus frequencies and transfer timeouts.
//!
//! # Usage
//!
//! ```
//! use picoruby_i2c_esp_idf::units::*;
//!
//! let fast_mode: Hertz = 400.kHz().into();
//! assert_eq!(fast_mode, Hertz(400_000));
//!
//! let timeout: MicroSeconds = 25.ms().into();
//! assert_eq!(timeout, MicroSeconds(25_000));
//! ```

use core::fmt;

pub type ValueType = u32;

pub trait Quantity: Sized {}
pub trait Time: Quantity + Into<MicroSeconds> {}
pub trait Frequency: Quantity + Into<Hertz> {}

/// defines and implements extension traits for quantities with units
macro_rules! define {
    ($( ($type: ident, $quantity: ident, $unit: ident, $print_unit: literal), )+) => {
        $(
            #[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Default)]
            pub struct $quantity(pub ValueType);

            impl Quantity for $quantity {}
            impl $type for $quantity {}

            impl From<$quantity> for ValueType {
                fn from(x: $quantity) -> Self {
                    x.0
                }
            }

            impl From<ValueType> for $quantity {
                fn from(x: ValueType) -> $quantity {
                    $quantity(x)
                }
            }

            impl fmt::Debug for $quantity {
                fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    write!(f, "{}{}", self.0, $print_unit)
                }
            }

            impl fmt::Display for $quantity {
                fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    write!(f, "{}{}", self.0, $print_unit)
                }
            }
        )*

        pub trait FromValueType {
            $(
                #[allow(non_snake_case)]
                fn $unit(self) -> $quantity;
            )*
        }

        impl FromValueType for ValueType {
            $(
                fn $unit(self) -> $quantity {
                    $quantity(self)
                }
            )*
        }
    };
}

/// Lossless widening into the base unit of a quantity family. Saturates
/// instead of wrapping.
macro_rules! convert {
    ($( ($from: ident, $into: ident, $factor: expr) ),+ $(,)?) => {
        $(
            impl From<$from> for $into {
                fn from(x: $from) -> Self {
                    Self(x.0.saturating_mul($factor))
                }
            }
        )*
    };
}

define!(
    (Frequency, Hertz, Hz, "Hz"),
    (Frequency, KiloHertz, kHz, "kHz"),
    (Frequency, MegaHertz, MHz, "MHz"),
    (Time, MicroSeconds, us, "us"),
    (Time, MilliSeconds, ms, "ms"),
);

convert!(
    (KiloHertz, Hertz, 1_000),
    (MegaHertz, Hertz, 1_000_000),
    (MegaHertz, KiloHertz, 1_000),
    (MilliSeconds, MicroSeconds, 1_000),
);

impl Hertz {
    pub const fn zero() -> Self {
        Self(0)
    }
}

impl MicroSeconds {
    /// Whole milliseconds, rounding any fraction up.
    pub const fn ceil_millis(self) -> MilliSeconds {
        MilliSeconds(self.0.div_ceil(1_000))
    }
}

impl From<MicroSeconds> for core::time::Duration {
    fn from(x: MicroSeconds) -> Self {
        core::time::Duration::from_micros(x.0 as u64)
    }
}

impl From<MilliSeconds> for core::time::Duration {
    fn from(x: MilliSeconds) -> Self {
        core::time::Duration::from_millis(x.0 as u64)
    }
}
