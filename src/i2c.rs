pub mod config;
pub mod driver;
#[cfg(target_os = "espidf")]
pub mod esp;
pub mod port;

pub use config::{BusPins, Config, DeviceConfig};
pub use driver::{MasterBus, MasterDevice};
pub use port::{unit_name_to_unit_num, I2cPorts, Port, PortError, PORT_COUNT};
