pub mod polling;
pub mod probe;

pub use polling::DeviceMonitor;
pub use probe::{CommandProbe, DeviceProbe, ProbeError};
