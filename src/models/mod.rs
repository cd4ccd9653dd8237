//! Data models module
//!
//! Defines core data structures:
//! - Device: the logical resources being watched
//! - Platform: host family that decides how devices are probed
//! - WatchedDevice: a device paired with its platform-specific identifier
//! - DeviceStatus / TickReport: the outcome of one polling round

use serde::Serialize;
use std::fmt;

use crate::constants::{UNIX_WATCHED_DEVICES, WINDOWS_WATCHED_DEVICES};

/// Logical device being watched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Camera,
    Microphone,
}

impl Device {
    /// Lowercase name used in log lines
    pub fn name(&self) -> &'static str {
        match self {
            Device::Camera => "camera",
            Device::Microphone => "microphone",
        }
    }

    /// Body of the alert email sent when this device is found in use
    pub fn alert_body(&self) -> &'static str {
        match self {
            Device::Camera => "Camera is in use!",
            Device::Microphone => "Microphone is in use!",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Host platform family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Unix,
    Windows,
}

impl Platform {
    /// Platform the binary was built for
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }

    /// Static table of devices watched on this platform
    pub fn watched_devices(&self) -> &'static [WatchedDevice] {
        match self {
            Platform::Unix => UNIX_WATCHED_DEVICES,
            Platform::Windows => WINDOWS_WATCHED_DEVICES,
        }
    }
}

/// A device together with the substring that reveals it in probe output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchedDevice {
    pub device: Device,
    /// Platform-specific process/resource substring
    pub identifier: &'static str,
}

impl WatchedDevice {
    pub const fn new(device: Device, identifier: &'static str) -> Self {
        Self { device, identifier }
    }
}

/// Probe outcome for one device during one tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceStatus {
    pub device: Device,
    pub identifier: String,
    pub in_use: bool,
}

/// Outcome of one polling round; never persisted or compared across ticks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    pub statuses: Vec<DeviceStatus>,
    /// Number of alerts handed to the notifier during this tick
    pub alerts_sent: usize,
}

impl TickReport {
    /// Devices found in use this tick, in probe order
    pub fn devices_in_use(&self) -> Vec<Device> {
        self.statuses
            .iter()
            .filter(|status| status.in_use)
            .map(|status| status.device)
            .collect()
    }
}
