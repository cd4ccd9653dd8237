//! Global constants for devguard
//!
//! Centralized location for application-wide constants

use crate::models::{Device, WatchedDevice};

/// Configuration file used when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Append-only log file, created in the working directory
pub const LOG_FILE_NAME: &str = "device_usage.log";

/// Subject line of every alert email
pub const ALERT_SUBJECT: &str = "unauthorized access detected";

/// Devices watched on macOS/Linux, matched against `lsof` output
pub const UNIX_WATCHED_DEVICES: &[WatchedDevice] = &[
    WatchedDevice::new(Device::Camera, "AppleCamera"),
    WatchedDevice::new(Device::Microphone, "CoreAudio"),
];

/// Devices watched on Windows, matched against `Get-Process` output
pub const WINDOWS_WATCHED_DEVICES: &[WatchedDevice] = &[
    WatchedDevice::new(Device::Camera, "camera"),
    WatchedDevice::new(Device::Microphone, "microphone"),
];
