//! devguard - camera and microphone usage monitor
//!
//! This library exposes the probes, notifier, poll loop and daemon
//! lifecycle used by the `devguard` binary.

pub mod cli;
pub mod constants;
pub mod daemon;
pub mod models;
pub mod monitor;
pub mod notify;
