//! Daemon module: process lifecycle for the device monitor
//!
//! This module wires the pieces together for a foreground daemon run:
//! - Log sink setup (append-only file for the whole process lifetime)
//! - Configuration loading, fatal on any error
//! - Launching the poll loop as the single long-lived background task

pub mod config;
pub mod logging;

use anyhow::{Context, Result};
use log::error;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::watch;

use crate::daemon::config::Configuration;
use crate::models::Platform;
use crate::monitor::{CommandProbe, DeviceMonitor};
use crate::notify::SmtpNotifier;

/// Startup options collected from the command line
#[derive(Debug, Clone)]
pub struct DaemonOptions {
    pub config_path: PathBuf,
    pub log_path: PathBuf,
}

/// Run the monitor until the poll loop ends or Ctrl-C is received
pub async fn run_daemon(options: DaemonOptions) -> Result<()> {
    logging::init_file_logger(&options.log_path)?;

    let config = match Configuration::load_from_file(&options.config_path) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            log::logger().flush();
            return Err(e).context("Failed to load configuration");
        }
    };

    println!("Starting device monitor...");
    logging::log_startup(
        &options.config_path,
        std::process::id(),
        config.check_interval,
        config.send_email,
    );

    // Platform is fixed for the process lifetime
    let platform = Platform::current();
    let monitor = Arc::new(DeviceMonitor::new(
        config.clone(),
        platform,
        Arc::new(CommandProbe::for_platform(platform)),
        Arc::new(SmtpNotifier::new(config.email_config.clone())),
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut monitoring_task = tokio::spawn(monitor.run(shutdown_rx));

    tokio::select! {
        signal = signal::ctrl_c() => {
            match signal {
                Ok(()) => {
                    logging::log_shutdown("Received shutdown signal");
                    let _ = shutdown_tx.send(true);
                }
                // Without a signal handler the loop simply runs until killed
                Err(e) => error!("Failed to listen for shutdown signal: {}", e),
            }
            if let Err(e) = (&mut monitoring_task).await {
                error!("Monitoring loop failed: {}", e);
            }
        }
        result = &mut monitoring_task => {
            match result {
                Ok(()) => logging::log_shutdown("Monitoring loop ended"),
                Err(e) => error!("Monitoring loop failed: {}", e),
            }
        }
    }

    log::logger().flush();
    Ok(())
}
