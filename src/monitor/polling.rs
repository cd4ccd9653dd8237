//! Periodic device polling
//!
//! Every tick probes each watched device in turn, logs the ones found in use
//! and, when alerts are enabled, hands one email per device to the notifier.
//! Results are not remembered between ticks, so a device that stays in use is
//! reported again on every tick.

use log::{debug, error, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::constants::ALERT_SUBJECT;
use crate::daemon::config::Configuration;
use crate::models::{DeviceStatus, Platform, TickReport, WatchedDevice};
use crate::monitor::probe::DeviceProbe;
use crate::notify::Notifier;

/// Poll loop state shared with the blocking pool on each tick
pub struct DeviceMonitor {
    config: Arc<Configuration>,
    devices: &'static [WatchedDevice],
    probe: Arc<dyn DeviceProbe>,
    notifier: Arc<dyn Notifier>,
    period: Duration,
}

impl DeviceMonitor {
    /// Monitor for the given platform's device table
    pub fn new(
        config: Arc<Configuration>,
        platform: Platform,
        probe: Arc<dyn DeviceProbe>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let period = config.polling_duration();
        Self {
            config,
            devices: platform.watched_devices(),
            probe,
            notifier,
            period,
        }
    }

    /// Override the tick period (tests use sub-second periods)
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Run one round of probing; blocks on the external commands
    pub fn check_devices(&self) -> TickReport {
        let mut report = TickReport::default();

        for watched in self.devices {
            let in_use = self.probe.probe(watched.identifier);

            if in_use {
                warn!("{} is in use ({})", watched.device, watched.identifier);
                if self.config.send_email {
                    self.notifier
                        .notify(ALERT_SUBJECT, watched.device.alert_body());
                    report.alerts_sent += 1;
                }
            } else {
                debug!("{} is idle ({})", watched.device, watched.identifier);
            }

            report.statuses.push(DeviceStatus {
                device: watched.device,
                identifier: watched.identifier.to_string(),
                in_use,
            });
        }

        report
    }

    /// Tick until `shutdown` flips to `true` or its sender is dropped
    ///
    /// The first tick fires one period after start. A tick that overruns the
    /// period causes the missed ticks to be skipped, never run back to back.
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let mut interval = interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let monitor = Arc::clone(&self);
                    if let Err(e) = tokio::task::spawn_blocking(move || monitor.check_devices()).await {
                        error!("Device check aborted: {}", e);
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Device;
    use std::sync::Mutex;

    struct StaticProbe {
        in_use: Vec<&'static str>,
    }

    impl DeviceProbe for StaticProbe {
        fn probe(&self, identifier: &str) -> bool {
            self.in_use.iter().any(|id| *id == identifier)
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<(String, String)>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, subject: &str, body: &str) {
            self.sent
                .lock()
                .unwrap()
                .push((subject.to_string(), body.to_string()));
        }
    }

    fn monitor(
        send_email: bool,
        in_use: Vec<&'static str>,
    ) -> (DeviceMonitor, Arc<RecordingNotifier>) {
        let config = Configuration {
            send_email,
            check_interval: 1,
            ..Configuration::default()
        };
        let notifier = Arc::new(RecordingNotifier::default());
        let monitor = DeviceMonitor::new(
            Arc::new(config),
            Platform::Unix,
            Arc::new(StaticProbe { in_use }),
            notifier.clone(),
        );
        (monitor, notifier)
    }

    #[test]
    fn test_period_from_configuration() {
        let (monitor, _) = monitor(false, vec![]);
        assert_eq!(monitor.period(), Duration::from_secs(1));

        let monitor = monitor.with_period(Duration::from_millis(50));
        assert_eq!(monitor.period(), Duration::from_millis(50));
    }

    #[test]
    fn test_idle_devices_send_nothing() {
        let (monitor, notifier) = monitor(true, vec![]);

        let report = monitor.check_devices();

        assert_eq!(report.statuses.len(), 2);
        assert!(report.devices_in_use().is_empty());
        assert_eq!(report.alerts_sent, 0);
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_alerts_disabled() {
        let (monitor, notifier) = monitor(false, vec!["AppleCamera", "CoreAudio"]);

        let report = monitor.check_devices();

        assert_eq!(
            report.devices_in_use(),
            vec![Device::Camera, Device::Microphone]
        );
        assert_eq!(report.alerts_sent, 0);
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_one_alert_per_device_in_use() {
        let (monitor, notifier) = monitor(true, vec!["AppleCamera", "CoreAudio"]);

        let report = monitor.check_devices();

        assert_eq!(report.alerts_sent, 2);
        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], (ALERT_SUBJECT.to_string(), "Camera is in use!".to_string()));
        assert_eq!(
            sent[1],
            (ALERT_SUBJECT.to_string(), "Microphone is in use!".to_string())
        );
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let (monitor, _) = monitor(false, vec![]);
        let monitor = Arc::new(monitor.with_period(Duration::from_millis(10)));
        let (tx, rx) = watch::channel(false);

        let task = tokio::spawn(monitor.run(rx));
        tokio::time::sleep(Duration::from_millis(30)).await;
        tx.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("loop did not stop")
            .unwrap();
    }

    #[tokio::test]
    async fn test_run_stops_when_sender_dropped() {
        let (monitor, _) = monitor(false, vec![]);
        let monitor = Arc::new(monitor.with_period(Duration::from_millis(10)));
        let (tx, rx) = watch::channel(false);

        let task = tokio::spawn(monitor.run(rx));
        drop(tx);

        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("loop did not stop")
            .unwrap();
    }
}
