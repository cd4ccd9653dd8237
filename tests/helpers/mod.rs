#![allow(dead_code)]

use devguard::daemon::config::{Configuration, EmailSettings};
use devguard::monitor::DeviceProbe;
use devguard::notify::Notifier;
use log::{LevelFilter, Log, Metadata, Record};
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

/// Probe double with scripted answers per identifier
#[derive(Default)]
pub struct FakeProbe {
    /// `Some(n)`: report in use for the next `n` calls; `None`: always in use
    answers: Mutex<HashMap<String, Option<usize>>>,
    calls: Mutex<Vec<(String, Instant)>>,
}

impl FakeProbe {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn in_use_once(identifier: &str) -> Self {
        let probe = Self::default();
        probe
            .answers
            .lock()
            .unwrap()
            .insert(identifier.to_string(), Some(1));
        probe
    }

    pub fn always_in_use(identifier: &str) -> Self {
        let probe = Self::default();
        probe
            .answers
            .lock()
            .unwrap()
            .insert(identifier.to_string(), None);
        probe
    }

    pub fn calls(&self) -> Vec<(String, Instant)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl DeviceProbe for FakeProbe {
    fn probe(&self, identifier: &str) -> bool {
        self.calls
            .lock()
            .unwrap()
            .push((identifier.to_string(), Instant::now()));

        let mut answers = self.answers.lock().unwrap();
        match answers.get_mut(identifier) {
            Some(None) => true,
            Some(Some(remaining)) if *remaining > 0 => {
                *remaining -= 1;
                true
            }
            _ => false,
        }
    }
}

/// Notifier double recording every (subject, body) pair
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, subject: &str, body: &str) {
        self.sent
            .lock()
            .unwrap()
            .push((subject.to_string(), body.to_string()));
    }
}

/// `log` backend keeping formatted records in memory
#[derive(Default)]
pub struct CaptureLogger {
    lines: Mutex<Vec<String>>,
}

impl CaptureLogger {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn count_containing(&self, needle: &str) -> usize {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|line| line.contains(needle))
            .count()
    }
}

impl Log for CaptureLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= LevelFilter::Info
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.lines
                .lock()
                .unwrap()
                .push(format!("[{}] {}", record.level(), record.args()));
        }
    }

    fn flush(&self) {}
}

static CAPTURE: OnceLock<&'static CaptureLogger> = OnceLock::new();

/// Install the capture logger once per test binary
pub fn capture_logs() -> &'static CaptureLogger {
    CAPTURE.get_or_init(|| {
        let logger: &'static CaptureLogger = Box::leak(Box::new(CaptureLogger::default()));
        log::set_logger(logger).expect("another logger is already installed");
        log::set_max_level(LevelFilter::Info);
        logger
    })
}

pub fn config(send_email: bool, check_interval: u64) -> Configuration {
    Configuration {
        send_email,
        check_interval,
        email_config: EmailSettings {
            from: "watcher@example.com".to_string(),
            password: "secret".to_string(),
            to: "owner@example.com".to_string(),
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: "587".to_string(),
        },
    }
}
