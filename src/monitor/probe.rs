//! Platform probes that decide whether a device is in use
//!
//! Each probe runs one external inspection command and searches its raw
//! output for the device identifier. Matching is a plain case-sensitive
//! substring test, so similarly named processes can produce false positives.

use log::error;
use std::process::Command;
use thiserror::Error;

use crate::models::Platform;

/// Failure to obtain probe output
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    ExitStatus {
        program: String,
        status: std::process::ExitStatus,
    },
}

/// Capability to check whether a device identifier is currently in use
pub trait DeviceProbe: Send + Sync {
    /// Returns `false` when the device is idle or the check itself failed
    fn probe(&self, identifier: &str) -> bool;
}

type ArgBuilder = Box<dyn Fn(&str) -> Vec<String> + Send + Sync>;

/// Probe backed by an external command whose stdout is searched
pub struct CommandProbe {
    program: String,
    args: ArgBuilder,
}

impl CommandProbe {
    /// `lsof` with no filtering; the whole open-file table is searched
    pub fn lsof() -> Self {
        Self {
            program: "lsof".to_string(),
            args: Box::new(|_: &str| Vec::new()),
        }
    }

    /// PowerShell process listing filtered by the identifier
    pub fn powershell() -> Self {
        Self {
            program: "powershell".to_string(),
            args: Box::new(|identifier: &str| {
                vec![
                    "-Command".to_string(),
                    format!("Get-Process | Select-String -Pattern {}", identifier),
                ]
            }),
        }
    }

    /// Arbitrary command with fixed arguments
    pub fn custom(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args: Box::new(move |_: &str| args.clone()),
        }
    }

    /// Probe matching the given platform
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Unix => Self::lsof(),
            Platform::Windows => Self::powershell(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed to the program when probing `identifier`
    pub fn args_for(&self, identifier: &str) -> Vec<String> {
        (self.args)(identifier)
    }

    /// Run the command once and report whether its output mentions `identifier`
    pub fn run(&self, identifier: &str) -> Result<bool, ProbeError> {
        let output = Command::new(&self.program)
            .args(self.args_for(identifier))
            .output()
            .map_err(|source| ProbeError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ProbeError::ExitStatus {
                program: self.program.clone(),
                status: output.status,
            });
        }

        Ok(output_mentions(&output.stdout, identifier))
    }
}

impl DeviceProbe for CommandProbe {
    fn probe(&self, identifier: &str) -> bool {
        match self.run(identifier) {
            Ok(in_use) => in_use,
            Err(e) => {
                error!("Error running probe for {}: {}", identifier, e);
                false
            }
        }
    }
}

/// Case-sensitive substring search over raw command output
///
/// An empty identifier matches any output, as `str::contains` does.
pub fn output_mentions(output: &[u8], identifier: &str) -> bool {
    String::from_utf8_lossy(output).contains(identifier)
}
