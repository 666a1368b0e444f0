//! Simulation-level error definitions.
//!
//! Recoverable errors only: configuration and workload loading problems that
//! the caller can report and exit on. Failures inside the instruction queue
//! itself are invariant violations, not recoverable errors; those panic
//! (capacity violations, unknown sequence numbers, FU pool misuse).

use std::fmt;
use std::io;

/// Errors surfaced while setting up or loading a simulation.
#[derive(Debug)]
pub enum SimError {
    /// Underlying I/O failure while reading a workload or config file.
    Io(io::Error),
    /// The file was read but could not be parsed.
    Parse(String),
    /// The workload parsed but refers to resources outside the configured
    /// machine (bad thread id, physical register out of range, ...).
    Workload(String),
    /// The configuration is internally inconsistent.
    Config(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Io(e) => write!(f, "i/o error: {}", e),
            SimError::Parse(msg) => write!(f, "parse error: {}", msg),
            SimError::Workload(msg) => write!(f, "invalid workload: {}", msg),
            SimError::Config(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SimError {
    fn from(e: io::Error) -> Self {
        SimError::Io(e)
    }
}

impl From<serde_json::Error> for SimError {
    fn from(e: serde_json::Error) -> Self {
        SimError::Parse(e.to_string())
    }
}
