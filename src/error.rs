//! Error types for the distributed monitor

use std::fmt;

/// Result type alias for monitor operations
pub type MonitorResult<T> = Result<T, MonitorError>;

/// Errors that abort a monitoring run
///
/// Failures of individual subnets are not errors at this level; they are
/// recorded as error results and counted in the run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorError {
    /// The worker pool could not be provisioned
    InitializationFailed(String),

    /// The run was requested with invalid parameters
    InvalidConfig(String),

    /// A worker actor is no longer running
    WorkerUnavailable(usize),
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorError::InitializationFailed(msg) => {
                write!(f, "failed to initialize distributed monitor: {}", msg)
            }
            MonitorError::InvalidConfig(msg) => write!(f, "invalid monitor configuration: {}", msg),
            MonitorError::WorkerUnavailable(worker_id) => {
                write!(f, "worker {} is not running", worker_id)
            }
        }
    }
}

impl std::error::Error for MonitorError {}
