//! Message types for actor communication
//!
//! Workers are driven through [`WorkerCommand`]s sent over an mpsc channel and
//! answer through oneshot channels. A [`ProcessingResult`] is produced exactly
//! once per dispatched subnet and never modified afterwards.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::oneshot;

use crate::{SubnetData, scoring::ScoreResult};

/// Outcome of processing a single subnet
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingResult {
    pub subnet_id: u32,

    /// Worker that produced this result
    pub worker_id: usize,

    /// Time spent from the start of processing until the result was ready
    #[serde(rename = "processing_time_secs", with = "crate::util::duration_secs")]
    pub processing_time: Duration,

    pub timestamp: DateTime<Utc>,

    #[serde(flatten)]
    pub outcome: ProcessingOutcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProcessingOutcome {
    Success {
        data: SubnetData,
        scores: ScoreResult,
    },
    Error {
        error: String,
    },
}

impl ProcessingResult {
    pub fn success(
        subnet_id: u32,
        worker_id: usize,
        processing_time: Duration,
        data: SubnetData,
        scores: ScoreResult,
    ) -> Self {
        Self {
            subnet_id,
            worker_id,
            processing_time,
            timestamp: Utc::now(),
            outcome: ProcessingOutcome::Success { data, scores },
        }
    }

    pub fn failure(
        subnet_id: u32,
        worker_id: usize,
        processing_time: Duration,
        error: impl Into<String>,
    ) -> Self {
        Self {
            subnet_id,
            worker_id,
            processing_time,
            timestamp: Utc::now(),
            outcome: ProcessingOutcome::Error {
                error: error.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ProcessingOutcome::Success { .. })
    }

    pub fn scores(&self) -> Option<&ScoreResult> {
        match &self.outcome {
            ProcessingOutcome::Success { scores, .. } => Some(scores),
            ProcessingOutcome::Error { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            ProcessingOutcome::Success { .. } => None,
            ProcessingOutcome::Error { error } => Some(error),
        }
    }
}

/// Commands that can be sent to a SubnetWorkerActor
#[derive(Debug)]
pub enum WorkerCommand {
    /// Score a single subnet
    ///
    /// The actor processes each subnet in its own task, so several `Process`
    /// commands may be in flight at once and complete in any order.
    Process {
        subnet_id: u32,
        respond_to: oneshot::Sender<ProcessingResult>,
    },

    /// Get the worker's statistics
    GetStats {
        respond_to: oneshot::Sender<WorkerStats>,
    },

    /// Shut down the worker
    ///
    /// Subnets still in flight are abandoned; their requesters receive an error result.
    Shutdown,
}

/// Worker statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkerStats {
    pub worker_id: usize,

    /// Subnets this worker scored successfully
    pub processed_count: usize,
}
