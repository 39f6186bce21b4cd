//! DistributedMonitor - Coordinates scoring of all subnets across the worker pool
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized ──initialize()──► Initialized ──monitor_all_subnets()──► Running ──► Completed
//!       │                                                                   ▲           │
//!       └──(pool cannot be provisioned)──► InitializationFailed             └───────────┘
//! ```
//!
//! A run partitions `1..=N` into one contiguous batch per worker, hands every
//! subnet to its worker immediately and then collects results in groups of at
//! most `collect_batch_size`, waiting no longer than `collect_timeout` per group.
//! A slow subnet therefore never blocks the collection of finished ones.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, join_all};
use futures::stream::{FuturesUnordered, Stream, StreamExt};
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, trace, warn};

use crate::{
    actors::{
        messages::{ProcessingResult, WorkerStats},
        worker::WorkerHandle,
    },
    config::MonitorConfig,
    distribution::{assign_batches, distribute_subnets},
    error::{MonitorError, MonitorResult},
    metrics::{PerformanceReport, throughput},
    source::{MockSubnetSource, SubnetSource},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Uninitialized,
    Initialized,
    Running,
    Completed,
    /// Terminal: the worker pool could not be provisioned
    InitializationFailed,
}

/// Result of one monitoring run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Number of subnets requested
    pub total_subnets: u32,
    pub successful: usize,
    pub failed: usize,

    #[serde(rename = "total_time_secs", with = "crate::util::duration_secs")]
    pub total_time: Duration,

    pub subnets_per_second: f64,

    /// Whether synthetic data was requested
    pub mock: bool,

    pub performance: PerformanceReport,

    /// Every result, in collection order
    pub results: Vec<ProcessingResult>,

    pub timestamp: DateTime<Utc>,
}

impl RunSummary {
    pub fn new(
        total_subnets: u32,
        mock: bool,
        results: Vec<ProcessingResult>,
        total_time: Duration,
    ) -> Self {
        let successful = results.iter().filter(|r| r.is_success()).count();

        Self {
            total_subnets,
            successful,
            failed: results.len() - successful,
            total_time,
            subnets_per_second: throughput(successful, total_time),
            mock,
            performance: PerformanceReport::calculate(&results, total_time),
            results,
            timestamp: Utc::now(),
        }
    }

    pub fn successful_results(&self) -> impl Iterator<Item = &ProcessingResult> {
        self.results.iter().filter(|r| r.is_success())
    }

    pub fn failed_results(&self) -> impl Iterator<Item = &ProcessingResult> {
        self.results.iter().filter(|r| !r.is_success())
    }
}

pub struct DistributedMonitor {
    config: MonitorConfig,

    source: Arc<dyn SubnetSource>,

    workers: Vec<WorkerHandle>,

    state: MonitorState,
}

impl DistributedMonitor {
    /// Create a monitor backed by synthetic subnet data
    pub fn new(config: MonitorConfig) -> Self {
        Self::with_source(config, Arc::new(MockSubnetSource))
    }

    pub fn with_source(config: MonitorConfig, source: Arc<dyn SubnetSource>) -> Self {
        Self {
            config,
            source,
            workers: Vec::new(),
            state: MonitorState::Uninitialized,
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Provision the worker pool
    ///
    /// Does nothing if the pool is already up. Once initialization has failed,
    /// every further attempt fails as well.
    pub fn initialize(&mut self) -> MonitorResult<()> {
        match self.state {
            MonitorState::Uninitialized => {}
            MonitorState::InitializationFailed => {
                return Err(MonitorError::InitializationFailed(
                    "a previous initialization attempt failed".to_string(),
                ));
            }
            _ => return Ok(()),
        }

        if let Err(e) = self.provision_workers() {
            error!("{e}");
            self.state = MonitorState::InitializationFailed;
            return Err(e);
        }

        self.state = MonitorState::Initialized;
        info!("distributed monitor initialized with {} workers", self.workers.len());
        Ok(())
    }

    fn provision_workers(&mut self) -> MonitorResult<()> {
        if self.config.workers == 0 {
            return Err(MonitorError::InitializationFailed(
                "the worker pool needs at least one worker".to_string(),
            ));
        }

        tokio::runtime::Handle::try_current().map_err(|e| {
            MonitorError::InitializationFailed(format!("no async runtime available: {e}"))
        })?;

        debug!("creating {} subnet workers", self.config.workers);
        self.workers = (0..self.config.workers)
            .map(|worker_id| {
                WorkerHandle::spawn(
                    worker_id,
                    self.source.clone(),
                    self.config.simulate_latency,
                )
            })
            .collect();

        Ok(())
    }

    /// Score subnets `1..=subnet_count` across the worker pool
    ///
    /// Initializes the pool if necessary. Individual subnet failures do not fail
    /// the run; they are counted in the summary.
    #[instrument(skip(self))]
    pub async fn monitor_all_subnets(
        &mut self,
        subnet_count: u32,
        mock: bool,
    ) -> MonitorResult<RunSummary> {
        if subnet_count == 0 {
            return Err(MonitorError::InvalidConfig(
                "at least one subnet must be monitored".to_string(),
            ));
        }

        self.initialize()?;

        if !mock && !self.source.is_live() {
            warn!("no live data source configured, using synthetic subnet data");
        }

        self.state = MonitorState::Running;
        let started = Instant::now();
        info!("starting distributed monitoring of {subnet_count} subnets");

        let mut pending = self.dispatch(subnet_count);
        let dispatched = pending.len();

        let group_size = self.config.collect_batch_size.max(1);
        let group_timeout = self.config.collect_timeout().max(Duration::from_millis(1));
        let progress_interval = self.config.progress_interval;

        let mut results = Vec::with_capacity(dispatched);

        while !pending.is_empty() {
            let ready = collect_ready(&mut pending, group_size, group_timeout).await;

            if ready.is_empty() {
                trace!("no results ready within {group_timeout:?}");
                continue;
            }

            for result in ready {
                if let Some(error) = result.error() {
                    debug!("subnet {} failed: {error}", result.subnet_id);
                }
                results.push(result);

                let completed = results.len();
                if progress_interval > 0 && completed % progress_interval == 0 {
                    info!(
                        "progress: {completed}/{dispatched} ({:.1}%) - {:.1}s elapsed",
                        completed as f64 / dispatched as f64 * 100.0,
                        started.elapsed().as_secs_f64()
                    );
                }
            }
        }

        let summary = RunSummary::new(subnet_count, mock, results, started.elapsed());

        info!(
            "processed {}/{} subnets in {:.2} seconds ({:.1} subnets/second)",
            summary.successful,
            subnet_count,
            summary.total_time.as_secs_f64(),
            summary.subnets_per_second
        );

        self.state = MonitorState::Completed;
        Ok(summary)
    }

    /// Hand every subnet to its worker
    fn dispatch(
        &self,
        subnet_count: u32,
    ) -> FuturesUnordered<BoxFuture<'static, ProcessingResult>> {
        let pool_size = self.workers.len();
        let batches = distribute_subnets(subnet_count, pool_size);

        let pending = FuturesUnordered::new();
        for (worker_index, batch) in assign_batches(batches, pool_size) {
            let worker = &self.workers[worker_index];
            debug!("dispatching subnets {batch:?} to worker {}", worker.worker_id);

            for subnet_id in batch {
                pending.push(worker.submit(subnet_id));
            }
        }

        pending
    }

    /// Query every worker for its statistics
    pub async fn worker_stats(&self) -> MonitorResult<Vec<WorkerStats>> {
        let stats = join_all(self.workers.iter().map(|worker| async move {
            worker
                .stats()
                .await
                .map_err(|_| MonitorError::WorkerUnavailable(worker.worker_id))
        }))
        .await;

        stats.into_iter().collect()
    }

    /// Stop the worker pool
    ///
    /// Safe to call at any time, including before initialization.
    pub fn shutdown(&mut self) {
        for worker in self.workers.drain(..) {
            if let Err(e) = worker.shutdown() {
                trace!("worker {} already stopped: {e:#}", worker.worker_id);
            }
        }

        if self.state != MonitorState::InitializationFailed {
            self.state = MonitorState::Uninitialized;
        }
        info!("distributed monitor shutdown complete");
    }
}

/// Wait for up to `max` items, giving up once `timeout` has passed
///
/// Returns whatever was ready by then, which may be nothing.
pub async fn collect_ready<S>(pending: &mut S, max: usize, timeout: Duration) -> Vec<S::Item>
where
    S: Stream + Unpin,
{
    let deadline = Instant::now() + timeout;
    let mut ready = Vec::new();

    while ready.len() < max {
        match tokio::time::timeout_at(deadline, pending.next()).await {
            Ok(Some(item)) => ready.push(item),
            Ok(None) | Err(_) => break,
        }
    }

    ready
}

/// Score `subnet_count` subnets on a fresh pool of `worker_count` workers
pub async fn run(subnet_count: u32, worker_count: usize, mock: bool) -> MonitorResult<RunSummary> {
    let config = MonitorConfig {
        subnet_count,
        workers: worker_count,
        mock,
        ..MonitorConfig::default()
    };
    run_with_config(config).await
}

/// Run a complete monitoring pass as described by `config`
pub async fn run_with_config(config: MonitorConfig) -> MonitorResult<RunSummary> {
    let mut monitor = DistributedMonitor::new(config);
    let (subnet_count, mock) = (monitor.config().subnet_count, monitor.config().mock);

    let summary = monitor.monitor_all_subnets(subnet_count, mock).await;
    monitor.shutdown();

    summary
}
