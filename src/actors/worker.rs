//! SubnetWorkerActor - Scores subnets on behalf of the coordinator
//!
//! ## Message Flow
//!
//! ```text
//! Process(subnet_id) → spawn task → fetch data → simulated delay → score → ProcessingResult
//!                                                                              │
//!                           coordinator ◄──────── oneshot ◄──────────────────────┘
//! ```
//!
//! Each subnet is processed in its own task inside a `JoinSet`, so a slow subnet
//! never holds up the others assigned to the same worker. Any failure, including
//! a panic while scoring, is turned into an error result.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use futures::FutureExt;
use futures::future::{self, BoxFuture};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, error, instrument, trace, warn};

use crate::{
    SubnetData,
    scoring::ScoreResult,
    source::SubnetSource,
    synthetic::simulated_delay,
};

use super::messages::{ProcessingResult, WorkerCommand, WorkerStats};

/// Actor owning one slot of the worker pool
pub struct SubnetWorkerActor {
    worker_id: usize,

    /// Where subnet attributes come from
    source: Arc<dyn SubnetSource>,

    /// Sleep for [`simulated_delay`] before scoring
    simulate_latency: bool,

    command_rx: mpsc::UnboundedReceiver<WorkerCommand>,

    /// Successfully scored subnets, shared only with this worker's own tasks
    processed_count: Arc<AtomicUsize>,

    in_flight: JoinSet<()>,
}

impl SubnetWorkerActor {
    pub fn new(
        worker_id: usize,
        source: Arc<dyn SubnetSource>,
        simulate_latency: bool,
        command_rx: mpsc::UnboundedReceiver<WorkerCommand>,
    ) -> Self {
        Self {
            worker_id,
            source,
            simulate_latency,
            command_rx,
            processed_count: Arc::new(AtomicUsize::new(0)),
            in_flight: JoinSet::new(),
        }
    }

    /// Run the actor's main loop
    ///
    /// Runs until a Shutdown command is received, or the command channel is
    /// closed and every in-flight subnet has finished.
    #[instrument(skip(self), fields(worker = self.worker_id))]
    pub async fn run(mut self) {
        debug!("starting worker actor");

        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    match cmd {
                        WorkerCommand::Process { subnet_id, respond_to } => {
                            trace!("received subnet {subnet_id}");
                            let task = process_subnet(
                                self.worker_id,
                                subnet_id,
                                self.source.clone(),
                                self.simulate_latency,
                                self.processed_count.clone(),
                            );
                            self.in_flight.spawn(async move {
                                let result = task.await;
                                // requester may have given up, that's fine
                                let _ = respond_to.send(result);
                            });
                        }

                        WorkerCommand::GetStats { respond_to } => {
                            let _ = respond_to.send(self.stats());
                        }

                        WorkerCommand::Shutdown => {
                            debug!("received shutdown command");
                            break;
                        }
                    }
                }

                Some(joined) = self.in_flight.join_next(), if !self.in_flight.is_empty() => {
                    if let Err(e) = joined {
                        error!("subnet task failed: {e}");
                    }
                }

                else => {
                    debug!("command channel closed and no subnets in flight");
                    break;
                }
            }
        }

        if !self.in_flight.is_empty() {
            warn!("abandoning {} subnets in flight", self.in_flight.len());
        }
        self.in_flight.shutdown().await;

        debug!(
            "worker actor stopped after {} subnets",
            self.processed_count.load(Ordering::Relaxed)
        );
    }

    fn stats(&self) -> WorkerStats {
        WorkerStats {
            worker_id: self.worker_id,
            processed_count: self.processed_count.load(Ordering::Relaxed),
        }
    }
}

/// Process a single subnet, converting every failure into an error result
#[instrument(skip(source, processed_count))]
async fn process_subnet(
    worker_id: usize,
    subnet_id: u32,
    source: Arc<dyn SubnetSource>,
    simulate_latency: bool,
    processed_count: Arc<AtomicUsize>,
) -> ProcessingResult {
    let started = Instant::now();

    let outcome = AssertUnwindSafe(score_subnet(subnet_id, source.as_ref(), simulate_latency))
        .catch_unwind()
        .await;

    let processing_time = started.elapsed();

    match outcome {
        Ok(Ok((data, scores))) => {
            processed_count.fetch_add(1, Ordering::Relaxed);
            trace!(
                "scored subnet {subnet_id}: {} ({})",
                scores.overall_score, scores.risk_level
            );
            ProcessingResult::success(subnet_id, worker_id, processing_time, data, scores)
        }
        Ok(Err(e)) => {
            warn!("failed to process subnet {subnet_id}: {e:#}");
            ProcessingResult::failure(subnet_id, worker_id, processing_time, format!("{e:#}"))
        }
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            error!("panic while processing subnet {subnet_id}: {message}");
            ProcessingResult::failure(subnet_id, worker_id, processing_time, message)
        }
    }
}

async fn score_subnet(
    subnet_id: u32,
    source: &dyn SubnetSource,
    simulate_latency: bool,
) -> Result<(SubnetData, ScoreResult)> {
    let data = source
        .fetch(subnet_id)
        .await
        .with_context(|| format!("failed to fetch data for subnet {subnet_id}"))?;

    if simulate_latency {
        tokio::time::sleep(simulated_delay(subnet_id)).await;
    }

    let scores = ScoreResult::calculate(&data);
    Ok((data, scores))
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("panic: {message}")
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("panic: {message}")
    } else {
        "panic: unknown cause".to_string()
    }
}

/// Handle for controlling a SubnetWorkerActor
///
/// Cheap to clone; every clone talks to the same actor.
#[derive(Clone)]
pub struct WorkerHandle {
    sender: mpsc::UnboundedSender<WorkerCommand>,

    pub worker_id: usize,
}

impl WorkerHandle {
    /// Spawn a new worker actor
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(worker_id: usize, source: Arc<dyn SubnetSource>, simulate_latency: bool) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        let actor = SubnetWorkerActor::new(worker_id, source, simulate_latency, cmd_rx);

        tokio::spawn(actor.run());

        Self {
            sender: cmd_tx,
            worker_id,
        }
    }

    /// Dispatch a subnet to this worker
    ///
    /// The subnet is handed to the actor immediately; the returned future only
    /// waits for the result. It always resolves: if the worker is gone, it
    /// resolves to an error result.
    pub fn submit(&self, subnet_id: u32) -> BoxFuture<'static, ProcessingResult> {
        let worker_id = self.worker_id;
        let (tx, rx) = oneshot::channel();

        if self
            .sender
            .send(WorkerCommand::Process {
                subnet_id,
                respond_to: tx,
            })
            .is_err()
        {
            return future::ready(ProcessingResult::failure(
                subnet_id,
                worker_id,
                Duration::ZERO,
                format!("worker {worker_id} is not running"),
            ))
            .boxed();
        }

        let dispatched_at = Instant::now();

        async move {
            rx.await.unwrap_or_else(|_| {
                ProcessingResult::failure(
                    subnet_id,
                    worker_id,
                    dispatched_at.elapsed(),
                    format!("worker {worker_id} dropped subnet {subnet_id}"),
                )
            })
        }
        .boxed()
    }

    /// Get the worker's statistics
    pub async fn stats(&self) -> Result<WorkerStats> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(WorkerCommand::GetStats { respond_to: tx })
            .context("failed to send GetStats command")?;

        rx.await.context("failed to receive worker stats")
    }

    /// Shut down the worker
    pub fn shutdown(&self) -> Result<()> {
        self.sender
            .send(WorkerCommand::Shutdown)
            .context("failed to send Shutdown command")?;
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        !self.sender.is_closed()
    }
}
