//! Concurrency tests
//!
//! These tests run on Tokio's paused clock, so simulated delays advance
//! instantly while still being measured:
//! - subnets on different workers are processed in parallel
//! - a stalled subnet does not hold back collection of finished ones

use std::sync::Arc;
use std::time::Duration;

use subnet_monitor::{DistributedMonitor, synthetic::simulated_delay};

use crate::helpers::*;

#[tokio::test(start_paused = true)]
async fn test_workers_process_in_parallel() {
    let mut config = create_test_config(8);
    config.simulate_latency = true;
    let mut monitor = DistributedMonitor::new(config);

    let summary = monitor.monitor_all_subnets(118, true).await.unwrap();

    let sequential: Duration = (1..=118).map(simulated_delay).sum();
    assert_eq!(summary.successful, 118);
    assert!(sequential > Duration::from_secs(30));
    assert!(
        summary.total_time < Duration::from_secs(2),
        "took {:?}",
        summary.total_time
    );

    let metrics = summary.performance.metrics().unwrap();
    assert!(metrics.min_processing_time >= Duration::from_millis(100));
    assert!(metrics.min_processing_time < Duration::from_millis(150));
    assert!(metrics.max_processing_time >= Duration::from_millis(550));
    assert!(metrics.max_processing_time < Duration::from_millis(600));

    monitor.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_stalled_subnet_does_not_block_collection() {
    let source = Arc::new(StallingSource {
        stalled: 1,
        delay: Duration::from_secs(30),
    });
    let mut monitor = DistributedMonitor::with_source(create_test_config(2), source);

    let summary = monitor.monitor_all_subnets(10, true).await.unwrap();

    assert_eq!(summary.successful, 10);
    assert_all_accounted(&summary);

    // everything else was collected before the stalled subnet finished
    assert_eq!(summary.results.last().map(|r| r.subnet_id), Some(1));
    assert!(summary.total_time >= Duration::from_secs(30));

    monitor.shutdown();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_runs_on_separate_monitors() {
    let mut tasks = vec![];
    for workers in 1..=4 {
        tasks.push(tokio::spawn(async move {
            let mut monitor = DistributedMonitor::new(create_test_config(workers));
            let summary = monitor.monitor_all_subnets(25, true).await;
            monitor.shutdown();
            summary
        }));
    }

    for task in tasks {
        let summary = task.await.unwrap().unwrap();
        assert_eq!(summary.successful, 25);
        assert_all_accounted(&summary);
    }
}
