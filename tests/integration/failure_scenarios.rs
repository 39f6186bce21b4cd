//! Failure tests for the monitoring run
//!
//! Individual subnet failures must never abort a run:
//! - source errors
//! - panics while scoring
//! - a pool where every subnet fails

use std::collections::HashSet;
use std::sync::Arc;

use assert_matches::assert_matches;
use subnet_monitor::{
    DistributedMonitor, MonitorError,
    metrics::PerformanceReport,
    monitor::{MonitorState, run},
};

use crate::helpers::*;

#[tokio::test]
async fn test_all_subnets_fail() {
    let mut monitor =
        DistributedMonitor::with_source(create_test_config(3), Arc::new(FailingSource));

    let summary = monitor.monitor_all_subnets(12, true).await.unwrap();

    assert_eq!(summary.successful, 0);
    assert_eq!(summary.failed, 12);
    assert_eq!(summary.subnets_per_second, 0.0);
    assert_all_accounted(&summary);
    assert_matches!(
        summary.performance,
        PerformanceReport::NoSuccessfulResults { failed_count: 12 }
    );
    assert_eq!(monitor.state(), MonitorState::Completed);

    monitor.shutdown();
}

#[tokio::test]
async fn test_partial_failures_are_counted() {
    let failing: HashSet<u32> = (1..=10).filter(|id| id % 2 == 0).collect();
    let source = Arc::new(FlakySource {
        failing: failing.clone(),
    });
    let mut monitor = DistributedMonitor::with_source(create_test_config(2), source);

    let summary = monitor.monitor_all_subnets(10, true).await.unwrap();

    assert_eq!(summary.successful, 5);
    assert_eq!(summary.failed, 5);
    assert_all_accounted(&summary);
    assert_eq!(summary.results.len(), 10);
    assert_eq!(summary.successful_results().count(), 5);
    assert!(summary.successful_results().all(|r| !failing.contains(&r.subnet_id)));

    for failure in summary.failed_results() {
        assert!(failing.contains(&failure.subnet_id));
        assert!(failure.worker_id < 2);
        assert_matches!(failure.error(), Some(msg) if msg.contains("timed out"));
    }

    let metrics = summary.performance.metrics().unwrap();
    assert_eq!(metrics.success_rate, 50.0);
    assert_eq!(metrics.failed_count, 5);
    assert!(metrics.top_performers.iter().all(|p| p.subnet_id % 2 == 1));

    monitor.shutdown();
}

#[tokio::test]
async fn test_panic_is_isolated() {
    let source = Arc::new(PanickingSource { panic_on: 3 });
    let mut monitor = DistributedMonitor::with_source(create_test_config(2), source);

    let summary = monitor.monitor_all_subnets(6, true).await.unwrap();

    assert_eq!(summary.successful, 5);
    assert_eq!(summary.failed, 1);

    let failure = summary.failed_results().next().unwrap();
    assert_eq!(failure.subnet_id, 3);
    assert_matches!(failure.error(), Some(msg) if msg.contains("corrupt data for subnet 3"));

    // the panicking worker keeps serving
    let stats = monitor.worker_stats().await.unwrap();
    assert_eq!(stats.iter().map(|s| s.processed_count).sum::<usize>(), 5);

    monitor.shutdown();
}

#[tokio::test]
async fn test_initialization_failure_produces_no_results() {
    let result = run(10, 0, true).await;

    assert_matches!(result, Err(MonitorError::InitializationFailed(_)));
}

#[tokio::test]
async fn test_worker_stats_after_shutdown() {
    let mut monitor = DistributedMonitor::new(create_test_config(2));
    monitor.initialize().unwrap();
    monitor.shutdown();

    // pool is released
    assert!(monitor.worker_stats().await.unwrap().is_empty());
}
