//! End-to-end monitoring runs over synthetic data

use std::collections::BTreeMap;
use std::time::Duration;

use pretty_assertions::assert_eq;
use subnet_monitor::{
    DistributedMonitor,
    metrics::PerformanceReport,
    monitor::{MonitorState, run},
};

use crate::helpers::*;

#[tokio::test]
async fn test_ten_subnets_two_workers() {
    let mut monitor = DistributedMonitor::new(create_test_config(2));

    let summary = monitor.monitor_all_subnets(10, true).await.unwrap();

    assert_eq!(summary.total_subnets, 10);
    assert_eq!(summary.successful, 10);
    assert_eq!(summary.failed, 0);
    assert_all_accounted(&summary);

    let metrics = summary.performance.metrics().expect("run has successes");
    assert_eq!(metrics.success_rate, 100.0);
    assert_eq!(metrics.failed_count, 0);
    assert_eq!(metrics.top_performers.len(), 10);
    assert!(
        metrics
            .top_performers
            .windows(2)
            .all(|pair| pair[0].score >= pair[1].score)
    );
    assert_eq!(metrics.top_performers[0].subnet_id, 10);
    assert_eq!(metrics.top_performers[0].score, 79);
    assert_eq!(metrics.worker_utilization, BTreeMap::from([(0, 5), (1, 5)]));

    monitor.shutdown();
}

#[tokio::test]
async fn test_full_network_distribution() {
    let mut monitor = DistributedMonitor::new(create_test_config(8));

    let summary = monitor.monitor_all_subnets(118, true).await.unwrap();
    assert_all_accounted(&summary);

    let metrics = summary.performance.metrics().unwrap();
    let expected: BTreeMap<usize, usize> = (0..8)
        .map(|worker| (worker, if worker < 6 { 15 } else { 14 }))
        .collect();
    assert_eq!(metrics.worker_utilization, expected);

    // batches are contiguous: worker 0 handles 1..=15, worker 7 handles 105..=118
    for result in summary.successful_results() {
        let expected_worker = if result.subnet_id <= 90 {
            (result.subnet_id as usize - 1) / 15
        } else {
            6 + (result.subnet_id as usize - 91) / 14
        };
        assert_eq!(result.worker_id, expected_worker, "subnet {}", result.subnet_id);
    }

    monitor.shutdown();
}

#[tokio::test]
async fn test_scores_are_deterministic_across_runs() {
    let first = run(20, 3, true).await.unwrap();
    let second = run(20, 5, true).await.unwrap();

    let scores = |summary: &subnet_monitor::RunSummary| {
        let mut scores: Vec<(u32, u32)> = summary
            .successful_results()
            .map(|r| (r.subnet_id, r.scores().unwrap().overall_score))
            .collect();
        scores.sort_unstable();
        scores
    };

    assert_eq!(scores(&first), scores(&second));
}

#[tokio::test]
async fn test_run_helper_shuts_down_pool() {
    // uses default latency, kept small
    let summary = run(3, 3, true).await.unwrap();

    assert_eq!(summary.successful, 3);
    assert!(summary.total_time >= Duration::from_millis(100));
}

#[tokio::test]
async fn test_live_mode_falls_back_to_synthetic_data() {
    let mut monitor = DistributedMonitor::new(create_test_config(2));

    let summary = monitor.monitor_all_subnets(4, false).await.unwrap();

    assert!(!summary.mock);
    assert_eq!(summary.successful, 4);
    assert_eq!(monitor.state(), MonitorState::Completed);

    monitor.shutdown();
}

#[tokio::test]
async fn test_summary_json_shape() {
    let mut monitor = DistributedMonitor::new(create_test_config(2));
    let summary = monitor.monitor_all_subnets(2, true).await.unwrap();
    monitor.shutdown();

    let json = serde_json::to_value(&summary).unwrap();

    assert_eq!(json["total_subnets"], 2);
    assert_eq!(json["performance"]["status"], "analyzed");
    assert_eq!(json["results"][0]["status"], "success");
    assert!(json["results"][0]["scores"]["overall_score"].is_u64());
    assert!(json["total_time_secs"].is_f64());
    assert!(matches!(summary.performance, PerformanceReport::Analyzed(_)));
}
