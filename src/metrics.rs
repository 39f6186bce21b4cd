//! Aggregation of processing results into run-level performance metrics

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use crate::actors::messages::ProcessingResult;

/// Number of subnets listed in [`PerformanceMetrics::top_performers`]
pub const TOP_PERFORMERS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TopPerformer {
    pub subnet_id: u32,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    #[serde(rename = "total_time_secs", with = "crate::util::duration_secs")]
    pub total_time: Duration,

    /// Successful subnets per second
    pub throughput: f64,

    /// Successful share of all results, in percent
    pub success_rate: f64,

    #[serde(rename = "avg_processing_time_secs", with = "crate::util::duration_secs")]
    pub avg_processing_time: Duration,
    #[serde(rename = "min_processing_time_secs", with = "crate::util::duration_secs")]
    pub min_processing_time: Duration,
    #[serde(rename = "max_processing_time_secs", with = "crate::util::duration_secs")]
    pub max_processing_time: Duration,

    pub avg_subnet_score: f64,

    /// Highest overall scores, descending; ties keep collection order
    pub top_performers: Vec<TopPerformer>,

    /// Successful subnets per worker id
    pub worker_utilization: BTreeMap<usize, usize>,

    pub failed_count: usize,
}

/// Aggregated view of one monitoring run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PerformanceReport {
    Analyzed(PerformanceMetrics),
    NoSuccessfulResults { failed_count: usize },
}

impl PerformanceReport {
    pub fn calculate(results: &[ProcessingResult], total_time: Duration) -> PerformanceReport {
        let successful: Vec<&ProcessingResult> =
            results.iter().filter(|r| r.is_success()).collect();
        let failed_count = results.len() - successful.len();

        if successful.is_empty() {
            return PerformanceReport::NoSuccessfulResults { failed_count };
        }

        let processing_times = successful.iter().map(|r| r.processing_time);
        let total_processing: Duration = processing_times.clone().sum();
        let avg_processing_time = total_processing / successful.len() as u32;
        let min_processing_time = processing_times.clone().min().unwrap_or_default();
        let max_processing_time = processing_times.max().unwrap_or_default();

        let scored: Vec<TopPerformer> = successful
            .iter()
            .filter_map(|r| {
                r.scores().map(|scores| TopPerformer {
                    subnet_id: r.subnet_id,
                    score: scores.overall_score,
                })
            })
            .collect();

        let score_sum: u64 = scored.iter().map(|p| u64::from(p.score)).sum();
        let avg_subnet_score = score_sum as f64 / scored.len() as f64;

        let mut top_performers = scored;
        // stable sort keeps collection order among equal scores
        top_performers.sort_by(|a, b| b.score.cmp(&a.score));
        top_performers.truncate(TOP_PERFORMERS);

        let mut worker_utilization = BTreeMap::new();
        for result in &successful {
            *worker_utilization.entry(result.worker_id).or_insert(0) += 1;
        }

        PerformanceReport::Analyzed(PerformanceMetrics {
            total_time,
            throughput: throughput(successful.len(), total_time),
            success_rate: successful.len() as f64 / results.len() as f64 * 100.0,
            avg_processing_time,
            min_processing_time,
            max_processing_time,
            avg_subnet_score,
            top_performers,
            worker_utilization,
            failed_count,
        })
    }

    pub fn metrics(&self) -> Option<&PerformanceMetrics> {
        match self {
            PerformanceReport::Analyzed(metrics) => Some(metrics),
            PerformanceReport::NoSuccessfulResults { .. } => None,
        }
    }
}

/// Items per second, or 0 if no time has elapsed
pub fn throughput(items: usize, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 { items as f64 / secs } else { 0.0 }
}
