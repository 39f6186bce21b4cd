//! Human-readable rendering of a run summary

use std::fmt::Write;

use crate::{metrics::PerformanceReport, monitor::RunSummary};

/// Number of top performers shown in the text report
const REPORT_TOP_PERFORMERS: usize = 5;

pub fn render_text(summary: &RunSummary) -> String {
    let mut out = String::new();
    let rule = "=".repeat(80);

    // writing to a String cannot fail
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "DISTRIBUTED MONITORING RESULTS");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Total subnets:   {}", summary.total_subnets);
    let _ = writeln!(out, "Successful:      {}", summary.successful);
    let _ = writeln!(out, "Failed:          {}", summary.failed);
    let _ = writeln!(
        out,
        "Total time:      {:.2} seconds",
        summary.total_time.as_secs_f64()
    );
    let _ = writeln!(
        out,
        "Throughput:      {:.1} subnets/second",
        summary.subnets_per_second
    );
    if !summary.mock {
        let _ = writeln!(out, "Data mode:       live requested");
    }

    match &summary.performance {
        PerformanceReport::Analyzed(metrics) => {
            let _ = writeln!(out, "Success rate:    {:.1}%", metrics.success_rate);
            let _ = writeln!(
                out,
                "Processing time: avg {:.3}s, min {:.3}s, max {:.3}s",
                metrics.avg_processing_time.as_secs_f64(),
                metrics.min_processing_time.as_secs_f64(),
                metrics.max_processing_time.as_secs_f64()
            );
            let _ = writeln!(out, "Average score:   {:.1}", metrics.avg_subnet_score);

            let _ = writeln!(out);
            let _ = writeln!(out, "TOP {REPORT_TOP_PERFORMERS} PERFORMING SUBNETS:");
            for (rank, performer) in metrics
                .top_performers
                .iter()
                .take(REPORT_TOP_PERFORMERS)
                .enumerate()
            {
                let _ = writeln!(
                    out,
                    "  {}. Subnet {}: Score {}/100",
                    rank + 1,
                    performer.subnet_id,
                    performer.score
                );
            }

            let _ = writeln!(out);
            let _ = writeln!(out, "WORKER UTILIZATION:");
            for (worker_id, count) in &metrics.worker_utilization {
                let _ = writeln!(out, "  worker {worker_id}: {count} subnets");
            }
        }
        PerformanceReport::NoSuccessfulResults { failed_count } => {
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "No successful results to analyze ({failed_count} failed)"
            );
        }
    }

    out
}
