//! Helper functions for integration tests

use std::collections::HashSet;
use std::time::Duration;

use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::Utc;
use subnet_monitor::{
    SubnetData, config::MonitorConfig, monitor::RunSummary, source::SubnetSource,
    synthetic::generate_subnet_data,
};

pub fn create_test_config(workers: usize) -> MonitorConfig {
    MonitorConfig {
        workers,
        simulate_latency: false,
        collect_timeout_ms: 100,
        ..MonitorConfig::default()
    }
}

/// Fails for every subnet
pub struct FailingSource;

#[async_trait]
impl SubnetSource for FailingSource {
    async fn fetch(&self, subnet_id: u32) -> Result<SubnetData> {
        bail!("subnet {subnet_id} is unreachable")
    }
}

/// Fails for the given subnets, generates synthetic data for the rest
pub struct FlakySource {
    pub failing: HashSet<u32>,
}

#[async_trait]
impl SubnetSource for FlakySource {
    async fn fetch(&self, subnet_id: u32) -> Result<SubnetData> {
        if self.failing.contains(&subnet_id) {
            bail!("subnet {subnet_id} timed out");
        }
        Ok(generate_subnet_data(subnet_id, Utc::now()))
    }
}

/// Panics for the given subnet
pub struct PanickingSource {
    pub panic_on: u32,
}

#[async_trait]
impl SubnetSource for PanickingSource {
    async fn fetch(&self, subnet_id: u32) -> Result<SubnetData> {
        if subnet_id == self.panic_on {
            panic!("corrupt data for subnet {subnet_id}");
        }
        Ok(generate_subnet_data(subnet_id, Utc::now()))
    }
}

/// Delays the given subnet, answers all others immediately
pub struct StallingSource {
    pub stalled: u32,
    pub delay: Duration,
}

#[async_trait]
impl SubnetSource for StallingSource {
    async fn fetch(&self, subnet_id: u32) -> Result<SubnetData> {
        if subnet_id == self.stalled {
            tokio::time::sleep(self.delay).await;
        }
        Ok(generate_subnet_data(subnet_id, Utc::now()))
    }
}

/// Every requested subnet shows up exactly once
pub fn assert_all_accounted(summary: &RunSummary) {
    assert_eq!(
        summary.successful + summary.failed,
        summary.total_subnets as usize
    );

    let mut ids: Vec<u32> = summary.results.iter().map(|r| r.subnet_id).collect();
    ids.sort_unstable();
    assert_eq!(ids, (1..=summary.total_subnets).collect::<Vec<_>>());
}
