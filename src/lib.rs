pub mod actors;
pub mod config;
pub mod distribution;
pub mod error;
pub mod metrics;
pub mod monitor;
pub mod report;
pub mod scoring;
pub mod source;
pub mod synthetic;
pub mod util;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use error::{MonitorError, MonitorResult};
pub use monitor::{DistributedMonitor, RunSummary};
pub use scoring::{RiskLevel, ScoreResult, ScoreWeights};

/// Category of work a subnet performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubnetType {
    TextGeneration,
    ImageGeneration,
    DataAnalysis,
    Storage,
    Compute,
}

impl SubnetType {
    pub const ALL: [SubnetType; 5] = [
        SubnetType::TextGeneration,
        SubnetType::ImageGeneration,
        SubnetType::DataAnalysis,
        SubnetType::Storage,
        SubnetType::Compute,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubnetType::TextGeneration => "text_generation",
            SubnetType::ImageGeneration => "image_generation",
            SubnetType::DataAnalysis => "data_analysis",
            SubnetType::Storage => "storage",
            SubnetType::Compute => "compute",
        }
    }
}

impl fmt::Display for SubnetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributes of a single subnet, as fed into the scoring functions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubnetData {
    pub subnet_id: u32,
    pub subnet_type: SubnetType,
    /// Emission per block
    pub emission_rate: f64,
    pub total_stake: f64,
    pub validator_count: u32,
    pub activity_score: i64,
    pub uptime_percentage: f64,
    pub last_block_time: DateTime<Utc>,
    pub network_version: String,
}
