//! Composite subnet scoring
//!
//! The overall score is a weighted combination of three component scores:
//!
//! - **yield**: annualised emission relative to stake, normalised to 0-100
//! - **activity**: the subnet's activity attribute
//! - **credibility**: validator count and uptime
//!
//! All scores are integers in `[0, 100]`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::SubnetData;

/// Blocks produced per day (12 second block time)
pub const DAILY_BLOCKS: f64 = 7200.0;

/// Annual yield percentage that maps to a yield score of 100
pub const MAX_YIELD_PERCENT: f64 = 30.0;

/// Annual yield range (inclusive) that receives a 10% bonus
pub const OPTIMAL_YIELD_RANGE: (f64, f64) = (10.0, 20.0);

/// Validator count that maps to a validator score of 100
pub const VALIDATOR_REFERENCE: f64 = 200.0;

/// Weights of the component scores, in percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreWeights {
    #[serde(rename = "yield")]
    pub yield_weight: u32,
    #[serde(rename = "activity")]
    pub activity_weight: u32,
    #[serde(rename = "credibility")]
    pub credibility_weight: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            yield_weight: 40,
            activity_weight: 30,
            credibility_weight: 30,
        }
    }
}

impl ScoreWeights {
    pub fn total(&self) -> u32 {
        self.yield_weight + self.activity_weight + self.credibility_weight
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(overall_score: u32) -> RiskLevel {
        if overall_score > 70 {
            RiskLevel::Low
        } else if overall_score > 40 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub overall_score: u32,
    pub yield_score: u32,
    pub activity_score: u32,
    pub credibility_score: u32,
    pub weights: ScoreWeights,
    pub risk_level: RiskLevel,
}

impl ScoreResult {
    /// Score a subnet with the default weights
    pub fn calculate(data: &SubnetData) -> ScoreResult {
        let weights = ScoreWeights::default();

        let yield_score = yield_score(data);
        let activity_score = activity_score(data);
        let credibility_score = credibility_score(data);

        let weighted = yield_score * weights.yield_weight
            + activity_score * weights.activity_weight
            + credibility_score * weights.credibility_weight;
        let overall_score = (f64::from(weighted) / f64::from(weights.total()))
            .round()
            .clamp(0.0, 100.0) as u32;

        ScoreResult {
            overall_score,
            yield_score,
            activity_score,
            credibility_score,
            weights,
            risk_level: RiskLevel::from_score(overall_score),
        }
    }
}

/// Annual yield in percent, or `None` if the subnet has no stake
pub fn annual_yield_percent(data: &SubnetData) -> Option<f64> {
    if data.total_stake == 0.0 {
        return None;
    }

    let daily_emission = data.emission_rate * DAILY_BLOCKS;
    let daily_yield_ratio = daily_emission / data.total_stake;
    Some(daily_yield_ratio * 365.0 * 100.0)
}

pub fn yield_score(data: &SubnetData) -> u32 {
    let Some(annual_yield) = annual_yield_percent(data) else {
        return 0;
    };

    let mut score = (annual_yield / MAX_YIELD_PERCENT * 100.0).min(100.0);

    let (low, high) = OPTIMAL_YIELD_RANGE;
    if (low..=high).contains(&annual_yield) {
        score = (score * 1.1).min(100.0);
    }

    score.max(0.0).round() as u32
}

pub fn activity_score(data: &SubnetData) -> u32 {
    data.activity_score.clamp(0, 100) as u32
}

pub fn credibility_score(data: &SubnetData) -> u32 {
    let validator_score =
        (f64::from(data.validator_count) / VALIDATOR_REFERENCE * 100.0).min(100.0);
    let uptime_score = data.uptime_percentage;

    let credibility = validator_score * 0.6 + uptime_score * 0.4;
    credibility.round().clamp(0.0, 100.0) as u32
}
