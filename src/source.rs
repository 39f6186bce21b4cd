//! Sources of subnet attributes
//!
//! Workers do not compute attributes themselves; they ask a [`SubnetSource`].
//! The only source shipped is [`MockSubnetSource`], which derives synthetic
//! attributes from the subnet id.

use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::Utc;

use crate::{SubnetData, synthetic::generate_subnet_data};

#[async_trait]
pub trait SubnetSource: Send + Sync {
    /// Fetch the current attributes of a subnet
    async fn fetch(&self, subnet_id: u32) -> Result<SubnetData>;

    /// Whether this source serves real network data
    fn is_live(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MockSubnetSource;

#[async_trait]
impl SubnetSource for MockSubnetSource {
    async fn fetch(&self, subnet_id: u32) -> Result<SubnetData> {
        if subnet_id == 0 {
            bail!("subnet ids start at 1");
        }

        Ok(generate_subnet_data(subnet_id, Utc::now()))
    }
}
