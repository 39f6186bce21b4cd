//! Partitioning of the subnet id range across workers

use std::ops::RangeInclusive;

/// Split `[1, subnet_count]` into `batch_count` contiguous batches
///
/// Batches are sized as evenly as possible: the first `subnet_count % batch_count`
/// batches get one extra subnet. Batches may be empty when there are fewer subnets
/// than batches. Returns no batches when `batch_count` is zero.
pub fn distribute_subnets(subnet_count: u32, batch_count: usize) -> Vec<RangeInclusive<u32>> {
    if batch_count == 0 {
        return Vec::new();
    }

    let batch_count_u32 = batch_count as u32;
    let per_batch = subnet_count / batch_count_u32;
    let remainder = subnet_count % batch_count_u32;

    let mut batches = Vec::with_capacity(batch_count);
    // u64 so the cursor can step past `u32::MAX` after the last batch
    let mut next_subnet: u64 = 1;

    for i in 0..batch_count_u32 {
        let batch_size = u64::from(per_batch + u32::from(i < remainder));
        let end = next_subnet + batch_size - 1;
        // an empty batch is represented as `n..=n-1`; both bounds stay within u32
        batches.push(next_subnet as u32..=end as u32);
        next_subnet = end + 1;
    }

    batches
}

/// Pair every batch with the worker it is dispatched to (round-robin over the pool)
pub fn assign_batches(
    batches: Vec<RangeInclusive<u32>>,
    pool_size: usize,
) -> Vec<(usize, RangeInclusive<u32>)> {
    if pool_size == 0 {
        return Vec::new();
    }

    batches
        .into_iter()
        .enumerate()
        .map(|(index, batch)| (index % pool_size, batch))
        .collect()
}
