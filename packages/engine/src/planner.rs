//! Partition planning for group splits.
//!
//! Pure computation: given a member count and a target group count, decide
//! how many members go to each target. The splitter applies the plan
//! positionally to the stable membership enumeration order, so for a fixed
//! ordering the assignment is fully reproducible.

use serde::Serialize;

use crate::error::{EngineError, Result};

/// Deterministic partition of members into positional targets.
///
/// The chunk is `ceil(member_count / target_count)`: the first chunk of
/// members goes to target 0, the next chunk to target 1, and so on. The
/// last target absorbs the remainder, which may be smaller than the chunk
/// or empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitPlan {
    chunk: u32,
    sizes: Vec<u32>,
}

impl SplitPlan {
    /// Members per full target.
    pub fn chunk(&self) -> u32 {
        self.chunk
    }

    /// Per-target member counts, in target order. Sums to the planned
    /// member count.
    pub fn sizes(&self) -> &[u32] {
        &self.sizes
    }

    /// Number of targets.
    pub fn target_count(&self) -> usize {
        self.sizes.len()
    }

    /// Target index for the member at `index` in the enumeration order.
    pub fn target_group(&self, index: usize) -> usize {
        if self.chunk == 0 {
            return 0;
        }
        index / self.chunk as usize
    }
}

/// Plan the partition of `member_count` members into `split_into` targets.
///
/// `split_into` of zero is a caller contract violation. A zero
/// `member_count` yields an all-zero plan which the caller must not
/// execute.
pub fn plan_partition(member_count: u32, split_into: u32) -> Result<SplitPlan> {
    if split_into < 1 {
        return Err(EngineError::InvalidSplitCount(split_into));
    }

    let chunk = member_count.div_ceil(split_into);
    let mut sizes = Vec::with_capacity(split_into as usize);
    let mut remaining = member_count;
    for _ in 0..split_into {
        let take = remaining.min(chunk);
        sizes.push(take);
        remaining -= take;
    }

    tracing::debug!(member_count, split_into, chunk, "partition planned");
    Ok(SplitPlan { chunk, sizes })
}
