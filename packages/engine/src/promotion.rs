//! Promotion thresholds.
//!
//! The promotion rule is a singleton configuration record in the same
//! trigger/threshold family as the capacity rules: a leader qualifies for
//! the configured designation once they oversee enough child groups, all of
//! them within the per-group size cap.

use serde::{Deserialize, Serialize};

/// Singleton promotion rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionRule {
    /// Minimum number of groups the leader must oversee.
    pub child_count_required: u32,
    /// Upper bound on the size of each of those groups.
    pub max_members_per_group: u32,
    /// Designation granted on qualification.
    pub designation_name: String,
}

impl PromotionRule {
    /// Whether a leader with `child_count` groups, the largest of which
    /// has `largest_group_size` members, meets the thresholds.
    pub fn qualifies(&self, child_count: u32, largest_group_size: u32) -> bool {
        child_count >= self.child_count_required
            && largest_group_size <= self.max_members_per_group
    }
}
