use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use flock_engine::{PromotionRule, SplitRule};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Member {
    pub id: Uuid,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CellGroup {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub leader_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A member's assignment to a cell group. Always references an existing
/// group; a split re-points it rather than deleting it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Membership {
    pub id: Uuid,
    pub member_id: Uuid,
    pub group_id: Uuid,
    pub designation: Option<String>,
    pub date_joined: DateTime<Utc>,
}

/// Persisted capacity rule. Bounds are kept non-negative and
/// non-overlapping by the schema; [`SplitRuleRecord::rule`] is the engine
/// view of the record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SplitRuleRecord {
    pub id: Uuid,
    pub min_size: i32,
    pub max_size: i32,
    pub split_into: i32,
    pub designation_level: i32,
    pub created_at: DateTime<Utc>,
}

impl SplitRuleRecord {
    pub fn rule(&self) -> SplitRule {
        SplitRule {
            min_size: self.min_size.max(0) as u32,
            max_size: self.max_size.max(0) as u32,
            split_into: self.split_into.max(0) as u32,
            designation_level: self.designation_level.max(0) as u32,
        }
    }
}

/// Persisted singleton promotion rule.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PromotionRuleRecord {
    pub id: Uuid,
    pub child_count_required: i32,
    pub max_members_per_group: i32,
    pub designation_name: String,
    pub created_at: DateTime<Utc>,
}

impl PromotionRuleRecord {
    pub fn rule(&self) -> PromotionRule {
        PromotionRule {
            child_count_required: self.child_count_required.max(0) as u32,
            max_members_per_group: self.max_members_per_group.max(0) as u32,
            designation_name: self.designation_name.clone(),
        }
    }
}
