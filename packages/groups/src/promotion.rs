//! Leader promotion against the configured thresholds.

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::store;

/// Outcome of evaluating a leader against the promotion rule.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PromotionOutcome {
    /// No promotion rule is configured.
    NotConfigured,
    /// The leader does not meet the thresholds.
    NotQualified {
        child_count: i64,
        largest_group: i64,
    },
    /// The designation was stamped on the leader's memberships.
    Promoted { designation: String },
}

/// Evaluate a leader against the singleton promotion rule and stamp the
/// configured designation on their memberships if they qualify.
///
/// A leader qualifies once they lead at least the required number of
/// groups and the largest of those groups is within the per-group cap.
#[tracing::instrument(skip(pool))]
pub async fn evaluate_leader_for_promotion(
    pool: &PgPool,
    leader_id: Uuid,
) -> Result<PromotionOutcome> {
    let mut tx = pool.begin().await?;

    store::get_member(&mut *tx, leader_id).await?;

    let record = match store::get_promotion_rule(&mut *tx).await? {
        Some(record) => record,
        None => {
            tx.rollback().await?;
            tracing::info!(leader_id = %leader_id, "no promotion rule configured");
            return Ok(PromotionOutcome::NotConfigured);
        }
    };
    let rule = record.rule();

    let child_count = store::count_groups_led_by(&mut *tx, leader_id).await?;
    let largest_group = store::largest_group_led_by(&mut *tx, leader_id).await?;

    if !rule.qualifies(child_count.max(0) as u32, largest_group.max(0) as u32) {
        tx.rollback().await?;
        tracing::info!(
            leader_id = %leader_id,
            child_count,
            largest_group,
            "leader below promotion thresholds"
        );
        return Ok(PromotionOutcome::NotQualified {
            child_count,
            largest_group,
        });
    }

    store::set_member_designation(&mut *tx, leader_id, &rule.designation_name).await?;
    tx.commit().await?;

    tracing::info!(
        leader_id = %leader_id,
        designation = %rule.designation_name,
        "leader promoted"
    );
    Ok(PromotionOutcome::Promoted {
        designation: rule.designation_name,
    })
}
