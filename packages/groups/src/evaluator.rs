//! Capacity evaluation: the entry point invoked after a group's membership
//! changes materially.

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use flock_engine::RuleTable;

use crate::error::Result;
use crate::splitter::{self, SplitReport};
use crate::store;

/// Outcome of evaluating a group against the capacity rules.
///
/// The three no-op variants are normal termination states, not errors.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SplitOutcome {
    /// The group has no members.
    Skipped,
    /// No rule's range contains the current group size.
    NoRuleMatched,
    /// A rule matched but mandates a single resulting group.
    NoSplitNeeded,
    /// The group was split.
    Split(SplitReport),
}

/// Evaluate a group's size against the capacity rules and split it if a
/// rule mandates more than one resulting group.
///
/// The whole evaluation runs in one transaction holding a row lock on the
/// group, so concurrent evaluations of the same group serialize: the
/// second caller blocks, then sees either the already-split state
/// (`GroupNotFound`) or a consistent one. An empty group is reported as
/// [`SplitOutcome::Skipped`] before any rule lookup — it never triggers
/// group creation regardless of what rules exist.
#[tracing::instrument(skip(pool))]
pub async fn evaluate_group_for_split(pool: &PgPool, group_id: Uuid) -> Result<SplitOutcome> {
    let mut tx = pool.begin().await?;
    let group = store::get_group_for_update(&mut *tx, group_id).await?;

    let size = store::count_memberships_by_group(&mut *tx, group_id).await?;
    if size == 0 {
        tx.rollback().await?;
        tracing::info!(group_id = %group_id, "group is empty, skipping evaluation");
        return Ok(SplitOutcome::Skipped);
    }

    let records = store::list_split_rules(&mut *tx).await?;
    let table = RuleTable::new(records.iter().map(|r| r.rule()).collect())?;

    let split_into = match table.lookup(size as u32) {
        Some(rule) => rule.split_into,
        None => {
            tx.rollback().await?;
            tracing::info!(group_id = %group_id, size, "no applicable rule");
            return Ok(SplitOutcome::NoRuleMatched);
        }
    };

    if split_into <= 1 {
        tx.rollback().await?;
        tracing::info!(group_id = %group_id, size, "rule matched, no split required");
        return Ok(SplitOutcome::NoSplitNeeded);
    }

    tracing::info!(group_id = %group_id, size, split_into, "split mandated");
    match splitter::split_within(&mut tx, &group, split_into).await? {
        Some(report) => {
            tx.commit().await?;
            Ok(SplitOutcome::Split(report))
        }
        None => {
            tx.rollback().await?;
            Ok(SplitOutcome::Skipped)
        }
    }
}
