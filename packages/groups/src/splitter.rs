//! Group splitting: the structural transition from one over-large group to
//! several new ones.
//!
//! The transition is atomic. Creating the new groups, re-pointing every
//! membership and deleting the old group all happen inside one transaction
//! that holds a row lock on the old group, so a store failure at any step
//! rolls the whole thing back and concurrent splits of the same group
//! serialize.

use serde::Serialize;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use flock_engine::plan_partition;

use crate::error::Result;
use crate::models::CellGroup;
use crate::store;

/// Report of an executed split.
#[derive(Debug, Clone, Serialize)]
pub struct SplitReport {
    /// The deleted old group.
    pub retired_group_id: Uuid,
    /// New groups, in partition-target order.
    pub new_group_ids: Vec<Uuid>,
    /// Memberships re-pointed at a new group.
    pub reassigned: usize,
}

/// Split a group into `split_into` new groups.
///
/// Opens its own transaction and locks the old group's row. Returns
/// `Ok(None)` without touching anything when the group has no members; a
/// missing group is `GroupNotFound`.
#[tracing::instrument(skip(pool))]
pub async fn execute_split(
    pool: &PgPool,
    group_id: Uuid,
    split_into: u32,
) -> Result<Option<SplitReport>> {
    let mut tx = pool.begin().await?;
    let group = store::get_group_for_update(&mut *tx, group_id).await?;

    match split_within(&mut tx, &group, split_into).await? {
        Some(report) => {
            tx.commit().await?;
            Ok(Some(report))
        }
        None => {
            tx.rollback().await?;
            Ok(None)
        }
    }
}

/// Perform the split inside a transaction the caller owns.
///
/// The caller must already hold a row lock on `group` (see
/// [`store::get_group_for_update`]) and decides whether to commit.
/// Returns `None` when the group has no members, in which case nothing
/// was written.
pub async fn split_within(
    conn: &mut PgConnection,
    group: &CellGroup,
    split_into: u32,
) -> Result<Option<SplitReport>> {
    let memberships = store::list_memberships_by_group(&mut *conn, group.id).await?;
    if memberships.is_empty() {
        tracing::info!(group_id = %group.id, "group has no members, skipping split");
        return Ok(None);
    }

    let plan = plan_partition(memberships.len() as u32, split_into)?;

    // Creations are accumulated in order so that partition target i maps
    // to new-group i.
    let mut new_group_ids = Vec::with_capacity(split_into as usize);
    for part in 1..=split_into {
        let name = format!("{} - Part {}", group.name, part);
        let created = store::create_group(&mut *conn, &name, &group.address, group.leader_id).await?;
        new_group_ids.push(created.id);
    }

    for (index, membership) in memberships.iter().enumerate() {
        let target = new_group_ids[plan.target_group(index)];
        store::reassign_membership(&mut *conn, membership.id, target).await?;
    }

    store::delete_group(&mut *conn, group.id).await?;

    tracing::info!(
        retired_group = %group.id,
        new_groups = new_group_ids.len(),
        reassigned = memberships.len(),
        "group split executed"
    );

    Ok(Some(SplitReport {
        retired_group_id: group.id,
        new_group_ids,
        reassigned: memberships.len(),
    }))
}
