//! Membership changes and the capacity trigger.
//!
//! This is the collaborator the evaluator is specified to be called from:
//! whenever a member joins a group, the group's size is re-evaluated
//! against the capacity rules in the same call.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::evaluator::{self, SplitOutcome};
use crate::models::Membership;
use crate::store;

/// Add a member to a group and evaluate the group for a split.
///
/// Returns the membership together with the evaluation outcome. When the
/// addition pushed the group across a rule boundary the outcome carries
/// the split report, and the returned membership is re-read so it points
/// at the new group it landed in.
#[tracing::instrument(skip(pool))]
pub async fn add_member_to_group(
    pool: &PgPool,
    member_id: Uuid,
    group_id: Uuid,
) -> Result<(Membership, SplitOutcome)> {
    store::get_member(pool, member_id).await?;
    store::get_group(pool, group_id).await?;

    let membership = store::create_membership(pool, member_id, group_id).await?;
    let outcome = evaluator::evaluate_group_for_split(pool, group_id).await?;

    let membership = match outcome {
        SplitOutcome::Split(_) => store::get_membership(pool, membership.id).await?,
        _ => membership,
    };

    Ok((membership, outcome))
}

/// Remove a membership.
#[tracing::instrument(skip(pool))]
pub async fn remove_member_from_group(pool: &PgPool, membership_id: Uuid) -> Result<()> {
    store::delete_membership(pool, membership_id).await
}
