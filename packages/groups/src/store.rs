//! Persistence boundary for groups, members, memberships and rules.
//!
//! Every function is generic over [`sqlx::PgExecutor`] so it can run
//! against the pool or inside an open transaction. The split and
//! evaluation paths call these inside a single transaction; nothing here
//! manages transactions itself.

use uuid::Uuid;

use crate::error::{GroupsError, Result};
use crate::models::{CellGroup, Member, Membership, PromotionRuleRecord, SplitRuleRecord};

pub struct CreateSplitRuleRequest {
    pub min_size: i32,
    pub max_size: i32,
    pub split_into: i32,
    pub designation_level: i32,
}

impl CreateSplitRuleRequest {
    pub fn new(min_size: i32, max_size: i32, split_into: i32) -> Self {
        Self {
            min_size,
            max_size,
            split_into,
            designation_level: 0,
        }
    }

    pub fn with_designation_level(mut self, designation_level: i32) -> Self {
        self.designation_level = designation_level;
        self
    }
}

/// Create a member.
#[tracing::instrument(skip(executor))]
pub async fn create_member<'e, E>(executor: E, full_name: &str) -> Result<Member>
where
    E: sqlx::PgExecutor<'e>,
{
    let member = sqlx::query_as::<_, Member>(
        r#"
        INSERT INTO members (full_name)
        VALUES ($1)
        RETURNING *
        "#,
    )
    .bind(full_name)
    .fetch_one(executor)
    .await?;

    Ok(member)
}

/// Get a member by ID.
pub async fn get_member<'e, E>(executor: E, member_id: Uuid) -> Result<Member>
where
    E: sqlx::PgExecutor<'e>,
{
    let member = sqlx::query_as::<_, Member>(r#"SELECT * FROM members WHERE id = $1"#)
        .bind(member_id)
        .fetch_optional(executor)
        .await?
        .ok_or(GroupsError::MemberNotFound(member_id))?;

    Ok(member)
}

/// Create a cell group.
#[tracing::instrument(skip(executor))]
pub async fn create_group<'e, E>(
    executor: E,
    name: &str,
    address: &str,
    leader_id: Uuid,
) -> Result<CellGroup>
where
    E: sqlx::PgExecutor<'e>,
{
    let group = sqlx::query_as::<_, CellGroup>(
        r#"
        INSERT INTO cell_groups (name, address, leader_id)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(address)
    .bind(leader_id)
    .fetch_one(executor)
    .await?;

    tracing::info!(group_id = %group.id, name = %group.name, "group created");
    Ok(group)
}

/// Get a cell group by ID.
pub async fn get_group<'e, E>(executor: E, group_id: Uuid) -> Result<CellGroup>
where
    E: sqlx::PgExecutor<'e>,
{
    let group = sqlx::query_as::<_, CellGroup>(r#"SELECT * FROM cell_groups WHERE id = $1"#)
        .bind(group_id)
        .fetch_optional(executor)
        .await?
        .ok_or(GroupsError::GroupNotFound(group_id))?;

    Ok(group)
}

/// Get a cell group by ID, taking a row lock on it.
///
/// Must run inside a transaction. Concurrent evaluations of the same
/// group block here until the first one commits.
pub async fn get_group_for_update<'e, E>(executor: E, group_id: Uuid) -> Result<CellGroup>
where
    E: sqlx::PgExecutor<'e>,
{
    let group =
        sqlx::query_as::<_, CellGroup>(r#"SELECT * FROM cell_groups WHERE id = $1 FOR UPDATE"#)
            .bind(group_id)
            .fetch_optional(executor)
            .await?
            .ok_or(GroupsError::GroupNotFound(group_id))?;

    Ok(group)
}

/// Delete a cell group. Memberships must have been reassigned or removed
/// first; the schema refuses to orphan them.
#[tracing::instrument(skip(executor))]
pub async fn delete_group<'e, E>(executor: E, group_id: Uuid) -> Result<()>
where
    E: sqlx::PgExecutor<'e>,
{
    let result = sqlx::query(r#"DELETE FROM cell_groups WHERE id = $1"#)
        .bind(group_id)
        .execute(executor)
        .await?;

    if result.rows_affected() == 0 {
        return Err(GroupsError::GroupNotFound(group_id));
    }

    tracing::info!(group_id = %group_id, "group deleted");
    Ok(())
}

/// Create a membership assigning a member to a group.
#[tracing::instrument(skip(executor))]
pub async fn create_membership<'e, E>(
    executor: E,
    member_id: Uuid,
    group_id: Uuid,
) -> Result<Membership>
where
    E: sqlx::PgExecutor<'e>,
{
    let membership = sqlx::query_as::<_, Membership>(
        r#"
        INSERT INTO memberships (member_id, group_id)
        VALUES ($1, $2)
        RETURNING *
        "#,
    )
    .bind(member_id)
    .bind(group_id)
    .fetch_one(executor)
    .await?;

    tracing::info!(membership_id = %membership.id, member_id = %member_id, group_id = %group_id, "membership created");
    Ok(membership)
}

/// Get a membership by ID.
pub async fn get_membership<'e, E>(executor: E, membership_id: Uuid) -> Result<Membership>
where
    E: sqlx::PgExecutor<'e>,
{
    let membership =
        sqlx::query_as::<_, Membership>(r#"SELECT * FROM memberships WHERE id = $1"#)
            .bind(membership_id)
            .fetch_optional(executor)
            .await?
            .ok_or(GroupsError::MembershipNotFound(membership_id))?;

    Ok(membership)
}

/// List a group's memberships in the stable enumeration order the split
/// planner is applied to: by join date, ties broken by ID.
pub async fn list_memberships_by_group<'e, E>(
    executor: E,
    group_id: Uuid,
) -> Result<Vec<Membership>>
where
    E: sqlx::PgExecutor<'e>,
{
    let memberships = sqlx::query_as::<_, Membership>(
        r#"SELECT * FROM memberships WHERE group_id = $1 ORDER BY date_joined, id"#,
    )
    .bind(group_id)
    .fetch_all(executor)
    .await?;

    Ok(memberships)
}

/// Count a group's memberships.
pub async fn count_memberships_by_group<'e, E>(executor: E, group_id: Uuid) -> Result<i64>
where
    E: sqlx::PgExecutor<'e>,
{
    let count: i64 =
        sqlx::query_scalar(r#"SELECT COUNT(*) FROM memberships WHERE group_id = $1"#)
            .bind(group_id)
            .fetch_one(executor)
            .await?;

    Ok(count)
}

/// Re-point a membership at a new group.
#[tracing::instrument(skip(executor))]
pub async fn reassign_membership<'e, E>(
    executor: E,
    membership_id: Uuid,
    new_group_id: Uuid,
) -> Result<Membership>
where
    E: sqlx::PgExecutor<'e>,
{
    let membership = sqlx::query_as::<_, Membership>(
        r#"
        UPDATE memberships SET group_id = $2
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(membership_id)
    .bind(new_group_id)
    .fetch_optional(executor)
    .await?
    .ok_or(GroupsError::MembershipNotFound(membership_id))?;

    Ok(membership)
}

/// Delete a membership.
#[tracing::instrument(skip(executor))]
pub async fn delete_membership<'e, E>(executor: E, membership_id: Uuid) -> Result<()>
where
    E: sqlx::PgExecutor<'e>,
{
    let result = sqlx::query(r#"DELETE FROM memberships WHERE id = $1"#)
        .bind(membership_id)
        .execute(executor)
        .await?;

    if result.rows_affected() == 0 {
        return Err(GroupsError::MembershipNotFound(membership_id));
    }

    tracing::info!(membership_id = %membership_id, "membership deleted");
    Ok(())
}

/// Stamp a designation on all of a member's memberships. Returns the
/// number of rows updated.
#[tracing::instrument(skip(executor))]
pub async fn set_member_designation<'e, E>(
    executor: E,
    member_id: Uuid,
    designation: &str,
) -> Result<u64>
where
    E: sqlx::PgExecutor<'e>,
{
    let result = sqlx::query(r#"UPDATE memberships SET designation = $2 WHERE member_id = $1"#)
        .bind(member_id)
        .bind(designation)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

/// Create a capacity rule. The schema rejects inverted bounds, a split
/// count below one and ranges overlapping an existing rule.
#[tracing::instrument(skip(executor, req), fields(min_size = req.min_size, max_size = req.max_size, split_into = req.split_into))]
pub async fn create_split_rule<'e, E>(
    executor: E,
    req: CreateSplitRuleRequest,
) -> Result<SplitRuleRecord>
where
    E: sqlx::PgExecutor<'e>,
{
    let record = sqlx::query_as::<_, SplitRuleRecord>(
        r#"
        INSERT INTO split_rules (min_size, max_size, split_into, designation_level)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(req.min_size)
    .bind(req.max_size)
    .bind(req.split_into)
    .bind(req.designation_level)
    .fetch_one(executor)
    .await?;

    tracing::info!(rule_id = %record.id, "split rule created");
    Ok(record)
}

/// List all capacity rules in ascending range order.
pub async fn list_split_rules<'e, E>(executor: E) -> Result<Vec<SplitRuleRecord>>
where
    E: sqlx::PgExecutor<'e>,
{
    let records =
        sqlx::query_as::<_, SplitRuleRecord>(r#"SELECT * FROM split_rules ORDER BY min_size"#)
            .fetch_all(executor)
            .await?;

    Ok(records)
}

/// Delete a capacity rule.
#[tracing::instrument(skip(executor))]
pub async fn delete_split_rule<'e, E>(executor: E, rule_id: Uuid) -> Result<()>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query(r#"DELETE FROM split_rules WHERE id = $1"#)
        .bind(rule_id)
        .execute(executor)
        .await?;

    Ok(())
}

/// Upsert the singleton promotion rule.
#[tracing::instrument(skip(executor))]
pub async fn upsert_promotion_rule<'e, E>(
    executor: E,
    child_count_required: i32,
    max_members_per_group: i32,
    designation_name: &str,
) -> Result<PromotionRuleRecord>
where
    E: sqlx::PgExecutor<'e>,
{
    let record = sqlx::query_as::<_, PromotionRuleRecord>(
        r#"
        INSERT INTO promotion_rules (child_count_required, max_members_per_group, designation_name)
        VALUES ($1, $2, $3)
        ON CONFLICT (singleton) DO UPDATE SET
            child_count_required = EXCLUDED.child_count_required,
            max_members_per_group = EXCLUDED.max_members_per_group,
            designation_name = EXCLUDED.designation_name
        RETURNING *
        "#,
    )
    .bind(child_count_required)
    .bind(max_members_per_group)
    .bind(designation_name)
    .fetch_one(executor)
    .await?;

    Ok(record)
}

/// Get the singleton promotion rule, if configured.
pub async fn get_promotion_rule<'e, E>(executor: E) -> Result<Option<PromotionRuleRecord>>
where
    E: sqlx::PgExecutor<'e>,
{
    let record = sqlx::query_as::<_, PromotionRuleRecord>(r#"SELECT * FROM promotion_rules"#)
        .fetch_optional(executor)
        .await?;

    Ok(record)
}

/// Count the groups led by a member.
pub async fn count_groups_led_by<'e, E>(executor: E, leader_id: Uuid) -> Result<i64>
where
    E: sqlx::PgExecutor<'e>,
{
    let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM cell_groups WHERE leader_id = $1"#)
        .bind(leader_id)
        .fetch_one(executor)
        .await?;

    Ok(count)
}

/// Size of the largest group led by a member; zero if they lead none.
pub async fn largest_group_led_by<'e, E>(executor: E, leader_id: Uuid) -> Result<i64>
where
    E: sqlx::PgExecutor<'e>,
{
    let largest: i64 = sqlx::query_scalar(
        r#"
        SELECT COALESCE(MAX(sizes.n), 0)
        FROM (
            SELECT COUNT(*) AS n
            FROM memberships m
            JOIN cell_groups g ON g.id = m.group_id
            WHERE g.leader_id = $1
            GROUP BY m.group_id
        ) AS sizes
        "#,
    )
    .bind(leader_id)
    .fetch_one(executor)
    .await?;

    Ok(largest)
}
