mod common;

use pretty_assertions::assert_eq;
use uuid::Uuid;

use flock_groups::store::{self, CreateSplitRuleRequest};
use flock_groups::{roster, GroupsError, SplitOutcome};

#[tokio::test]
async fn test_add_member_below_any_rule() {
    let db = common::TestDb::new().await;

    let (_, group) = common::seed_group(&db.pool, "Vine", "10 Vine St").await;
    store::create_split_rule(&db.pool, CreateSplitRuleRequest::new(8, 12, 3))
        .await
        .unwrap();

    let member = store::create_member(&db.pool, "Tomas Vega").await.unwrap();
    let (membership, outcome) = roster::add_member_to_group(&db.pool, member.id, group.id)
        .await
        .unwrap();

    assert_eq!(membership.member_id, member.id);
    assert_eq!(membership.group_id, group.id);
    assert!(matches!(outcome, SplitOutcome::NoRuleMatched));
}

#[tokio::test]
async fn test_add_member_within_capacity() {
    let db = common::TestDb::new().await;

    let (_, group) = common::seed_group(&db.pool, "Vine", "10 Vine St").await;
    store::create_split_rule(&db.pool, CreateSplitRuleRequest::new(1, 12, 1))
        .await
        .unwrap();

    let member = store::create_member(&db.pool, "Tomas Vega").await.unwrap();
    let (_, outcome) = roster::add_member_to_group(&db.pool, member.id, group.id)
        .await
        .unwrap();
    assert!(matches!(outcome, SplitOutcome::NoSplitNeeded));
}

#[tokio::test]
async fn test_add_member_crossing_rule_boundary_splits() {
    let db = common::TestDb::new().await;

    let (_, group) = common::seed_group(&db.pool, "Vine", "10 Vine St").await;
    common::join_members(&db.pool, group.id, 9).await;
    store::create_split_rule(&db.pool, CreateSplitRuleRequest::new(10, 12, 2))
        .await
        .unwrap();

    let member = store::create_member(&db.pool, "Tomas Vega").await.unwrap();
    let (membership, outcome) = roster::add_member_to_group(&db.pool, member.id, group.id)
        .await
        .unwrap();

    let report = match outcome {
        SplitOutcome::Split(report) => report,
        other => panic!("expected split, got {other:?}"),
    };
    assert_eq!(report.retired_group_id, group.id);
    assert_eq!(report.reassigned, 10);

    // The returned membership already points at the new group it landed in.
    assert!(report.new_group_ids.contains(&membership.group_id));

    let result = store::get_group(&db.pool, group.id).await;
    assert!(matches!(result, Err(GroupsError::GroupNotFound(_))));
}

#[tokio::test]
async fn test_remove_member() {
    let db = common::TestDb::new().await;

    let (_, group) = common::seed_group(&db.pool, "Vine", "10 Vine St").await;
    let memberships = common::join_members(&db.pool, group.id, 1).await;

    roster::remove_member_from_group(&db.pool, memberships[0].id)
        .await
        .unwrap();
    assert_eq!(
        store::count_memberships_by_group(&db.pool, group.id)
            .await
            .unwrap(),
        0
    );

    let result = roster::remove_member_from_group(&db.pool, memberships[0].id).await;
    assert!(matches!(result, Err(GroupsError::MembershipNotFound(_))));
}

#[tokio::test]
async fn test_add_member_to_missing_group() {
    let db = common::TestDb::new().await;

    let member = store::create_member(&db.pool, "Tomas Vega").await.unwrap();
    let result = roster::add_member_to_group(&db.pool, member.id, Uuid::new_v4()).await;
    assert!(matches!(result, Err(GroupsError::GroupNotFound(_))));
}

#[tokio::test]
async fn test_add_missing_member() {
    let db = common::TestDb::new().await;

    let (_, group) = common::seed_group(&db.pool, "Vine", "10 Vine St").await;
    let result = roster::add_member_to_group(&db.pool, Uuid::new_v4(), group.id).await;
    assert!(matches!(result, Err(GroupsError::MemberNotFound(_))));
}
