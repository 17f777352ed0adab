mod common;

use pretty_assertions::assert_eq;
use uuid::Uuid;

use flock_groups::store::{self, CreateSplitRuleRequest};
use flock_groups::GroupsError;

#[tokio::test]
async fn test_create_and_get_member() {
    let db = common::TestDb::new().await;

    let member = store::create_member(&db.pool, "Ada Okafor").await.unwrap();
    assert_eq!(member.full_name, "Ada Okafor");

    let fetched = store::get_member(&db.pool, member.id).await.unwrap();
    assert_eq!(fetched.id, member.id);

    let result = store::get_member(&db.pool, Uuid::new_v4()).await;
    assert!(matches!(result, Err(GroupsError::MemberNotFound(_))));
}

#[tokio::test]
async fn test_create_and_get_group() {
    let db = common::TestDb::new().await;

    let (leader, group) = common::seed_group(&db.pool, "Hope", "12 Vine St").await;

    let fetched = store::get_group(&db.pool, group.id).await.unwrap();
    assert_eq!(fetched.name, "Hope");
    assert_eq!(fetched.address, "12 Vine St");
    assert_eq!(fetched.leader_id, leader.id);

    let result = store::get_group(&db.pool, Uuid::new_v4()).await;
    assert!(matches!(result, Err(GroupsError::GroupNotFound(_))));
}

#[tokio::test]
async fn test_memberships_listed_in_join_order() {
    let db = common::TestDb::new().await;

    let (_, group) = common::seed_group(&db.pool, "Hope", "12 Vine St").await;
    let created = common::join_members(&db.pool, group.id, 3).await;

    let listed = store::list_memberships_by_group(&db.pool, group.id)
        .await
        .unwrap();
    assert_eq!(listed.len(), 3);
    for membership in &listed {
        assert_eq!(membership.group_id, group.id);
        assert!(membership.designation.is_none());
    }

    // Repeated enumeration is stable.
    let again = store::list_memberships_by_group(&db.pool, group.id)
        .await
        .unwrap();
    let ids: Vec<Uuid> = listed.iter().map(|m| m.id).collect();
    let again_ids: Vec<Uuid> = again.iter().map(|m| m.id).collect();
    assert_eq!(ids, again_ids);

    let count = store::count_memberships_by_group(&db.pool, group.id)
        .await
        .unwrap();
    assert_eq!(count, created.len() as i64);
}

#[tokio::test]
async fn test_reassign_membership() {
    let db = common::TestDb::new().await;

    let (_, first) = common::seed_group(&db.pool, "First", "1 First St").await;
    let (_, second) = common::seed_group(&db.pool, "Second", "2 Second St").await;
    let memberships = common::join_members(&db.pool, first.id, 1).await;

    let moved = store::reassign_membership(&db.pool, memberships[0].id, second.id)
        .await
        .unwrap();
    assert_eq!(moved.group_id, second.id);

    assert_eq!(
        store::count_memberships_by_group(&db.pool, first.id)
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        store::count_memberships_by_group(&db.pool, second.id)
            .await
            .unwrap(),
        1
    );

    let result = store::reassign_membership(&db.pool, Uuid::new_v4(), second.id).await;
    assert!(matches!(result, Err(GroupsError::MembershipNotFound(_))));
}

#[tokio::test]
async fn test_delete_membership() {
    let db = common::TestDb::new().await;

    let (_, group) = common::seed_group(&db.pool, "Hope", "12 Vine St").await;
    let memberships = common::join_members(&db.pool, group.id, 1).await;

    store::delete_membership(&db.pool, memberships[0].id)
        .await
        .unwrap();
    let result = store::delete_membership(&db.pool, memberships[0].id).await;
    assert!(matches!(result, Err(GroupsError::MembershipNotFound(_))));
}

#[tokio::test]
async fn test_delete_group_refuses_to_orphan_memberships() {
    let db = common::TestDb::new().await;

    let (_, group) = common::seed_group(&db.pool, "Anchored", "3 Bay St").await;
    let memberships = common::join_members(&db.pool, group.id, 2).await;

    let result = store::delete_group(&db.pool, group.id).await;
    assert!(matches!(result, Err(GroupsError::Database(_))));

    for membership in memberships {
        store::delete_membership(&db.pool, membership.id)
            .await
            .unwrap();
    }
    store::delete_group(&db.pool, group.id).await.unwrap();

    let result = store::delete_group(&db.pool, group.id).await;
    assert!(matches!(result, Err(GroupsError::GroupNotFound(_))));
}

#[tokio::test]
async fn test_split_rules_sorted_and_validated() {
    let db = common::TestDb::new().await;

    store::create_split_rule(&db.pool, CreateSplitRuleRequest::new(6, 10, 2))
        .await
        .unwrap();
    let first = store::create_split_rule(
        &db.pool,
        CreateSplitRuleRequest::new(1, 5, 1).with_designation_level(1),
    )
    .await
    .unwrap();
    assert_eq!(first.designation_level, 1);

    let rules = store::list_split_rules(&db.pool).await.unwrap();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].min_size, 1);
    assert_eq!(rules[1].min_size, 6);

    // Overlapping ranges are rejected at authoring time.
    let result =
        store::create_split_rule(&db.pool, CreateSplitRuleRequest::new(5, 8, 2)).await;
    assert!(matches!(result, Err(GroupsError::Database(_))));

    // So are inverted bounds and a split count below one.
    let result =
        store::create_split_rule(&db.pool, CreateSplitRuleRequest::new(20, 15, 2)).await;
    assert!(matches!(result, Err(GroupsError::Database(_))));
    let result =
        store::create_split_rule(&db.pool, CreateSplitRuleRequest::new(11, 15, 0)).await;
    assert!(matches!(result, Err(GroupsError::Database(_))));

    let rules = store::list_split_rules(&db.pool).await.unwrap();
    assert_eq!(rules.len(), 2);

    store::delete_split_rule(&db.pool, first.id).await.unwrap();
    let rules = store::list_split_rules(&db.pool).await.unwrap();
    assert_eq!(rules.len(), 1);
}

#[tokio::test]
async fn test_promotion_rule_is_a_singleton() {
    let db = common::TestDb::new().await;

    assert!(store::get_promotion_rule(&db.pool).await.unwrap().is_none());

    store::upsert_promotion_rule(&db.pool, 3, 12, "Zone Leader")
        .await
        .unwrap();
    let updated = store::upsert_promotion_rule(&db.pool, 5, 15, "Area Leader")
        .await
        .unwrap();
    assert_eq!(updated.child_count_required, 5);
    assert_eq!(updated.designation_name, "Area Leader");

    let fetched = store::get_promotion_rule(&db.pool).await.unwrap().unwrap();
    assert_eq!(fetched.designation_name, "Area Leader");
}

#[tokio::test]
async fn test_leader_aggregates() {
    let db = common::TestDb::new().await;

    let leader = store::create_member(&db.pool, "Noah Adeyemi").await.unwrap();
    assert_eq!(
        store::count_groups_led_by(&db.pool, leader.id).await.unwrap(),
        0
    );
    assert_eq!(
        store::largest_group_led_by(&db.pool, leader.id).await.unwrap(),
        0
    );

    let small = store::create_group(&db.pool, "Small", "a", leader.id)
        .await
        .unwrap();
    let large = store::create_group(&db.pool, "Large", "b", leader.id)
        .await
        .unwrap();
    common::join_members(&db.pool, small.id, 2).await;
    common::join_members(&db.pool, large.id, 7).await;

    assert_eq!(
        store::count_groups_led_by(&db.pool, leader.id).await.unwrap(),
        2
    );
    assert_eq!(
        store::largest_group_led_by(&db.pool, leader.id).await.unwrap(),
        7
    );
}

#[tokio::test]
async fn test_set_member_designation() {
    let db = common::TestDb::new().await;

    let (_, group) = common::seed_group(&db.pool, "Hope", "12 Vine St").await;
    let member = store::create_member(&db.pool, "Mia Santos").await.unwrap();
    let membership = store::create_membership(&db.pool, member.id, group.id)
        .await
        .unwrap();

    let updated = store::set_member_designation(&db.pool, member.id, "Assistant")
        .await
        .unwrap();
    assert_eq!(updated, 1);

    let fetched = store::get_membership(&db.pool, membership.id).await.unwrap();
    assert_eq!(fetched.designation.as_deref(), Some("Assistant"));
}
