//! Behavioural tests for the membership invariant engine.

use super::support::{
    admin_count, admins_of, assignee_of, member_count, role_of, seed_assigned_task,
    seed_corrupt_admin, seed_group,
};
use crate::group::{
    adapters::memory::InMemoryMembershipStore,
    domain::{ErrorKind, Role, UserId},
    services::{GroupInvariantEngine, GroupOpError, GroupPolicy},
};
use rstest::{fixture, rstest};
use std::sync::Arc;

struct Harness {
    store: Arc<InMemoryMembershipStore>,
    engine: GroupInvariantEngine<InMemoryMembershipStore>,
}

#[fixture]
fn harness() -> Harness {
    let store = Arc::new(InMemoryMembershipStore::new());
    let engine = GroupInvariantEngine::new(Arc::clone(&store));
    Harness { store, engine }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transfer_admin_moves_role_to_target(harness: Harness) {
    let admin = UserId::new();
    let member = UserId::new();
    let group = seed_group(&harness.store, admin, &[member]).await;

    harness
        .engine
        .transfer_admin(group, admin, member)
        .await
        .expect("transfer should succeed");

    assert_eq!(role_of(&harness.store, group, admin).await, Some(Role::Member));
    assert_eq!(role_of(&harness.store, group, member).await, Some(Role::Admin));
    assert_eq!(admin_count(&harness.store, group).await, 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transfer_admin_to_self_is_a_permitted_noop(harness: Harness) {
    let admin = UserId::new();
    let member = UserId::new();
    let group = seed_group(&harness.store, admin, &[member]).await;

    harness
        .engine
        .transfer_admin(group, admin, admin)
        .await
        .expect("self-transfer should succeed");

    assert_eq!(role_of(&harness.store, group, admin).await, Some(Role::Admin));
    assert_eq!(admin_count(&harness.store, group).await, 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transfer_admin_rejects_non_admin_requester(harness: Harness) {
    let admin = UserId::new();
    let member = UserId::new();
    let group = seed_group(&harness.store, admin, &[member]).await;

    let result = harness.engine.transfer_admin(group, member, admin).await;

    assert!(matches!(result, Err(GroupOpError::NotAdmin)));
    assert_eq!(role_of(&harness.store, group, admin).await, Some(Role::Admin));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transfer_admin_rejects_target_outside_group(harness: Harness) {
    let admin = UserId::new();
    let stranger = UserId::new();
    let group = seed_group(&harness.store, admin, &[]).await;

    let result = harness.engine.transfer_admin(group, admin, stranger).await;

    assert!(matches!(result, Err(GroupOpError::TargetNotMember)));
    assert_eq!(role_of(&harness.store, group, admin).await, Some(Role::Admin));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transfer_admin_repairs_duplicate_admin_rows(harness: Harness) {
    let admin = UserId::new();
    let member = UserId::new();
    let rogue = UserId::new();
    let group = seed_group(&harness.store, admin, &[member]).await;
    seed_corrupt_admin(&harness.store, group, rogue).await;
    assert_eq!(admin_count(&harness.store, group).await, 2);

    harness
        .engine
        .transfer_admin(group, admin, member)
        .await
        .expect("transfer should succeed");

    assert_eq!(admins_of(&harness.store, group).await, vec![member]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn member_leaves_unconditionally(harness: Harness) {
    let admin = UserId::new();
    let member = UserId::new();
    let group = seed_group(&harness.store, admin, &[member]).await;

    harness
        .engine
        .leave_group(group, member, None)
        .await
        .expect("member leave should succeed");

    assert_eq!(role_of(&harness.store, group, member).await, None);
    assert_eq!(member_count(&harness.store, group).await, 1);
    assert_eq!(role_of(&harness.store, group, admin).await, Some(Role::Admin));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn leaving_member_loses_task_assignments(harness: Harness) {
    let admin = UserId::new();
    let member = UserId::new();
    let group = seed_group(&harness.store, admin, &[member]).await;
    let task = seed_assigned_task(&harness.store, group, member).await;

    harness
        .engine
        .leave_group(group, member, None)
        .await
        .expect("member leave should succeed");

    assert_eq!(assignee_of(&harness.store, task).await, None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn leave_rejects_non_member(harness: Harness) {
    let admin = UserId::new();
    let stranger = UserId::new();
    let group = seed_group(&harness.store, admin, &[]).await;

    let result = harness.engine.leave_group(group, stranger, None).await;

    assert!(matches!(result, Err(GroupOpError::NotMember)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admin_leave_requires_a_successor(harness: Harness) {
    let admin = UserId::new();
    let member = UserId::new();
    let group = seed_group(&harness.store, admin, &[member]).await;

    let result = harness.engine.leave_group(group, admin, None).await;

    assert!(matches!(result, Err(GroupOpError::SuccessorRequired)));
    assert_eq!(role_of(&harness.store, group, admin).await, Some(Role::Admin));
    assert_eq!(member_count(&harness.store, group).await, 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admin_leave_rejects_self_as_successor(harness: Harness) {
    let admin = UserId::new();
    let member = UserId::new();
    let group = seed_group(&harness.store, admin, &[member]).await;

    let result = harness.engine.leave_group(group, admin, Some(admin)).await;

    assert!(matches!(result, Err(GroupOpError::SuccessorInvalid)));
    assert_eq!(role_of(&harness.store, group, admin).await, Some(Role::Admin));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admin_leave_rejects_successor_outside_group(harness: Harness) {
    let admin = UserId::new();
    let member = UserId::new();
    let stranger = UserId::new();
    let group = seed_group(&harness.store, admin, &[member]).await;

    let result = harness.engine.leave_group(group, admin, Some(stranger)).await;

    assert!(matches!(result, Err(GroupOpError::SuccessorNotMember)));
    assert_eq!(role_of(&harness.store, group, admin).await, Some(Role::Admin));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admin_leave_promotes_successor_before_departure(harness: Harness) {
    let admin = UserId::new();
    let member = UserId::new();
    let group = seed_group(&harness.store, admin, &[member]).await;
    let task = seed_assigned_task(&harness.store, group, admin).await;

    harness
        .engine
        .leave_group(group, admin, Some(member)).await
        .expect("admin leave should succeed");

    assert_eq!(role_of(&harness.store, group, admin).await, None);
    assert_eq!(admins_of(&harness.store, group).await, vec![member]);
    assert_eq!(assignee_of(&harness.store, task).await, None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn solo_admin_leave_is_refused_by_default(harness: Harness) {
    let admin = UserId::new();
    let group = seed_group(&harness.store, admin, &[]).await;

    let result = harness.engine.leave_group(group, admin, None).await;

    assert!(matches!(result, Err(GroupOpError::SoloAdminMustDelete)));
    assert_eq!(role_of(&harness.store, group, admin).await, Some(Role::Admin));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn solo_admin_leave_permitted_by_policy() {
    let store = Arc::new(InMemoryMembershipStore::new());
    let engine = GroupInvariantEngine::with_policy(
        Arc::clone(&store),
        GroupPolicy {
            allow_admin_solo_leave: true,
        },
    );
    let admin = UserId::new();
    let group = seed_group(&store, admin, &[]).await;

    engine
        .leave_group(group, admin, None)
        .await
        .expect("solo leave should succeed under the permissive policy");

    assert_eq!(member_count(&store, group).await, 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn remove_member_requires_admin_requester(harness: Harness) {
    let admin = UserId::new();
    let member = UserId::new();
    let other = UserId::new();
    let group = seed_group(&harness.store, admin, &[member, other]).await;

    let result = harness.engine.remove_member(group, member, other).await;

    assert!(matches!(result, Err(GroupOpError::Forbidden)));
    assert_eq!(member_count(&harness.store, group).await, 3);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn remove_member_rejects_self_removal(harness: Harness) {
    let admin = UserId::new();
    let group = seed_group(&harness.store, admin, &[]).await;

    let result = harness.engine.remove_member(group, admin, admin).await;

    assert!(matches!(result, Err(GroupOpError::SelfRemoval)));
    assert_eq!(role_of(&harness.store, group, admin).await, Some(Role::Admin));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn remove_member_reports_missing_target(harness: Harness) {
    let admin = UserId::new();
    let stranger = UserId::new();
    let group = seed_group(&harness.store, admin, &[]).await;

    let result = harness.engine.remove_member(group, admin, stranger).await;

    assert!(matches!(result, Err(GroupOpError::MemberNotFound)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn remove_member_refuses_admin_target(harness: Harness) {
    let admin = UserId::new();
    let rogue = UserId::new();
    let group = seed_group(&harness.store, admin, &[]).await;
    seed_corrupt_admin(&harness.store, group, rogue).await;

    let result = harness.engine.remove_member(group, admin, rogue).await;

    assert!(matches!(result, Err(GroupOpError::AdminMustTransferFirst)));
    assert_eq!(member_count(&harness.store, group).await, 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn remove_member_deletes_row_and_clears_assignments(harness: Harness) {
    let admin = UserId::new();
    let member = UserId::new();
    let group = seed_group(&harness.store, admin, &[member]).await;
    let task = seed_assigned_task(&harness.store, group, member).await;

    harness
        .engine
        .remove_member(group, admin, member)
        .await
        .expect("removal should succeed");

    assert_eq!(role_of(&harness.store, group, member).await, None);
    assert_eq!(assignee_of(&harness.store, task).await, None);
    assert_eq!(admin_count(&harness.store, group).await, 1);
}

#[rstest]
#[case(GroupOpError::NotMember, ErrorKind::NotFound)]
#[case(GroupOpError::NotAdmin, ErrorKind::Forbidden)]
#[case(GroupOpError::Forbidden, ErrorKind::Forbidden)]
#[case(GroupOpError::SuccessorRequired, ErrorKind::InvalidInput)]
#[case(GroupOpError::SelfRemoval, ErrorKind::InvalidInput)]
#[case(GroupOpError::AdminMustTransferFirst, ErrorKind::Conflict)]
#[case(GroupOpError::SoloAdminMustDelete, ErrorKind::Conflict)]
fn group_op_errors_map_onto_the_failure_taxonomy(
    #[case] error: GroupOpError,
    #[case] expected: ErrorKind,
) {
    assert_eq!(error.kind(), expected);
}
