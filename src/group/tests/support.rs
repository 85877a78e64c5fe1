//! Shared fixtures and store inspection helpers for group tests.

use crate::group::{
    adapters::memory::InMemoryMembershipStore,
    domain::{Group, GroupId, GroupName, InviteCode, Membership, Role, User, UserId},
    ports::{MembershipStore, StoreError},
};
use crate::task::domain::{Task, TaskDetails, TaskId, TaskTitle};
use mockable::DefaultClock;

/// Seeds a group with one admin and the given members, returning its id.
pub async fn seed_group(
    store: &InMemoryMembershipStore,
    admin: UserId,
    members: &[UserId],
) -> GroupId {
    let clock = DefaultClock;
    let name = GroupName::new("Study Group").expect("valid fixture name");
    let group = Group::new(name, InviteCode::generate(), &clock);
    let group_id = group.id();

    let mut rows = vec![Membership::admin(group_id, admin, &clock)];
    for member in members {
        rows.push(Membership::member(group_id, *member, &clock));
    }

    store
        .serialized::<(), StoreError, _>(move |tx| {
            tx.insert_group(&group)?;
            for row in &rows {
                tx.insert_membership(row)?;
            }
            Ok(())
        })
        .await
        .expect("seeding should succeed");
    group_id
}

/// Inserts an extra admin row directly, simulating duplicate-admin
/// corruption that predates the invariant engine.
pub async fn seed_corrupt_admin(store: &InMemoryMembershipStore, group: GroupId, user: UserId) {
    let clock = DefaultClock;
    let row = Membership::admin(group, user, &clock);
    store
        .serialized::<(), StoreError, _>(move |tx| tx.insert_membership(&row))
        .await
        .expect("corrupt seeding should succeed");
}

/// Inserts a user identity record.
pub async fn seed_user(store: &InMemoryMembershipStore, user: User) {
    store
        .serialized::<(), StoreError, _>(move |tx| tx.insert_user(&user))
        .await
        .expect("user seeding should succeed");
}

/// Inserts a task assigned to the given user, returning its id.
pub async fn seed_assigned_task(
    store: &InMemoryMembershipStore,
    group: GroupId,
    assignee: UserId,
) -> TaskId {
    let clock = DefaultClock;
    let title = TaskTitle::new("Revise chapter 4").expect("valid fixture title");
    let details = TaskDetails {
        assignee: Some(assignee),
        ..TaskDetails::default()
    };
    let task = Task::new(group, title, details, &clock);
    let task_id = task.id();
    store
        .serialized::<(), StoreError, _>(move |tx| tx.insert_task(&task))
        .await
        .expect("task seeding should succeed");
    task_id
}

/// Returns the number of admin memberships in the group.
pub async fn admin_count(store: &InMemoryMembershipStore, group: GroupId) -> usize {
    store
        .serialized::<usize, StoreError, _>(move |tx| {
            Ok(tx
                .list_memberships(group)?
                .iter()
                .filter(|membership| membership.is_admin())
                .count())
        })
        .await
        .expect("listing should succeed")
}

/// Returns the total number of memberships in the group.
pub async fn member_count(store: &InMemoryMembershipStore, group: GroupId) -> usize {
    store
        .serialized::<usize, StoreError, _>(move |tx| Ok(tx.list_memberships(group)?.len()))
        .await
        .expect("listing should succeed")
}

/// Returns the user ids holding the admin role in the group.
pub async fn admins_of(store: &InMemoryMembershipStore, group: GroupId) -> Vec<UserId> {
    store
        .serialized::<Vec<UserId>, StoreError, _>(move |tx| {
            Ok(tx
                .list_memberships(group)?
                .iter()
                .filter(|membership| membership.is_admin())
                .map(Membership::user_id)
                .collect())
        })
        .await
        .expect("listing should succeed")
}

/// Returns the user's role in the group, when a membership exists.
pub async fn role_of(
    store: &InMemoryMembershipStore,
    group: GroupId,
    user: UserId,
) -> Option<Role> {
    store
        .serialized::<Option<Role>, StoreError, _>(move |tx| {
            Ok(tx.membership(group, user)?.map(|membership| membership.role()))
        })
        .await
        .expect("lookup should succeed")
}

/// Returns the task's assignee, when the task exists.
pub async fn assignee_of(store: &InMemoryMembershipStore, task: TaskId) -> Option<UserId> {
    store
        .serialized::<Option<UserId>, StoreError, _>(move |tx| {
            Ok(tx.task(task)?.and_then(|row| row.assignee()))
        })
        .await
        .expect("lookup should succeed")
}

/// Returns `true` when the task row still exists.
pub async fn task_exists(store: &InMemoryMembershipStore, task: TaskId) -> bool {
    store
        .serialized::<bool, StoreError, _>(move |tx| Ok(tx.task(task)?.is_some()))
        .await
        .expect("lookup should succeed")
}

/// Returns `true` when the group row still exists.
pub async fn group_exists(store: &InMemoryMembershipStore, group: GroupId) -> bool {
    store
        .serialized::<bool, StoreError, _>(move |tx| Ok(tx.group(group)?.is_some()))
        .await
        .expect("lookup should succeed")
}
