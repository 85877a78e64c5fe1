//! Shared fixtures for task board tests.

use crate::group::{
    adapters::memory::InMemoryMembershipStore,
    domain::{Group, GroupId, GroupName, InviteCode, Membership, UserId},
    ports::{MembershipStore, StoreError},
};
use crate::task::domain::{Task, TaskId};
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

/// Fetches a task row directly from the store.
pub async fn stored_task(store: &InMemoryMembershipStore, task: TaskId) -> Option<Task> {
    store
        .serialized::<Option<Task>, StoreError, _>(move |tx| tx.task(task))
        .await
        .expect("lookup should succeed")
}
