//! Tests for group creation, joining, and deletion.

use super::support::{
    group_exists, member_count, role_of, seed_assigned_task, seed_group, task_exists,
};
use crate::group::{
    adapters::{UuidCodeIssuer, memory::InMemoryMembershipStore},
    domain::{Group, GroupDomainError, GroupId, GroupName, InviteCode, Role, UserId},
    ports::{InviteCodeIssuer, MembershipStore, StoreError},
    services::{GroupLifecycleService, LifecycleError},
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use std::sync::Arc;

mockall::mock! {
    CodeIssuer {}

    impl InviteCodeIssuer for CodeIssuer {
        fn issue(&self) -> InviteCode;
    }
}

type DefaultService = GroupLifecycleService<InMemoryMembershipStore, DefaultClock, UuidCodeIssuer>;
type MockedService = GroupLifecycleService<InMemoryMembershipStore, DefaultClock, MockCodeIssuer>;

struct Harness {
    store: Arc<InMemoryMembershipStore>,
    service: DefaultService,
}

#[fixture]
fn harness() -> Harness {
    let store = Arc::new(InMemoryMembershipStore::new());
    let service = GroupLifecycleService::new(
        Arc::clone(&store),
        Arc::new(DefaultClock),
        Arc::new(UuidCodeIssuer),
    );
    Harness { store, service }
}

fn mocked_service(store: &Arc<InMemoryMembershipStore>, issuer: MockCodeIssuer) -> MockedService {
    GroupLifecycleService::new(Arc::clone(store), Arc::new(DefaultClock), Arc::new(issuer))
}

fn code(value: &str) -> InviteCode {
    InviteCode::parse(value).expect("valid test code")
}

/// Inserts a group row holding the given invite code.
async fn seed_group_with_code(store: &InMemoryMembershipStore, value: &str) -> GroupId {
    let name = GroupName::new("Taken Code Group").expect("valid fixture name");
    let group = Group::new(name, code(value), &DefaultClock);
    let group_id = group.id();
    store
        .serialized::<(), StoreError, _>(move |tx| tx.insert_group(&group))
        .await
        .expect("seeding should succeed");
    group_id
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_group_bootstraps_creator_as_sole_admin(harness: Harness) {
    let creator = UserId::new();

    let group = harness
        .service
        .create_group("Physics 101", creator)
        .await
        .expect("creation should succeed");

    assert_eq!(group.name().as_str(), "Physics 101");
    assert_eq!(group.invite_code().as_str().len(), 8);
    assert!(group_exists(&harness.store, group.id()).await);
    assert_eq!(role_of(&harness.store, group.id(), creator).await, Some(Role::Admin));
    assert_eq!(member_count(&harness.store, group.id()).await, 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_group_rejects_short_name(harness: Harness) {
    let result = harness.service.create_group("  x  ", UserId::new()).await;

    assert!(matches!(
        result,
        Err(LifecycleError::Domain(GroupDomainError::NameTooShort))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_group_retries_after_invite_code_collision() {
    let store = Arc::new(InMemoryMembershipStore::new());
    seed_group_with_code(&store, "ABCDEFGH").await;

    let mut issuer = MockCodeIssuer::new();
    let mut seq = mockall::Sequence::new();
    issuer
        .expect_issue()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| code("ABCDEFGH"));
    issuer
        .expect_issue()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| code("JKLMNPQR"));
    let service = mocked_service(&store, issuer);

    let group = service
        .create_group("Chemistry", UserId::new())
        .await
        .expect("creation should succeed on the second attempt");

    assert_eq!(group.invite_code().as_str(), "JKLMNPQR");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_group_gives_up_after_bounded_collisions() {
    let store = Arc::new(InMemoryMembershipStore::new());
    seed_group_with_code(&store, "ABCDEFGH").await;

    let mut issuer = MockCodeIssuer::new();
    issuer.expect_issue().times(5).returning(|| code("ABCDEFGH"));
    let service = mocked_service(&store, issuer);

    let result = service.create_group("Chemistry", UserId::new()).await;

    assert!(matches!(result, Err(LifecycleError::CodeGenerationFailed)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn join_group_is_idempotent(harness: Harness) {
    let creator = UserId::new();
    let joiner = UserId::new();
    let group = harness
        .service
        .create_group("Biology", creator)
        .await
        .expect("creation should succeed");

    let first = harness
        .service
        .join_group(group.invite_code().as_str(), joiner)
        .await
        .expect("first join should succeed");
    let second = harness
        .service
        .join_group(group.invite_code().as_str(), joiner)
        .await
        .expect("repeated join should succeed");

    assert_eq!(first.group_id, group.id());
    assert!(!first.already_member);
    assert!(second.already_member);
    assert_eq!(member_count(&harness.store, group.id()).await, 2);
    assert_eq!(role_of(&harness.store, group.id(), joiner).await, Some(Role::Member));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn join_group_normalises_the_supplied_code(harness: Harness) {
    let creator = UserId::new();
    let joiner = UserId::new();
    let group = harness
        .service
        .create_group("Maths", creator)
        .await
        .expect("creation should succeed");

    let sloppy = format!("  {}  ", group.invite_code().as_str().to_ascii_lowercase());
    let outcome = harness
        .service
        .join_group(&sloppy, joiner)
        .await
        .expect("join with a sloppy code should succeed");

    assert_eq!(outcome.group_id, group.id());
}

#[rstest]
#[case::malformed("too-short")]
#[case::bad_alphabet("ABCD01IO")]
#[case::unknown("JKLMNPQR")]
#[tokio::test(flavor = "multi_thread")]
async fn join_group_rejects_bad_codes(harness: Harness, #[case] raw: &str) {
    let result = harness.service.join_group(raw, UserId::new()).await;

    assert!(matches!(result, Err(LifecycleError::InvalidCode)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_group_cascades_to_memberships_and_tasks(harness: Harness) {
    let admin = UserId::new();
    let member = UserId::new();
    let group = seed_group(&harness.store, admin, &[member]).await;
    let task = seed_assigned_task(&harness.store, group, member).await;

    harness
        .service
        .delete_group(group, admin)
        .await
        .expect("deletion should succeed");

    assert!(!group_exists(&harness.store, group).await);
    assert_eq!(member_count(&harness.store, group).await, 0);
    assert!(!task_exists(&harness.store, task).await);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_group_requires_the_admin(harness: Harness) {
    let admin = UserId::new();
    let member = UserId::new();
    let group = seed_group(&harness.store, admin, &[member]).await;

    let result = harness.service.delete_group(group, member).await;

    assert!(matches!(result, Err(LifecycleError::Forbidden)));
    assert!(group_exists(&harness.store, group).await);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_group_reports_unknown_group(harness: Harness) {
    let result = harness
        .service
        .delete_group(GroupId::new(), UserId::new())
        .await;

    assert!(matches!(result, Err(LifecycleError::GroupNotFound(_))));
}
