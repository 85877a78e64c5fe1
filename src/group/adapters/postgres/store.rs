//! `PostgreSQL` membership store implementation.

use super::{
    models::{GroupRow, MembershipRow, TaskRow, UserRow},
    schema::{group_members, groups, tasks, users},
};
use crate::group::{
    domain::{
        Group, GroupId, GroupName, InviteCode, Membership, PersistedGroupData, Role, User, UserId,
    },
    ports::{MembershipStore, StoreError, StoreTx, TxResult},
};
use crate::task::domain::{PersistedTaskData, Priority, Task, TaskId, TaskStatus, TaskTitle};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by the membership store.
pub type MembershipPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed membership store.
///
/// Each [`MembershipStore::serialized`] call runs its closure inside a
/// `SERIALIZABLE` transaction on a pooled connection; concurrent compound
/// mutations on the same group therefore serialize at the database, which
/// is what carries the single-admin invariant.
#[derive(Debug, Clone)]
pub struct PostgresMembershipStore {
    pool: MembershipPgPool,
}

impl PostgresMembershipStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: MembershipPgPool) -> Self {
        Self { pool }
    }
}

/// Discriminates closure errors from transaction-machinery errors inside
/// the Diesel `run` callback, which requires `From<diesel::result::Error>`.
enum TxError<E> {
    App(E),
    Diesel(DieselError),
}

impl<E> From<DieselError> for TxError<E> {
    fn from(err: DieselError) -> Self {
        Self::Diesel(err)
    }
}

#[async_trait]
impl MembershipStore for PostgresMembershipStore {
    async fn serialized<T, E, F>(&self, f: F) -> Result<T, E>
    where
        T: Send + 'static,
        E: From<StoreError> + Send + 'static,
        F: FnOnce(&mut dyn StoreTx) -> Result<T, E> + Send + 'static,
    {
        let pool = self.pool.clone();
        let joined = tokio::task::spawn_blocking(move || {
            let mut connection = pool
                .get()
                .map_err(|err| E::from(StoreError::backend(err)))?;

            let outcome: Result<T, TxError<E>> = connection
                .build_transaction()
                .serializable()
                .run(|conn| f(&mut PgStoreTx { conn }).map_err(TxError::App));

            outcome.map_err(|err| match err {
                TxError::App(app) => app,
                TxError::Diesel(diesel_err) => E::from(StoreError::backend(diesel_err)),
            })
        })
        .await;

        match joined {
            Ok(result) => result,
            Err(join_err) => Err(E::from(StoreError::backend(join_err))),
        }
    }
}

/// Transaction handle over a live `PostgreSQL` connection.
struct PgStoreTx<'a> {
    conn: &'a mut PgConnection,
}

impl StoreTx for PgStoreTx<'_> {
    fn insert_group(&mut self, group: &Group) -> TxResult<()> {
        let row = group_to_row(group);
        diesel::insert_into(groups::table)
            .values(&row)
            .execute(self.conn)
            .map_err(|err| match err {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                    if is_invite_code_violation(info.as_ref()) =>
                {
                    StoreError::DuplicateInviteCode(group.invite_code().clone())
                }
                other => StoreError::backend(other),
            })?;
        Ok(())
    }

    fn group(&mut self, id: GroupId) -> TxResult<Option<Group>> {
        let row = groups::table
            .filter(groups::id.eq(id.into_inner()))
            .select(GroupRow::as_select())
            .first::<GroupRow>(self.conn)
            .optional()
            .map_err(StoreError::backend)?;
        row.map(row_to_group).transpose()
    }

    fn group_by_invite_code(&mut self, code: &InviteCode) -> TxResult<Option<Group>> {
        let row = groups::table
            .filter(groups::invite_code.eq(code.as_str()))
            .select(GroupRow::as_select())
            .first::<GroupRow>(self.conn)
            .optional()
            .map_err(StoreError::backend)?;
        row.map(row_to_group).transpose()
    }

    fn delete_group(&mut self, id: GroupId) -> TxResult<()> {
        // Explicit child deletes keep the cascade visible here instead of
        // depending on migration-defined foreign keys.
        diesel::delete(tasks::table.filter(tasks::group_id.eq(id.into_inner())))
            .execute(self.conn)
            .map_err(StoreError::backend)?;
        diesel::delete(group_members::table.filter(group_members::group_id.eq(id.into_inner())))
            .execute(self.conn)
            .map_err(StoreError::backend)?;
        let deleted = diesel::delete(groups::table.filter(groups::id.eq(id.into_inner())))
            .execute(self.conn)
            .map_err(StoreError::backend)?;
        if deleted == 0 {
            return Err(StoreError::GroupNotFound(id));
        }
        Ok(())
    }

    fn insert_membership(&mut self, membership: &Membership) -> TxResult<()> {
        let row = membership_to_row(membership);
        diesel::insert_into(group_members::table)
            .values(&row)
            .execute(self.conn)
            .map_err(|err| match err {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    StoreError::DuplicateMembership {
                        group: membership.group_id(),
                        user: membership.user_id(),
                    }
                }
                other => StoreError::backend(other),
            })?;
        Ok(())
    }

    fn membership(&mut self, group: GroupId, user: UserId) -> TxResult<Option<Membership>> {
        let row = group_members::table
            .filter(group_members::group_id.eq(group.into_inner()))
            .filter(group_members::user_id.eq(user.into_inner()))
            .select(MembershipRow::as_select())
            .first::<MembershipRow>(self.conn)
            .optional()
            .map_err(StoreError::backend)?;
        row.map(row_to_membership).transpose()
    }

    fn list_memberships(&mut self, group: GroupId) -> TxResult<Vec<Membership>> {
        let rows = group_members::table
            .filter(group_members::group_id.eq(group.into_inner()))
            .order((group_members::role.asc(), group_members::joined_at.asc()))
            .select(MembershipRow::as_select())
            .load::<MembershipRow>(self.conn)
            .map_err(StoreError::backend)?;
        rows.into_iter().map(row_to_membership).collect()
    }

    fn set_role(&mut self, group: GroupId, user: UserId, role: Role) -> TxResult<()> {
        let changed = diesel::update(
            group_members::table
                .filter(group_members::group_id.eq(group.into_inner()))
                .filter(group_members::user_id.eq(user.into_inner())),
        )
        .set(group_members::role.eq(role.as_str()))
        .execute(self.conn)
        .map_err(StoreError::backend)?;
        if changed == 0 {
            return Err(StoreError::MembershipNotFound { group, user });
        }
        Ok(())
    }

    fn demote_admins(&mut self, group: GroupId) -> TxResult<usize> {
        diesel::update(
            group_members::table
                .filter(group_members::group_id.eq(group.into_inner()))
                .filter(group_members::role.eq(Role::Admin.as_str())),
        )
        .set(group_members::role.eq(Role::Member.as_str()))
        .execute(self.conn)
        .map_err(StoreError::backend)
    }

    fn delete_membership(&mut self, group: GroupId, user: UserId) -> TxResult<()> {
        let deleted = diesel::delete(
            group_members::table
                .filter(group_members::group_id.eq(group.into_inner()))
                .filter(group_members::user_id.eq(user.into_inner())),
        )
        .execute(self.conn)
        .map_err(StoreError::backend)?;
        if deleted == 0 {
            return Err(StoreError::MembershipNotFound { group, user });
        }
        Ok(())
    }

    fn insert_user(&mut self, user: &User) -> TxResult<()> {
        let row = user_to_row(user);
        diesel::insert_into(users::table)
            .values(&row)
            .execute(self.conn)
            .map_err(StoreError::backend)?;
        Ok(())
    }

    fn user(&mut self, id: UserId) -> TxResult<Option<User>> {
        let row = users::table
            .filter(users::id.eq(id.into_inner()))
            .select(UserRow::as_select())
            .first::<UserRow>(self.conn)
            .optional()
            .map_err(StoreError::backend)?;
        Ok(row.map(row_to_user))
    }

    fn insert_task(&mut self, task: &Task) -> TxResult<()> {
        let row = task_to_row(task);
        diesel::insert_into(tasks::table)
            .values(&row)
            .execute(self.conn)
            .map_err(StoreError::backend)?;
        Ok(())
    }

    fn task(&mut self, id: TaskId) -> TxResult<Option<Task>> {
        let row = tasks::table
            .filter(tasks::id.eq(id.into_inner()))
            .select(TaskRow::as_select())
            .first::<TaskRow>(self.conn)
            .optional()
            .map_err(StoreError::backend)?;
        row.map(row_to_task).transpose()
    }

    fn update_task(&mut self, task: &Task) -> TxResult<()> {
        let changed = diesel::update(tasks::table.filter(tasks::id.eq(task.id().into_inner())))
            .set((
                tasks::title.eq(task.title().as_str()),
                tasks::description.eq(task.description()),
                tasks::priority.eq(task.priority().value()),
                tasks::status.eq(task.status().as_str()),
                tasks::due_at.eq(task.due_at()),
                tasks::assignee_id.eq(task.assignee().map(UserId::into_inner)),
                tasks::updated_at.eq(task.updated_at()),
            ))
            .execute(self.conn)
            .map_err(StoreError::backend)?;
        if changed == 0 {
            return Err(StoreError::TaskNotFound(task.id()));
        }
        Ok(())
    }

    fn delete_task(&mut self, id: TaskId) -> TxResult<()> {
        let deleted = diesel::delete(tasks::table.filter(tasks::id.eq(id.into_inner())))
            .execute(self.conn)
            .map_err(StoreError::backend)?;
        if deleted == 0 {
            return Err(StoreError::TaskNotFound(id));
        }
        Ok(())
    }

    fn list_tasks(&mut self, group: GroupId) -> TxResult<Vec<Task>> {
        let rows = tasks::table
            .filter(tasks::group_id.eq(group.into_inner()))
            .order(tasks::created_at.desc())
            .select(TaskRow::as_select())
            .load::<TaskRow>(self.conn)
            .map_err(StoreError::backend)?;
        rows.into_iter().map(row_to_task).collect()
    }

    fn clear_assignments(&mut self, group: GroupId, user: UserId) -> TxResult<usize> {
        diesel::update(
            tasks::table
                .filter(tasks::group_id.eq(group.into_inner()))
                .filter(tasks::assignee_id.eq(user.into_inner())),
        )
        .set(tasks::assignee_id.eq(None::<uuid::Uuid>))
        .execute(self.conn)
        .map_err(StoreError::backend)
    }
}

fn is_invite_code_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == "groups_invite_code_key")
}

fn group_to_row(group: &Group) -> GroupRow {
    GroupRow {
        id: group.id().into_inner(),
        name: group.name().as_str().to_owned(),
        invite_code: group.invite_code().as_str().to_owned(),
        created_at: group.created_at(),
    }
}

fn row_to_group(row: GroupRow) -> TxResult<Group> {
    let name = GroupName::new(row.name).map_err(StoreError::backend)?;
    let invite_code = InviteCode::parse(row.invite_code).map_err(StoreError::backend)?;
    Ok(Group::from_persisted(PersistedGroupData {
        id: GroupId::from_uuid(row.id),
        name,
        invite_code,
        created_at: row.created_at,
    }))
}

fn membership_to_row(membership: &Membership) -> MembershipRow {
    MembershipRow {
        group_id: membership.group_id().into_inner(),
        user_id: membership.user_id().into_inner(),
        role: membership.role().as_str().to_owned(),
        joined_at: membership.joined_at(),
    }
}

fn row_to_membership(row: MembershipRow) -> TxResult<Membership> {
    let role = Role::try_from(row.role.as_str()).map_err(StoreError::backend)?;
    Ok(Membership::from_persisted(
        GroupId::from_uuid(row.group_id),
        UserId::from_uuid(row.user_id),
        role,
        row.joined_at,
    ))
}

fn user_to_row(user: &User) -> UserRow {
    UserRow {
        id: user.id().into_inner(),
        email: user.email().to_owned(),
        display_name: user.display_name().map(ToOwned::to_owned),
        display_tag: user.display_tag().map(ToOwned::to_owned),
    }
}

fn row_to_user(row: UserRow) -> User {
    User::from_persisted(
        UserId::from_uuid(row.id),
        row.email,
        row.display_name,
        row.display_tag,
    )
}

fn task_to_row(task: &Task) -> TaskRow {
    TaskRow {
        id: task.id().into_inner(),
        group_id: task.group_id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().map(ToOwned::to_owned),
        priority: task.priority().value(),
        status: task.status().as_str().to_owned(),
        due_at: task.due_at(),
        assignee_id: task.assignee().map(UserId::into_inner),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn row_to_task(row: TaskRow) -> TxResult<Task> {
    let title = TaskTitle::new(row.title).map_err(StoreError::backend)?;
    let priority = Priority::try_from(row.priority).map_err(StoreError::backend)?;
    let status = TaskStatus::try_from(row.status.as_str()).map_err(StoreError::backend)?;
    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(row.id),
        group_id: GroupId::from_uuid(row.group_id),
        title,
        description: row.description,
        priority,
        status,
        due_at: row.due_at,
        assignee: row.assignee_id.map(UserId::from_uuid),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}
