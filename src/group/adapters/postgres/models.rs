//! Diesel row models for membership persistence.

use super::schema::{group_members, groups, tasks, users};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Row model for user records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// User identifier.
    pub id: uuid::Uuid,
    /// Login email.
    pub email: String,
    /// Optional display name.
    pub display_name: Option<String>,
    /// Optional display tag.
    pub display_tag: Option<String>,
}

/// Row model for group records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = groups)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GroupRow {
    /// Group identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Join token.
    pub invite_code: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Row model for membership records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = group_members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MembershipRow {
    /// Owning group.
    pub group_id: uuid::Uuid,
    /// Member user.
    pub user_id: uuid::Uuid,
    /// Membership role.
    pub role: String,
    /// Join timestamp.
    pub joined_at: DateTime<Utc>,
}

/// Row model for task records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning group.
    pub group_id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Priority on the 1–3 scale.
    pub priority: i16,
    /// Workflow status.
    pub status: String,
    /// Optional due date.
    pub due_at: Option<DateTime<Utc>>,
    /// Optional assignee.
    pub assignee_id: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
