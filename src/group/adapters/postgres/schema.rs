//! Diesel schema for membership persistence.
//!
//! The migrations additionally declare `ON DELETE CASCADE` foreign keys
//! from `group_members` and `tasks` to `groups`, and a partial unique index
//! `idx_group_members_single_admin` on `group_members (group_id) WHERE role
//! = 'admin'`, so the database refuses a second admin row even if a write
//! path bypasses the transaction discipline.

diesel::table! {
    /// User identity records.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Login email, unique.
        #[max_length = 255]
        email -> Varchar,
        /// Optional display name.
        #[max_length = 255]
        display_name -> Nullable<Varchar>,
        /// Optional cosmetic display tag.
        #[max_length = 64]
        display_tag -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Group records.
    groups (id) {
        /// Group identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Join token, unique.
        #[max_length = 8]
        invite_code -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Membership rows; composite primary key (group, user).
    group_members (group_id, user_id) {
        /// Owning group.
        group_id -> Uuid,
        /// Member user.
        user_id -> Uuid,
        /// Membership role, `admin` or `member`.
        #[max_length = 16]
        role -> Varchar,
        /// Join timestamp.
        joined_at -> Timestamptz,
    }
}

diesel::table! {
    /// Group task records.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning group.
        group_id -> Uuid,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional free-text description.
        description -> Nullable<Text>,
        /// Priority on the 1–3 scale.
        priority -> SmallInt,
        /// Workflow status.
        #[max_length = 16]
        status -> Varchar,
        /// Optional due date.
        due_at -> Nullable<Timestamptz>,
        /// Optional assignee; references a membership of the same group.
        assignee_id -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(group_members -> groups (group_id));
diesel::joinable!(group_members -> users (user_id));
diesel::joinable!(tasks -> groups (group_id));

diesel::allow_tables_to_appear_in_same_query!(users, groups, group_members, tasks);
