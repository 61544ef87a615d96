//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts keyed by normalised email.
    users (email) {
        email -> Varchar,
        name -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        skills -> Array<Text>,
        bio -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    projects (id) {
        id -> Int8,
        manager_email -> Varchar,
        name -> Varchar,
        description -> Text,
        required_skills -> Array<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Accepted invitations, one row per member.
    project_members (project_id, member_email) {
        project_id -> Int8,
        member_email -> Varchar,
        joined_at -> Timestamptz,
    }
}

diesel::table! {
    /// One invitation per project and receiver.
    invitations (project_id, receiver_email) {
        project_id -> Int8,
        receiver_email -> Varchar,
        /// `pending`, `accepted`, or `rejected`.
        status -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(invitations -> projects (project_id));
diesel::joinable!(project_members -> projects (project_id));
diesel::joinable!(project_members -> users (member_email));

diesel::allow_tables_to_appear_in_same_query!(invitations, project_members, projects, users);
