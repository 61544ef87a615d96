//! Internal Diesel row structs.
//!
//! These never leave the persistence module; repositories convert them into
//! domain types.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{invitations, project_members, projects, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub skills: Vec<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub password_hash: &'a str,
    pub skills: &'a [String],
    pub bio: Option<&'a str>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProjectRow {
    pub id: i64,
    pub manager_email: String,
    pub name: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// `id` is left to the `BIGSERIAL` default.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = projects)]
pub(crate) struct NewProjectRow<'a> {
    pub manager_email: &'a str,
    pub name: &'a str,
    pub description: &'a str,
    pub required_skills: &'a [String],
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = project_members)]
pub(crate) struct NewMemberRow<'a> {
    pub project_id: i64,
    pub member_email: &'a str,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = invitations)]
pub(crate) struct NewInvitationRow<'a> {
    pub project_id: i64,
    pub receiver_email: &'a str,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Invitation joined with its project, as listed for the receiver.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct InvitationListingRow {
    pub project_id: i64,
    pub project_name: String,
    pub manager_email: String,
    pub receiver_email: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
