//! Row types mapping Diesel query results onto the domain model.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{complaints, users};

/// Read row for the `users` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_digest: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert row for the `users` table.
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_digest: &'a str,
    pub role: &'a str,
}

/// Read row for the `complaints` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = complaints)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ComplaintRow {
    pub id: i64,
    pub owner_id: i64,
    pub category: String,
    pub description: String,
    pub priority: String,
    pub status: String,
    pub attachment_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert row for the `complaints` table.
#[derive(Debug, Insertable)]
#[diesel(table_name = complaints)]
pub struct NewComplaintRow<'a> {
    pub owner_id: i64,
    pub category: &'a str,
    pub description: &'a str,
    pub priority: &'a str,
    pub status: &'a str,
    pub attachment_ref: Option<&'a str>,
}
