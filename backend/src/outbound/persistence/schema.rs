//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// User accounts table.
    users (id) {
        /// Primary key, assigned by the database.
        id -> Int8,
        /// Display name.
        name -> Varchar,
        /// Email address, unique across accounts.
        email -> Varchar,
        /// Hex-encoded password digest.
        password_digest -> Varchar,
        /// Account role: `student` or `admin`.
        role -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Complaints table.
    complaints (id) {
        /// Primary key, assigned by the database.
        id -> Int8,
        /// Owning user id.
        owner_id -> Int8,
        /// Fault category.
        category -> Varchar,
        /// Free-text description.
        description -> Text,
        /// Urgency.
        priority -> Varchar,
        /// Workflow status.
        status -> Varchar,
        /// Stored attachment reference, when one was supplied.
        attachment_ref -> Nullable<Varchar>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Refreshed on every status change.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(complaints -> users (owner_id));
diesel::allow_tables_to_appear_in_same_query!(complaints, users);
