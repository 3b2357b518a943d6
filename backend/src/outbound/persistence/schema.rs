//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must match `backend/migrations` exactly; regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Posts, newest first via `(created_at DESC, id DESC)`.
    posts (id) {
        id -> Uuid,
        /// Identity provider user id of the author.
        author_id -> Varchar,
        /// 1 to 280 characters, enforced by a check constraint.
        content -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Directed follow edges: `follower_id` follows `following_id`.
    followers (follower_id, following_id) {
        follower_id -> Varchar,
        following_id -> Varchar,
        created_at -> Timestamptz,
    }
}
