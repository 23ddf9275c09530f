//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered users. `username` is unique.
    users (id) {
        id -> Int4,
        username -> Varchar,
        /// Argon2 PHC hash, never the plaintext.
        password -> Varchar,
    }
}

diesel::table! {
    /// To-do lists. `title` is unique across all users.
    lists (id) {
        id -> Int4,
        title -> Varchar,
        author_id -> Int4,
    }
}

diesel::table! {
    /// Membership join table: a row grants the user edit rights on the list.
    user_lists (user_id, list_id) {
        user_id -> Int4,
        list_id -> Int4,
    }
}

diesel::table! {
    /// List items. `status` is constrained to active/done/cancelled.
    items (id) {
        id -> Int4,
        title -> Varchar,
        description -> Text,
        deadline -> Date,
        status -> Varchar,
        list_id -> Nullable<Int4>,
    }
}

diesel::joinable!(lists -> users (author_id));
diesel::joinable!(user_lists -> users (user_id));
diesel::joinable!(user_lists -> lists (list_id));
diesel::joinable!(items -> lists (list_id));

diesel::allow_tables_to_appear_in_same_query!(users, lists, user_lists, items);
