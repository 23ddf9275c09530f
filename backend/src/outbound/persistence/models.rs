//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::NaiveDate;
use diesel::prelude::*;

use super::schema::{items, lists, user_lists, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = lists)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ListRow {
    pub id: i32,
    pub title: String,
    pub author_id: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = lists)]
pub(crate) struct NewListRow<'a> {
    pub title: &'a str,
    pub author_id: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_lists)]
pub(crate) struct MembershipRow {
    pub user_id: i32,
    pub list_id: i32,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ItemRow {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub deadline: NaiveDate,
    pub status: String,
    pub list_id: Option<i32>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = items)]
pub(crate) struct NewItemRow<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub deadline: NaiveDate,
    pub status: &'a str,
    pub list_id: i32,
}

/// Full replace of the mutable item columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = items)]
pub(crate) struct ItemUpdate<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub deadline: NaiveDate,
    pub status: &'a str,
}
