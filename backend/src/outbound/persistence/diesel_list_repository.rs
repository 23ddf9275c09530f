//! PostgreSQL-backed `ListRepository` implementation.
//!
//! List creation writes the `lists` row and the author's `user_lists` row in
//! one transaction so a list never exists without its author as a member.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};

use crate::domain::ports::{ListRepository, ListRepositoryError};
use crate::domain::{ListId, ListTitle, TodoList, UserId};

use super::diesel_error_mapping::DieselFailure;
use super::models::{ListRow, MembershipRow, NewListRow};
use super::pool::{DbPool, PoolError};
use super::schema::{lists, user_lists};

const TITLE_UNIQUE: &str = "lists_title_key";

#[derive(Clone)]
pub struct DieselListRepository {
    pool: DbPool,
}

impl DieselListRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ListRepositoryError {
    ListRepositoryError::connection(error.into_message())
}

fn map_failure(failure: DieselFailure) -> ListRepositoryError {
    match failure {
        DieselFailure::Connection { message } => ListRepositoryError::connection(message),
        DieselFailure::ForeignKeyViolation { message } => {
            ListRepositoryError::missing_reference(message)
        }
        other => ListRepositoryError::query(other.message()),
    }
}

fn row_to_list(row: ListRow) -> Result<TodoList, ListRepositoryError> {
    let title = ListTitle::new(row.title).map_err(|err| {
        ListRepositoryError::query(format!("stored title for list {} is invalid: {err}", row.id))
    })?;
    Ok(TodoList::new(
        ListId::new(row.id),
        title,
        UserId::new(row.author_id),
    ))
}

fn rows_to_lists(rows: Vec<ListRow>) -> Result<Vec<TodoList>, ListRepositoryError> {
    rows.into_iter().map(row_to_list).collect()
}

#[async_trait]
impl ListRepository for DieselListRepository {
    async fn insert(
        &self,
        title: &ListTitle,
        author: UserId,
    ) -> Result<TodoList, ListRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewListRow {
            title: title.as_ref(),
            author_id: author.get(),
        };

        let row: ListRow = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let row: ListRow = diesel::insert_into(lists::table)
                        .values(&new_row)
                        .returning(ListRow::as_returning())
                        .get_result(conn)
                        .await?;
                    diesel::insert_into(user_lists::table)
                        .values(&MembershipRow {
                            user_id: row.author_id,
                            list_id: row.id,
                        })
                        .execute(conn)
                        .await?;
                    Ok(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| {
                let failure = DieselFailure::classify(err, "insert list");
                if failure.violates_unique(TITLE_UNIQUE) {
                    ListRepositoryError::duplicate_title(title.as_ref())
                } else {
                    map_failure(failure)
                }
            })?;

        row_to_list(row)
    }

    async fn find_by_id(&self, id: ListId) -> Result<Option<TodoList>, ListRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ListRow> = lists::table
            .find(id.get())
            .select(ListRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_failure(DieselFailure::classify(err, "find list by id")))?;

        row.map(row_to_list).transpose()
    }

    async fn find_by_title(
        &self,
        title: &ListTitle,
    ) -> Result<Option<TodoList>, ListRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ListRow> = lists::table
            .filter(lists::title.eq(title.as_ref()))
            .select(ListRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_failure(DieselFailure::classify(err, "find list by title")))?;

        row.map(row_to_list).transpose()
    }

    async fn lists_of_user(&self, user: UserId) -> Result<Vec<TodoList>, ListRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ListRow> = user_lists::table
            .inner_join(lists::table)
            .filter(user_lists::user_id.eq(user.get()))
            .order_by(lists::id)
            .select(ListRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_failure(DieselFailure::classify(err, "load lists of user")))?;

        rows_to_lists(rows)
    }

    async fn add_member(&self, list: ListId, user: UserId) -> Result<(), ListRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(user_lists::table)
            .values(&MembershipRow {
                user_id: user.get(),
                list_id: list.get(),
            })
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_failure(DieselFailure::classify(err, "add list member")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn foreign_key_failures_are_missing_references() {
        let err = map_failure(DieselFailure::ForeignKeyViolation {
            message: "user_lists_user_id_fkey".to_owned(),
        });
        assert!(matches!(err, ListRepositoryError::MissingReference { .. }));
    }

    #[rstest]
    fn blank_stored_titles_are_query_errors() {
        let err = row_to_list(ListRow {
            id: 1,
            title: String::new(),
            author_id: 1,
        })
        .expect_err("blank title");
        assert!(matches!(err, ListRepositoryError::Query { .. }));
    }

    #[rstest]
    fn rows_convert_in_order() {
        let lists = rows_to_lists(vec![
            ListRow {
                id: 1,
                title: "Groceries".to_owned(),
                author_id: 2,
            },
            ListRow {
                id: 5,
                title: "Chores".to_owned(),
                author_id: 3,
            },
        ])
        .expect("valid rows");
        let ids: Vec<_> = lists.iter().map(TodoList::id).collect();
        assert_eq!(ids, vec![ListId::new(1), ListId::new(5)]);
        assert_eq!(lists[1].author_id(), UserId::new(3));
    }
}
