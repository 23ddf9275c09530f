//! In-memory adapter implementing every repository port.
//!
//! Used when no database URL is configured and as the default backing store
//! in tests. One [`InMemoryStore`] value is cloned into each port so all
//! three repositories observe the same state. Uniqueness and foreign-key
//! rules mirror the PostgreSQL schema.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    ItemRepository, ItemRepositoryError, ListRepository, ListRepositoryError,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Item, ItemDetails, ItemId, ItemStatus, ListId, ListTitle, NewUser, TodoList, User, UserId,
    Username,
};

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<UserId, User>,
    lists: BTreeMap<ListId, TodoList>,
    members: BTreeSet<(UserId, ListId)>,
    items: BTreeMap<ItemId, Item>,
    last_user_id: i32,
    last_list_id: i32,
    last_item_id: i32,
}

/// Shared in-process store.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

const POISONED: &str = "in-memory store lock poisoned";

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, String> {
        self.state.lock().map_err(|_| POISONED.to_owned())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::query)?;
        if state.users.values().any(|u| u.username() == &user.username) {
            return Err(UserPersistenceError::duplicate_username(
                user.username.as_ref(),
            ));
        }
        state.last_user_id += 1;
        let id = UserId::new(state.last_user_id);
        let created = User::new(id, user.username.clone(), user.password_hash.clone());
        state.users.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(state
            .users
            .values()
            .find(|u| u.username() == username)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(state.users.get(&id).cloned())
    }
}

#[async_trait]
impl ListRepository for InMemoryStore {
    async fn insert(
        &self,
        title: &ListTitle,
        author: UserId,
    ) -> Result<TodoList, ListRepositoryError> {
        let mut state = self.lock().map_err(ListRepositoryError::query)?;
        if !state.users.contains_key(&author) {
            return Err(ListRepositoryError::missing_reference(format!(
                "user {author} does not exist"
            )));
        }
        if state.lists.values().any(|l| l.title() == title) {
            return Err(ListRepositoryError::duplicate_title(title.as_ref()));
        }
        state.last_list_id += 1;
        let id = ListId::new(state.last_list_id);
        let list = TodoList::new(id, title.clone(), author);
        state.lists.insert(id, list.clone());
        state.members.insert((author, id));
        Ok(list)
    }

    async fn find_by_id(&self, id: ListId) -> Result<Option<TodoList>, ListRepositoryError> {
        let state = self.lock().map_err(ListRepositoryError::query)?;
        Ok(state.lists.get(&id).cloned())
    }

    async fn find_by_title(
        &self,
        title: &ListTitle,
    ) -> Result<Option<TodoList>, ListRepositoryError> {
        let state = self.lock().map_err(ListRepositoryError::query)?;
        Ok(state.lists.values().find(|l| l.title() == title).cloned())
    }

    async fn lists_of_user(&self, user: UserId) -> Result<Vec<TodoList>, ListRepositoryError> {
        let state = self.lock().map_err(ListRepositoryError::query)?;
        Ok(state
            .members
            .range((user, ListId::new(i32::MIN))..=(user, ListId::new(i32::MAX)))
            .filter_map(|(_, list_id)| state.lists.get(list_id).cloned())
            .collect())
    }

    async fn add_member(&self, list: ListId, user: UserId) -> Result<(), ListRepositoryError> {
        let mut state = self.lock().map_err(ListRepositoryError::query)?;
        if !state.lists.contains_key(&list) || !state.users.contains_key(&user) {
            return Err(ListRepositoryError::missing_reference(format!(
                "list {list} or user {user} does not exist"
            )));
        }
        state.members.insert((user, list));
        Ok(())
    }
}

#[async_trait]
impl ItemRepository for InMemoryStore {
    async fn insert(&self, list: ListId, details: &ItemDetails) -> Result<Item, ItemRepositoryError> {
        let mut state = self.lock().map_err(ItemRepositoryError::query)?;
        if !state.lists.contains_key(&list) {
            return Err(ItemRepositoryError::missing_reference(format!(
                "list {list} does not exist"
            )));
        }
        state.last_item_id += 1;
        let id = ItemId::new(state.last_item_id);
        let item = Item::new(id, Some(list), details.clone());
        state.items.insert(id, item.clone());
        Ok(item)
    }

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, ItemRepositoryError> {
        let state = self.lock().map_err(ItemRepositoryError::query)?;
        Ok(state.items.get(&id).cloned())
    }

    async fn items_of_list(&self, list: ListId) -> Result<Vec<Item>, ItemRepositoryError> {
        let state = self.lock().map_err(ItemRepositoryError::query)?;
        Ok(state
            .items
            .values()
            .filter(|item| item.list_id() == Some(list))
            .cloned()
            .collect())
    }

    async fn assign_to_list(&self, item: ItemId, list: ListId) -> Result<bool, ItemRepositoryError> {
        let mut state = self.lock().map_err(ItemRepositoryError::query)?;
        if !state.lists.contains_key(&list) {
            return Err(ItemRepositoryError::missing_reference(format!(
                "list {list} does not exist"
            )));
        }
        let Some(existing) = state.items.get_mut(&item) else {
            return Ok(false);
        };
        *existing = Item::new(item, Some(list), existing.details().clone());
        Ok(true)
    }

    async fn update(
        &self,
        id: ItemId,
        details: &ItemDetails,
    ) -> Result<Option<Item>, ItemRepositoryError> {
        let mut state = self.lock().map_err(ItemRepositoryError::query)?;
        Ok(state.items.get_mut(&id).map(|existing| {
            *existing = Item::new(id, existing.list_id(), details.clone());
            existing.clone()
        }))
    }

    async fn update_status(
        &self,
        id: ItemId,
        status: ItemStatus,
    ) -> Result<Option<Item>, ItemRepositoryError> {
        let mut state = self.lock().map_err(ItemRepositoryError::query)?;
        Ok(state.items.get_mut(&id).map(|existing| {
            let details = existing.details().clone().with_status(status);
            *existing = Item::new(id, existing.list_id(), details);
            existing.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PasswordHash;
    use chrono::NaiveDate;
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> InMemoryStore {
        InMemoryStore::new()
    }

    async fn add_user(store: &InMemoryStore, name: &str) -> User {
        UserRepository::insert(
            store,
            &NewUser {
                username: Username::new(name).expect("valid username"),
                password_hash: PasswordHash::new("hash"),
            },
        )
        .await
        .expect("insert user")
    }

    fn details(title: &str) -> ItemDetails {
        let deadline = NaiveDate::from_ymd_opt(2030, 6, 1).expect("valid date");
        ItemDetails::try_new(title, "desc", deadline, ItemStatus::Active).expect("valid details")
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_usernames_are_rejected(store: InMemoryStore) {
        add_user(&store, "alice").await;
        let err = UserRepository::insert(
            &store,
            &NewUser {
                username: Username::new("alice").expect("valid username"),
                password_hash: PasswordHash::new("other"),
            },
        )
        .await
        .expect_err("duplicate must fail");
        assert!(matches!(err, UserPersistenceError::DuplicateUsername { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn list_insert_records_author_membership(store: InMemoryStore) {
        let alice = add_user(&store, "alice").await;
        let title = ListTitle::new("Groceries").expect("valid title");
        let list = ListRepository::insert(&store, &title, alice.id())
            .await
            .expect("insert list");

        let lists = store.lists_of_user(alice.id()).await.expect("lists");
        assert_eq!(lists, vec![list]);
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_titles_are_rejected(store: InMemoryStore) {
        let alice = add_user(&store, "alice").await;
        let title = ListTitle::new("Groceries").expect("valid title");
        ListRepository::insert(&store, &title, alice.id())
            .await
            .expect("insert list");
        let err = ListRepository::insert(&store, &title, alice.id())
            .await
            .expect_err("duplicate must fail");
        assert!(matches!(err, ListRepositoryError::DuplicateTitle { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn add_member_is_idempotent(store: InMemoryStore) {
        let alice = add_user(&store, "alice").await;
        let bob = add_user(&store, "bob").await;
        let title = ListTitle::new("Chores").expect("valid title");
        let list = ListRepository::insert(&store, &title, alice.id())
            .await
            .expect("insert list");

        store.add_member(list.id(), bob.id()).await.expect("share");
        store.add_member(list.id(), bob.id()).await.expect("share again");

        assert_eq!(store.lists_of_user(bob.id()).await.expect("lists").len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn add_member_rejects_unknown_user(store: InMemoryStore) {
        let alice = add_user(&store, "alice").await;
        let title = ListTitle::new("Chores").expect("valid title");
        let list = ListRepository::insert(&store, &title, alice.id())
            .await
            .expect("insert list");
        let err = store
            .add_member(list.id(), UserId::new(99))
            .await
            .expect_err("unknown user");
        assert!(matches!(err, ListRepositoryError::MissingReference { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn item_updates_keep_list_and_id(store: InMemoryStore) {
        let alice = add_user(&store, "alice").await;
        let title = ListTitle::new("Groceries").expect("valid title");
        let list = ListRepository::insert(&store, &title, alice.id())
            .await
            .expect("insert list");
        let item = ItemRepository::insert(&store, list.id(), &details("Milk"))
            .await
            .expect("insert item");

        let updated = store
            .update(item.id(), &details("Oat milk"))
            .await
            .expect("update")
            .expect("item exists");
        assert_eq!(updated.id(), item.id());
        assert_eq!(updated.list_id(), Some(list.id()));
        assert_eq!(updated.details().title().as_ref(), "Oat milk");

        let done = store
            .update_status(item.id(), ItemStatus::Done)
            .await
            .expect("status")
            .expect("item exists");
        assert_eq!(done.details().status(), ItemStatus::Done);
        assert_eq!(done.details().title().as_ref(), "Oat milk");
    }

    #[rstest]
    #[tokio::test]
    async fn updates_of_missing_items_return_none(store: InMemoryStore) {
        let missing = ItemId::new(42);
        assert!(store.update(missing, &details("x")).await.expect("ok").is_none());
        assert!(
            store
                .update_status(missing, ItemStatus::Cancelled)
                .await
                .expect("ok")
                .is_none()
        );
        assert!(
            !store
                .assign_to_list(missing, ListId::new(1))
                .await
                .unwrap_or(false)
        );
    }
}
