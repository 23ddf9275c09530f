//! To-do list aggregate.
//!
//! A list has a globally unique title and exactly one author fixed at
//! creation. Ownership is membership in the list's associated-user set,
//! which always contains the author.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::user::UserId;

/// Maximum allowed length for a list title, matching the column width.
pub const LIST_TITLE_MAX: usize = 255;

/// Validation errors returned by [`ListTitle::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListValidationError {
    EmptyTitle,
    TitleTooLong { max: usize },
}

impl fmt::Display for ListValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
        }
    }
}

impl std::error::Error for ListValidationError {}

/// Database-assigned list identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListId(i32);

impl ListId {
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated list title.
///
/// Titles are compared verbatim; `"Groceries"` and `"groceries"` are
/// distinct lists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ListTitle(String);

impl ListTitle {
    pub fn new(raw: impl Into<String>) -> Result<Self, ListValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ListValidationError::EmptyTitle);
        }
        if raw.chars().count() > LIST_TITLE_MAX {
            return Err(ListValidationError::TitleTooLong {
                max: LIST_TITLE_MAX,
            });
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for ListTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ListTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ListTitle> for String {
    fn from(value: ListTitle) -> Self {
        value.0
    }
}

impl TryFrom<String> for ListTitle {
    type Error = ListValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A persisted to-do list.
///
/// Serialises as `{"id", "title", "authorId"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoList {
    id: ListId,
    title: ListTitle,
    author_id: UserId,
}

impl TodoList {
    pub fn new(id: ListId, title: ListTitle, author_id: UserId) -> Self {
        Self {
            id,
            title,
            author_id,
        }
    }

    pub fn id(&self) -> ListId {
        self.id
    }

    pub fn title(&self) -> &ListTitle {
        &self.title
    }

    pub fn author_id(&self) -> UserId {
        self.author_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("", ListValidationError::EmptyTitle)]
    #[case("  ", ListValidationError::EmptyTitle)]
    fn blank_titles_are_rejected(#[case] raw: &str, #[case] expected: ListValidationError) {
        assert_eq!(ListTitle::new(raw), Err(expected));
    }

    #[rstest]
    fn overlong_titles_are_rejected() {
        let raw = "x".repeat(LIST_TITLE_MAX + 1);
        assert_eq!(
            ListTitle::new(raw),
            Err(ListValidationError::TitleTooLong {
                max: LIST_TITLE_MAX
            })
        );
    }

    #[rstest]
    fn list_serialises_in_camel_case() {
        let list = TodoList::new(
            ListId::new(4),
            ListTitle::new("Groceries").expect("valid title"),
            UserId::new(1),
        );
        assert_eq!(
            serde_json::to_value(&list).expect("serialise"),
            json!({ "id": 4, "title": "Groceries", "authorId": 1 })
        );
    }
}
