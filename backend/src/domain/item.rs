//! To-do items and their tri-state status.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::list::ListId;

/// Maximum allowed length for an item title.
pub const ITEM_TITLE_MAX: usize = 100;

/// Validation errors raised while building [`ItemDetails`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    EmptyTitle,
    TitleTooLong { max: usize },
    EmptyDescription,
    UnknownStatus { value: String },
}

impl fmt::Display for ItemValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::EmptyDescription => write!(f, "description must not be empty"),
            Self::UnknownStatus { value } => write!(
                f,
                "status must be one of active, done or cancelled (got {value:?})"
            ),
        }
    }
}

impl std::error::Error for ItemValidationError {}

/// Database-assigned item identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(i32);

impl ItemId {
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Item lifecycle state.
///
/// Every state may move to any other, including itself.
///
/// # Examples
/// ```
/// use todo_backend::domain::ItemStatus;
///
/// let status: ItemStatus = "done".parse().unwrap();
/// assert_eq!(status, ItemStatus::Done);
/// assert_eq!(ItemStatus::default(), ItemStatus::Active);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Active,
    Done,
    Cancelled,
}

impl ItemStatus {
    pub const ALL: [ItemStatus; 3] = [Self::Active, Self::Done, Self::Cancelled];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Done => "done",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = ItemValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ItemValidationError::UnknownStatus {
                value: s.to_owned(),
            })
    }
}

/// Validated item title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ItemTitle(String);

impl ItemTitle {
    pub fn new(raw: impl Into<String>) -> Result<Self, ItemValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ItemValidationError::EmptyTitle);
        }
        if raw.chars().count() > ITEM_TITLE_MAX {
            return Err(ItemValidationError::TitleTooLong {
                max: ITEM_TITLE_MAX,
            });
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for ItemTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ItemTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The four mutable item fields. Used both for creation and full updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDetails {
    title: ItemTitle,
    description: String,
    deadline: NaiveDate,
    status: ItemStatus,
}

impl ItemDetails {
    /// Validate raw field values.
    pub fn try_new(
        title: impl Into<String>,
        description: impl Into<String>,
        deadline: NaiveDate,
        status: ItemStatus,
    ) -> Result<Self, ItemValidationError> {
        let title = ItemTitle::new(title)?;
        let description = description.into();
        if description.trim().is_empty() {
            return Err(ItemValidationError::EmptyDescription);
        }
        Ok(Self {
            title,
            description,
            deadline,
            status,
        })
    }

    pub fn title(&self) -> &ItemTitle {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn deadline(&self) -> NaiveDate {
        self.deadline
    }

    pub fn status(&self) -> ItemStatus {
        self.status
    }

    /// Copy of these details with a different status.
    #[must_use]
    pub fn with_status(mut self, status: ItemStatus) -> Self {
        self.status = status;
        self
    }
}

/// A persisted item.
///
/// Serialises flat as
/// `{"id", "title", "description", "deadline", "status", "listId"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "ItemDto")]
pub struct Item {
    id: ItemId,
    list_id: Option<ListId>,
    details: ItemDetails,
}

impl Item {
    pub fn new(id: ItemId, list_id: Option<ListId>, details: ItemDetails) -> Self {
        Self {
            id,
            list_id,
            details,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Parent list, if the item is attached to one.
    pub fn list_id(&self) -> Option<ListId> {
        self.list_id
    }

    pub fn details(&self) -> &ItemDetails {
        &self.details
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ItemDto {
    id: ItemId,
    title: ItemTitle,
    description: String,
    deadline: NaiveDate,
    status: ItemStatus,
    list_id: Option<ListId>,
}

impl From<Item> for ItemDto {
    fn from(value: Item) -> Self {
        let Item {
            id,
            list_id,
            details,
        } = value;
        Self {
            id,
            title: details.title,
            description: details.description,
            deadline: details.deadline,
            status: details.status,
            list_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 1, 1).expect("valid date")
    }

    #[rstest]
    #[case("active", ItemStatus::Active)]
    #[case("done", ItemStatus::Done)]
    #[case("cancelled", ItemStatus::Cancelled)]
    fn parses_known_statuses(#[case] raw: &str, #[case] expected: ItemStatus) {
        assert_eq!(raw.parse::<ItemStatus>(), Ok(expected));
        assert_eq!(expected.as_str(), raw);
    }

    #[rstest]
    #[case("Active")]
    #[case("archived")]
    #[case("")]
    fn rejects_unknown_statuses(#[case] raw: &str) {
        assert!(matches!(
            raw.parse::<ItemStatus>(),
            Err(ItemValidationError::UnknownStatus { .. })
        ));
    }

    #[rstest]
    fn title_of_exactly_max_length_is_accepted() {
        let title = "t".repeat(ITEM_TITLE_MAX);
        assert!(ItemDetails::try_new(title, "d", date(), ItemStatus::Active).is_ok());
    }

    #[rstest]
    fn title_over_max_length_is_rejected() {
        let title = "t".repeat(ITEM_TITLE_MAX + 1);
        assert_eq!(
            ItemDetails::try_new(title, "d", date(), ItemStatus::Active),
            Err(ItemValidationError::TitleTooLong {
                max: ITEM_TITLE_MAX
            })
        );
    }

    #[rstest]
    #[case("", "d", ItemValidationError::EmptyTitle)]
    #[case("t", " ", ItemValidationError::EmptyDescription)]
    fn blank_fields_are_rejected(
        #[case] title: &str,
        #[case] description: &str,
        #[case] expected: ItemValidationError,
    ) {
        assert_eq!(
            ItemDetails::try_new(title, description, date(), ItemStatus::Active),
            Err(expected)
        );
    }

    #[rstest]
    fn item_serialises_flat() {
        let details = ItemDetails::try_new("Milk", "2 litres", date(), ItemStatus::Done)
            .expect("valid details");
        let item = Item::new(ItemId::new(9), Some(ListId::new(3)), details);
        assert_eq!(
            serde_json::to_value(&item).expect("serialise"),
            json!({
                "id": 9,
                "title": "Milk",
                "description": "2 litres",
                "deadline": "2030-01-01",
                "status": "done",
                "listId": 3,
            })
        );
    }
}
