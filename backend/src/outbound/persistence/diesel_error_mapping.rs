//! Classification of Diesel failures shared by every repository.
//!
//! Repositories translate a [`DieselFailure`] into their own port error so
//! the mapping from PostgreSQL error kinds lives in one place.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

/// Coarse category of a failed Diesel operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// A unique constraint rejected the write. Carries the constraint name
    /// when PostgreSQL reports one.
    UniqueViolation { constraint: Option<String> },
    /// A foreign key pointed at a missing row.
    ForeignKeyViolation { message: String },
    /// The connection dropped mid-operation.
    Connection { message: String },
    /// Anything else.
    Query { message: String },
}

impl DieselFailure {
    /// Classify `error`, logging the driver detail at debug level.
    pub(crate) fn classify(error: DieselError, operation: &str) -> Self {
        match &error {
            DieselError::DatabaseError(kind, info) => {
                debug!(?kind, message = info.message(), %operation, "diesel operation failed");
            }
            _ => debug!(%error, %operation, "diesel operation failed"),
        }

        match error {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::UniqueViolation {
                    constraint: info.constraint_name().map(str::to_owned),
                }
            }
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                Self::ForeignKeyViolation {
                    message: info.message().to_owned(),
                }
            }
            DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
                Self::Connection {
                    message: "database connection error".to_owned(),
                }
            }
            DieselError::NotFound => Self::Query {
                message: "record not found".to_owned(),
            },
            DieselError::QueryBuilderError(_) => Self::Query {
                message: "database query error".to_owned(),
            },
            _ => Self::Query {
                message: format!("{operation} failed"),
            },
        }
    }

    /// Whether this is a unique violation on `constraint`.
    ///
    /// A violation without a reported constraint name matches any
    /// constraint.
    pub(crate) fn violates_unique(&self, constraint: &str) -> bool {
        match self {
            Self::UniqueViolation { constraint: None } => true,
            Self::UniqueViolation {
                constraint: Some(name),
            } => name == constraint,
            _ => false,
        }
    }

    /// Human-readable detail for wrapping into a port error.
    pub(crate) fn message(&self) -> String {
        match self {
            Self::UniqueViolation {
                constraint: Some(name),
            } => format!("unique constraint {name} violated"),
            Self::UniqueViolation { constraint: None } => "unique constraint violated".to_owned(),
            Self::ForeignKeyViolation { message }
            | Self::Connection { message }
            | Self::Query { message } => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::DatabaseErrorInformation;
    use rstest::rstest;

    struct Info {
        message: &'static str,
        constraint: Option<&'static str>,
    }

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            self.message
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.constraint
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, constraint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(
            kind,
            Box::new(Info {
                message: "boom",
                constraint,
            }),
        )
    }

    #[rstest]
    fn unique_violation_keeps_constraint_name() {
        let failure = DieselFailure::classify(
            database_error(DatabaseErrorKind::UniqueViolation, Some("lists_title_key")),
            "insert list",
        );
        assert!(failure.violates_unique("lists_title_key"));
        assert!(!failure.violates_unique("users_username_key"));
    }

    #[rstest]
    fn unnamed_unique_violation_matches_any_constraint() {
        let failure = DieselFailure::classify(
            database_error(DatabaseErrorKind::UniqueViolation, None),
            "insert user",
        );
        assert!(failure.violates_unique("users_username_key"));
    }

    #[rstest]
    #[case(
        database_error(DatabaseErrorKind::ForeignKeyViolation, None),
        DieselFailure::ForeignKeyViolation { message: "boom".to_owned() }
    )]
    #[case(
        database_error(DatabaseErrorKind::ClosedConnection, None),
        DieselFailure::Connection { message: "database connection error".to_owned() }
    )]
    #[case(
        DieselError::NotFound,
        DieselFailure::Query { message: "record not found".to_owned() }
    )]
    fn other_kinds_are_classified(#[case] error: DieselError, #[case] expected: DieselFailure) {
        assert_eq!(DieselFailure::classify(error, "op"), expected);
    }
}
