// SPDX-License-Identifier: MIT OR Apache-2.0
//! The contract-violation signal.
//!
//! [`LogicError`] is raised when a caller breaks a rule that the API
//! documents (or should document) and that the caller could have checked
//! cheaply. It replaces debug-only assertions: the check is always active,
//! aborts the failing operation, and can be asserted in tests with
//! [`assert_logic_error!`](crate::assert_logic_error).
//!
//! This type is not part of the stable public contract. Production code
//! should not branch on it; new kinds may appear in any release.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{ErrorCode, Payload, WithBacktrace};

/// Which API rule was broken.
///
/// New kinds may be added in any release, so code outside this crate must
/// keep a wildcard arm:
///
/// ```compile_fail
/// use ember_error::LogicErrorKind::*;
///
/// fn label(kind: ember_error::LogicErrorKind) -> &'static str {
///     match kind {
///         StringTooBig => "0",
///         BinaryTooBig => "1",
///         TableNameTooLong => "2",
///         ColumnNameTooLong => "3",
///         ColumnNameInUse => "4",
///         InvalidColumnName => "5",
///         TableIndexOutOfRange => "6",
///         RowIndexOutOfRange => "7",
///         ColumnIndexOutOfRange => "8",
///         StringPositionOutOfRange => "9",
///         LinkIndexOutOfRange => "10",
///         BadVersion => "11",
///         IllegalType => "12",
///         IllegalCombination => "13",
///         TypeMismatch => "14",
///         GroupMismatch => "15",
///         WrongKindOfDescriptor => "16",
///         WrongKindOfTable => "17",
///         DetachedAccessor => "18",
///         TargetRowIndexOutOfRange => "19",
///         NoSearchIndex => "20",
///         UniqueConstraintViolation => "21",
///         ColumnNotNullable => "22",
///         WrongGroupState => "23",
///         WrongTransactState => "24",
///         NoHistory => "25",
///         MixedDurability => "26",
///         MixedHistoryType => "27",
///         MixedHistorySchemaVersion => "28",
///         TableHasNoColumns => "29",
///         ColumnDoesNotExist => "30",
///         SubtableOfSubtableIndex => "31",
///         CollectionTypeMismatch => "32",
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum LogicErrorKind {
    /// A string value exceeds the maximum size.
    StringTooBig,
    /// A binary value exceeds the maximum size.
    BinaryTooBig,
    /// A table name exceeds the maximum length.
    TableNameTooLong,
    /// A column name exceeds the maximum length.
    ColumnNameTooLong,
    /// A column with that name already exists.
    ColumnNameInUse,
    /// The column name is not acceptable.
    InvalidColumnName,
    /// A table index is out of range.
    TableIndexOutOfRange,
    /// A row index is out of range.
    RowIndexOutOfRange,
    /// A column index is out of range.
    ColumnIndexOutOfRange,
    /// A position inside a string is out of range.
    StringPositionOutOfRange,
    /// A link index is out of range.
    LinkIndexOutOfRange,
    /// A version number is not valid here.
    BadVersion,
    /// The data type is not allowed here.
    IllegalType,
    /// An argument is illegal in combination with another argument, or with
    /// the state of an involved object.
    IllegalCombination,
    /// Data type mismatch, e.g. an integer primary key lookup on a table
    /// whose primary key is a string.
    TypeMismatch,
    /// Two involved tables belong to different groups.
    GroupMismatch,
    /// A subtable descriptor was given where a root table descriptor is
    /// required, or the reverse.
    WrongKindOfDescriptor,
    /// A subtable or free-standing table was given where a group-level table
    /// is required.
    WrongKindOfTable,
    /// The accessor is no longer attached to an underlying object.
    DetachedAccessor,
    /// The row index in the target table of a link is out of range. Kept
    /// apart from [`RowIndexOutOfRange`](Self::RowIndexOutOfRange) for calls
    /// that take both an origin and a target row.
    TargetRowIndexOutOfRange,
    /// The column has no search index.
    NoSearchIndex,
    /// The modification would produce a duplicate primary value.
    UniqueConstraintViolation,
    /// Null was written to a non-nullable column.
    ColumnNotNullable,
    /// The group accessor is already attached, or is managed by a database
    /// handle and cannot be opened or committed directly.
    WrongGroupState,
    /// No active transaction, the wrong kind of transaction (e.g. a write in
    /// a read transaction), or a transaction is already in progress.
    WrongTransactState,
    /// A continuous transaction was requested on a handle without history.
    NoHistory,
    /// Durability setting was not consistent across the session.
    MixedDurability,
    /// History type was not consistent across the session.
    MixedHistoryType,
    /// History schema version was not consistent across the session.
    MixedHistorySchemaVersion,
    /// Rows cannot be added to a table with no columns.
    TableHasNoColumns,
    /// The referenced column has been removed.
    ColumnDoesNotExist,
    /// A subtable of a subtable cannot carry a search index.
    SubtableOfSubtableIndex,
    /// A collection accessor does not match the column type.
    CollectionTypeMismatch,
}

impl LogicErrorKind {
    /// Every kind, in declaration order.
    pub const ALL: [LogicErrorKind; 33] = [
        Self::StringTooBig,
        Self::BinaryTooBig,
        Self::TableNameTooLong,
        Self::ColumnNameTooLong,
        Self::ColumnNameInUse,
        Self::InvalidColumnName,
        Self::TableIndexOutOfRange,
        Self::RowIndexOutOfRange,
        Self::ColumnIndexOutOfRange,
        Self::StringPositionOutOfRange,
        Self::LinkIndexOutOfRange,
        Self::BadVersion,
        Self::IllegalType,
        Self::IllegalCombination,
        Self::TypeMismatch,
        Self::GroupMismatch,
        Self::WrongKindOfDescriptor,
        Self::WrongKindOfTable,
        Self::DetachedAccessor,
        Self::TargetRowIndexOutOfRange,
        Self::NoSearchIndex,
        Self::UniqueConstraintViolation,
        Self::ColumnNotNullable,
        Self::WrongGroupState,
        Self::WrongTransactState,
        Self::NoHistory,
        Self::MixedDurability,
        Self::MixedHistoryType,
        Self::MixedHistorySchemaVersion,
        Self::TableHasNoColumns,
        Self::ColumnDoesNotExist,
        Self::SubtableOfSubtableIndex,
        Self::CollectionTypeMismatch,
    ];

    /// Message for bug reports. Wording may change between releases.
    pub fn message(&self) -> &'static str {
        match self {
            Self::StringTooBig => "String too big",
            Self::BinaryTooBig => "Binary too big",
            Self::TableNameTooLong => "Table name too long",
            Self::ColumnNameTooLong => "Column name too long",
            Self::ColumnNameInUse => "Column name in use",
            Self::InvalidColumnName => "Invalid column name",
            Self::TableIndexOutOfRange => "Table index out of range",
            Self::RowIndexOutOfRange => "Row index out of range",
            Self::ColumnIndexOutOfRange => "Column index out of range",
            Self::StringPositionOutOfRange => "String position out of range",
            Self::LinkIndexOutOfRange => "Link index out of range",
            Self::BadVersion => "Bad version number",
            Self::IllegalType => "Illegal data type",
            Self::IllegalCombination => "Illegal combination of arguments",
            Self::TypeMismatch => "Data type mismatch",
            Self::GroupMismatch => "Tables are in different groups",
            Self::WrongKindOfDescriptor => "Wrong kind of descriptor",
            Self::WrongKindOfTable => "Wrong kind of table",
            Self::DetachedAccessor => "Detached accessor",
            Self::TargetRowIndexOutOfRange => "Target table row index out of range",
            Self::NoSearchIndex => "Column has no search index",
            Self::UniqueConstraintViolation => "Unique constraint violation",
            Self::ColumnNotNullable => "Attempted to insert null into non-nullable column",
            Self::WrongGroupState => "Wrong state of group accessor (already attached?)",
            Self::WrongTransactState => {
                "Wrong transactional state (no active transaction, wrong type of transaction, \
                 or transaction already in progress)"
            }
            Self::NoHistory => "Continuous transaction through database handle without history",
            Self::MixedDurability => "Durability setting was not consistent across the session",
            Self::MixedHistoryType => "History type was not consistent across the session",
            Self::MixedHistorySchemaVersion => {
                "History schema version was not consistent across the session"
            }
            Self::TableHasNoColumns => "Table has no columns",
            Self::ColumnDoesNotExist => "Column does not exist",
            Self::SubtableOfSubtableIndex => "Subtables of subtables cannot be indexed",
            Self::CollectionTypeMismatch => "Collection type does not match column type",
        }
    }

    /// Stable `snake_case` name, identical to the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StringTooBig => "string_too_big",
            Self::BinaryTooBig => "binary_too_big",
            Self::TableNameTooLong => "table_name_too_long",
            Self::ColumnNameTooLong => "column_name_too_long",
            Self::ColumnNameInUse => "column_name_in_use",
            Self::InvalidColumnName => "invalid_column_name",
            Self::TableIndexOutOfRange => "table_index_out_of_range",
            Self::RowIndexOutOfRange => "row_index_out_of_range",
            Self::ColumnIndexOutOfRange => "column_index_out_of_range",
            Self::StringPositionOutOfRange => "string_position_out_of_range",
            Self::LinkIndexOutOfRange => "link_index_out_of_range",
            Self::BadVersion => "bad_version",
            Self::IllegalType => "illegal_type",
            Self::IllegalCombination => "illegal_combination",
            Self::TypeMismatch => "type_mismatch",
            Self::GroupMismatch => "group_mismatch",
            Self::WrongKindOfDescriptor => "wrong_kind_of_descriptor",
            Self::WrongKindOfTable => "wrong_kind_of_table",
            Self::DetachedAccessor => "detached_accessor",
            Self::TargetRowIndexOutOfRange => "target_row_index_out_of_range",
            Self::NoSearchIndex => "no_search_index",
            Self::UniqueConstraintViolation => "unique_constraint_violation",
            Self::ColumnNotNullable => "column_not_nullable",
            Self::WrongGroupState => "wrong_group_state",
            Self::WrongTransactState => "wrong_transact_state",
            Self::NoHistory => "no_history",
            Self::MixedDurability => "mixed_durability",
            Self::MixedHistoryType => "mixed_history_type",
            Self::MixedHistorySchemaVersion => "mixed_history_schema_version",
            Self::TableHasNoColumns => "table_has_no_columns",
            Self::ColumnDoesNotExist => "column_does_not_exist",
            Self::SubtableOfSubtableIndex => "subtable_of_subtable_index",
            Self::CollectionTypeMismatch => "collection_type_mismatch",
        }
    }
}

impl fmt::Display for LogicErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of [`LogicError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractViolation {
    kind: LogicErrorKind,
}

impl ContractViolation {
    /// The broken rule.
    pub fn kind(&self) -> LogicErrorKind {
        self.kind
    }
}

impl Payload for ContractViolation {
    const CODE: ErrorCode = ErrorCode::LogicError;

    fn message(&self) -> &str {
        self.kind.message()
    }
}

/// A caller broke an API rule.
pub type LogicError = WithBacktrace<ContractViolation>;

impl LogicError {
    /// Build the failure for `kind`, capturing the current stack.
    pub fn new(kind: LogicErrorKind) -> Self {
        Self::wrap(ContractViolation { kind })
    }

    /// The broken rule.
    pub fn kind(&self) -> LogicErrorKind {
        self.base().kind
    }
}

impl From<LogicErrorKind> for LogicError {
    fn from(kind: LogicErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Return early with a [`LogicError`] when a rule does not hold.
///
/// The error is converted with `Into`, so this works in any function whose
/// error type implements `From<LogicError>`, including [`crate::Error`].
///
/// ```
/// use ember_error::{Result, require};
///
/// fn add_row(column_count: usize) -> Result<()> {
///     require!(column_count > 0, TableHasNoColumns);
///     Ok(())
/// }
///
/// assert!(add_row(0).is_err());
/// assert!(add_row(3).is_ok());
/// ```
#[macro_export]
macro_rules! require {
    ($cond:expr, $kind:ident) => {
        if !($cond) {
            return ::core::result::Result::Err(
                $crate::LogicError::new($crate::LogicErrorKind::$kind).into(),
            );
        }
    };
}

/// Assert that an expression evaluated to a [`LogicError`] of the given kind.
///
/// Accepts any `Result` whose error converts into [`crate::Error`]. Intended
/// for test harnesses only.
///
/// ```
/// use ember_error::{LogicError, LogicErrorKind, assert_logic_error};
///
/// let result: Result<(), LogicError> = Err(LogicError::new(LogicErrorKind::DetachedAccessor));
/// assert_logic_error!(result, DetachedAccessor);
/// ```
#[macro_export]
macro_rules! assert_logic_error {
    ($expr:expr, $kind:ident) => {
        match $expr {
            ::core::result::Result::Ok(_) => ::core::panic!(
                "expected logic error `{}`, got Ok",
                $crate::LogicErrorKind::$kind
            ),
            ::core::result::Result::Err(err) => {
                let err: $crate::Error = err.into();
                ::core::assert_eq!(
                    err.logic_error_kind(),
                    ::core::option::Option::Some($crate::LogicErrorKind::$kind),
                    "expected logic error `{}`, got {:?}",
                    $crate::LogicErrorKind::$kind,
                    err
                );
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Failure;
    use std::collections::HashSet;

    #[test]
    fn kind_roundtrips_through_construction() {
        let err = LogicError::new(LogicErrorKind::TableHasNoColumns);
        assert_eq!(err.kind(), LogicErrorKind::TableHasNoColumns);
        assert_eq!(err.message(), "Table has no columns");
        assert_eq!(err.code(), ErrorCode::LogicError);
    }

    #[test]
    fn every_kind_has_distinct_non_empty_message() {
        let mut seen = HashSet::new();
        for kind in LogicErrorKind::ALL {
            let err = LogicError::new(kind);
            assert_eq!(err.kind(), kind);
            assert_eq!(err.message(), kind.message());
            assert!(!kind.message().is_empty(), "{kind:?}");
            assert!(seen.insert(kind.message()), "duplicate message for {kind:?}");
        }
        assert_eq!(seen.len(), 33);
    }

    #[test]
    fn as_str_matches_serde() {
        for kind in LogicErrorKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!(r#""{}""#, kind.as_str()));
        }
    }

    #[test]
    fn from_kind() {
        let err: LogicError = LogicErrorKind::BadVersion.into();
        assert_eq!(err.kind(), LogicErrorKind::BadVersion);
        assert_eq!(err.message(), LogicErrorKind::BadVersion.message());
    }

    fn checked_insert(columns: usize) -> Result<(), LogicError> {
        require!(columns > 0, TableHasNoColumns);
        Ok(())
    }

    #[test]
    fn require_returns_early() {
        assert!(checked_insert(1).is_ok());
        let err = checked_insert(0).unwrap_err();
        assert_eq!(err.kind(), LogicErrorKind::TableHasNoColumns);
    }

    #[test]
    fn assert_logic_error_accepts_matching_kind() {
        assert_logic_error!(checked_insert(0), TableHasNoColumns);
    }

    #[test]
    #[should_panic(expected = "got Ok")]
    fn assert_logic_error_rejects_ok() {
        assert_logic_error!(checked_insert(2), TableHasNoColumns);
    }

    #[test]
    #[should_panic(expected = "expected logic error `detached_accessor`")]
    fn assert_logic_error_rejects_other_kind() {
        assert_logic_error!(checked_insert(0), DetachedAccessor);
    }
}
