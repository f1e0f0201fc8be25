// SPDX-License-Identifier: MIT OR Apache-2.0
//! Stable identities for every failure kind.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Responsibility
// ---------------------------------------------------------------------------

/// Who is answerable for a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Responsibility {
    /// An expected, documented condition of the data or session.
    Domain,
    /// The host ran out of something; the caller could not have prevented it.
    Environment,
    /// The caller broke an API rule.
    Caller,
}

impl fmt::Display for Responsibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Domain => "domain",
            Self::Environment => "environment",
            Self::Caller => "caller",
        })
    }
}

// ---------------------------------------------------------------------------
// ErrorCategory
// ---------------------------------------------------------------------------

/// Family that an [`ErrorCode`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Documented kinds that callers may catch by identity.
    Public,
    /// Address space, file size and disk space exhaustion.
    Resource,
    /// Keyed lookups, primary keys and subscription scope.
    Structured,
    /// Query parsing, binding, serialization and link paths.
    Query,
    /// The contract-violation signal. Not part of the public contract.
    Internal,
}

impl ErrorCategory {
    /// Who is answerable for failures in this category.
    pub fn responsibility(&self) -> Responsibility {
        match self {
            Self::Public | Self::Structured | Self::Query => Responsibility::Domain,
            Self::Resource => Responsibility::Environment,
            Self::Internal => Responsibility::Caller,
        }
    }

    /// `true` if kinds in this category capture a backtrace on construction.
    pub fn is_decorated(&self) -> bool {
        matches!(self, Self::Public | Self::Internal)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Public => "public",
            Self::Resource => "resource",
            Self::Structured => "structured",
            Self::Query => "query",
            Self::Internal => "internal",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// ErrorCode
// ---------------------------------------------------------------------------

/// Machine-readable identity of a failure kind.
///
/// Each variant serialises to a `SCREAMING_SNAKE_CASE` string that does not
/// change within a major version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // -- Public --
    /// A referenced table does not exist.
    NoSuchTable,
    /// Create or rename collided with an existing table name.
    TableNameInUse,
    /// A stale or otherwise invalid table handle was dereferenced.
    InvalidTableRef,
    /// The table is the target of cross-table link columns.
    CrossTableLinkTarget,
    /// The dynamic shape of a table does not match the expected shape.
    DescriptorMismatch,
    /// The file uses a format this build cannot upgrade from.
    UnsupportedFileFormatVersion,
    /// A second sync agent tried to join a session.
    MultipleSyncAgents,

    // -- Resource --
    /// Memory could no longer be mapped.
    AddressSpaceExhausted,
    /// A reference would exceed the largest representable file offset.
    MaximumFileSizeExceeded,
    /// A write failed because the disk is full.
    OutOfDiskSpace,

    // -- Structured --
    /// A key lookup found nothing.
    KeyNotFound,
    /// A key is already taken by another object.
    KeyAlreadyUsed,
    /// A primary key property holds duplicate values.
    DuplicatePrimaryKeyValue,
    /// A write happened outside every granted subscription.
    NoSubscriptionForWrite,

    // -- Query --
    /// The query text is not well formed.
    SyntaxError,
    /// The query is well formed but meaningless in its binding context.
    InvalidQuery,
    /// A placeholder argument is missing, malformed or of the wrong type.
    InvalidQueryArgument,
    /// A query description could not be serialized.
    SerializationFailed,
    /// A user constructed link path is not valid input.
    InvalidPath,

    // -- Internal --
    /// The caller broke an API rule.
    LogicError,
}

impl ErrorCode {
    /// Every code, in declaration order.
    pub const ALL: [ErrorCode; 20] = [
        Self::NoSuchTable,
        Self::TableNameInUse,
        Self::InvalidTableRef,
        Self::CrossTableLinkTarget,
        Self::DescriptorMismatch,
        Self::UnsupportedFileFormatVersion,
        Self::MultipleSyncAgents,
        Self::AddressSpaceExhausted,
        Self::MaximumFileSizeExceeded,
        Self::OutOfDiskSpace,
        Self::KeyNotFound,
        Self::KeyAlreadyUsed,
        Self::DuplicatePrimaryKeyValue,
        Self::NoSubscriptionForWrite,
        Self::SyntaxError,
        Self::InvalidQuery,
        Self::InvalidQueryArgument,
        Self::SerializationFailed,
        Self::InvalidPath,
        Self::LogicError,
    ];

    /// Returns the [`ErrorCategory`] this code belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NoSuchTable
            | Self::TableNameInUse
            | Self::InvalidTableRef
            | Self::CrossTableLinkTarget
            | Self::DescriptorMismatch
            | Self::UnsupportedFileFormatVersion
            | Self::MultipleSyncAgents => ErrorCategory::Public,

            Self::AddressSpaceExhausted | Self::MaximumFileSizeExceeded | Self::OutOfDiskSpace => {
                ErrorCategory::Resource
            }

            Self::KeyNotFound
            | Self::KeyAlreadyUsed
            | Self::DuplicatePrimaryKeyValue
            | Self::NoSubscriptionForWrite => ErrorCategory::Structured,

            Self::SyntaxError
            | Self::InvalidQuery
            | Self::InvalidQueryArgument
            | Self::SerializationFailed
            | Self::InvalidPath => ErrorCategory::Query,

            Self::LogicError => ErrorCategory::Internal,
        }
    }

    /// Shorthand for `self.category().is_decorated()`.
    pub fn is_decorated(&self) -> bool {
        self.category().is_decorated()
    }

    /// Stable `&'static str` representation (e.g. `"NO_SUCH_TABLE"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoSuchTable => "NO_SUCH_TABLE",
            Self::TableNameInUse => "TABLE_NAME_IN_USE",
            Self::InvalidTableRef => "INVALID_TABLE_REF",
            Self::CrossTableLinkTarget => "CROSS_TABLE_LINK_TARGET",
            Self::DescriptorMismatch => "DESCRIPTOR_MISMATCH",
            Self::UnsupportedFileFormatVersion => "UNSUPPORTED_FILE_FORMAT_VERSION",
            Self::MultipleSyncAgents => "MULTIPLE_SYNC_AGENTS",
            Self::AddressSpaceExhausted => "ADDRESS_SPACE_EXHAUSTED",
            Self::MaximumFileSizeExceeded => "MAXIMUM_FILE_SIZE_EXCEEDED",
            Self::OutOfDiskSpace => "OUT_OF_DISK_SPACE",
            Self::KeyNotFound => "KEY_NOT_FOUND",
            Self::KeyAlreadyUsed => "KEY_ALREADY_USED",
            Self::DuplicatePrimaryKeyValue => "DUPLICATE_PRIMARY_KEY_VALUE",
            Self::NoSubscriptionForWrite => "NO_SUBSCRIPTION_FOR_WRITE",
            Self::SyntaxError => "SYNTAX_ERROR",
            Self::InvalidQuery => "INVALID_QUERY",
            Self::InvalidQueryArgument => "INVALID_QUERY_ARGUMENT",
            Self::SerializationFailed => "SERIALIZATION_FAILED",
            Self::InvalidPath => "INVALID_PATH",
            Self::LogicError => "LOGIC_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
