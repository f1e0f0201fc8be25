// SPDX-License-Identifier: MIT OR Apache-2.0
//! Failure kinds that belong to the stable public contract.
//!
//! Every kind here is a distinct type wrapping its payload in
//! [`WithBacktrace`], so callers can match on identity and still get the
//! stack of the raising site when filing a bug.

use crate::WithBacktrace;

/// Payloads of the public kinds.
pub mod payload {
    use crate::macros::fixed_payload;
    use crate::{ErrorCode, Payload};

    fixed_payload! {
        /// Payload of [`NoSuchTable`](super::NoSuchTable).
        NoSuchTable => NoSuchTable, "No such table exists"
    }

    fixed_payload! {
        /// Payload of [`TableNameInUse`](super::TableNameInUse).
        TableNameInUse => TableNameInUse, "The specified table name is already in use"
    }

    fixed_payload! {
        /// Payload of [`CrossTableLinkTarget`](super::CrossTableLinkTarget).
        CrossTableLinkTarget => CrossTableLinkTarget, "Table is target of cross-table link columns"
    }

    fixed_payload! {
        /// Payload of [`DescriptorMismatch`](super::DescriptorMismatch).
        DescriptorMismatch => DescriptorMismatch, "Table descriptor mismatch"
    }

    fixed_payload! {
        /// Payload of [`MultipleSyncAgents`](super::MultipleSyncAgents).
        MultipleSyncAgents => MultipleSyncAgents, "Multiple sync agents attempted to join the same session"
    }

    /// Payload of [`InvalidTableRef`](super::InvalidTableRef).
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct InvalidTableRef {
        pub(crate) cause: String,
    }

    impl InvalidTableRef {
        /// Why the handle is invalid.
        pub fn cause(&self) -> &str {
            &self.cause
        }
    }

    impl Payload for InvalidTableRef {
        const CODE: ErrorCode = ErrorCode::InvalidTableRef;

        fn message(&self) -> &str {
            &self.cause
        }
    }

    /// Payload of [`UnsupportedFileFormatVersion`](super::UnsupportedFileFormatVersion).
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct UnsupportedFileFormatVersion {
        pub(crate) source_version: i32,
        pub(crate) message: String,
    }

    impl UnsupportedFileFormatVersion {
        /// The file format version found on disk.
        pub fn source_version(&self) -> i32 {
            self.source_version
        }
    }

    impl Payload for UnsupportedFileFormatVersion {
        const CODE: ErrorCode = ErrorCode::UnsupportedFileFormatVersion;

        fn message(&self) -> &str {
            &self.message
        }
    }
}

/// An operation referenced a table that does not exist.
pub type NoSuchTable = WithBacktrace<payload::NoSuchTable>;

/// A create or rename collided with an existing table name.
pub type TableNameInUse = WithBacktrace<payload::TableNameInUse>;

/// A stale or otherwise invalid table handle was dereferenced.
pub type InvalidTableRef = WithBacktrace<payload::InvalidTableRef>;

/// The operation requires that the table is not the target of link columns
/// from other tables, but it is.
pub type CrossTableLinkTarget = WithBacktrace<payload::CrossTableLinkTarget>;

/// The dynamic shape of a table does not match the expected shape.
pub type DescriptorMismatch = WithBacktrace<payload::DescriptorMismatch>;

/// Opening a file whose format is older than this build can upgrade from.
pub type UnsupportedFileFormatVersion = WithBacktrace<payload::UnsupportedFileFormatVersion>;

/// A second sync agent attempted to join a session that already has one.
pub type MultipleSyncAgents = WithBacktrace<payload::MultipleSyncAgents>;

impl NoSuchTable {
    /// Build the failure, capturing the current stack.
    pub fn new() -> Self {
        Self::wrap(payload::NoSuchTable)
    }
}

impl TableNameInUse {
    /// Build the failure, capturing the current stack.
    pub fn new() -> Self {
        Self::wrap(payload::TableNameInUse)
    }
}

impl InvalidTableRef {
    /// Build the failure; `cause` becomes the message.
    pub fn new(cause: impl Into<String>) -> Self {
        Self::wrap(payload::InvalidTableRef {
            cause: cause.into(),
        })
    }
}

impl CrossTableLinkTarget {
    /// Build the failure, capturing the current stack.
    pub fn new() -> Self {
        Self::wrap(payload::CrossTableLinkTarget)
    }
}

impl DescriptorMismatch {
    /// Build the failure, capturing the current stack.
    pub fn new() -> Self {
        Self::wrap(payload::DescriptorMismatch)
    }
}

impl UnsupportedFileFormatVersion {
    /// Build the failure for a file at `source_version`.
    pub fn new(source_version: i32) -> Self {
        Self::wrap(payload::UnsupportedFileFormatVersion {
            source_version,
            message: format!(
                "Database has an unsupported version ({source_version}) and cannot be upgraded"
            ),
        })
    }
}

impl MultipleSyncAgents {
    /// Build the failure, capturing the current stack.
    pub fn new() -> Self {
        Self::wrap(payload::MultipleSyncAgents)
    }
}
