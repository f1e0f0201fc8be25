// SPDX-License-Identifier: MIT OR Apache-2.0
//! Failure taxonomy for the EmberDB engine.
//!
//! Failures come in two tiers. The public kinds ([`NoSuchTable`],
//! [`TableNameInUse`], ...) are documented and may be caught by identity.
//! [`LogicError`] is the single signal for "the caller broke an API rule" and
//! is only meant to be matched in tests.
//!
//! Public kinds and [`LogicError`] are wrapped in [`WithBacktrace`], which
//! captures the stack on construction and symbolizes it only when asked.
//! Resource, structured and query kinds stay bare: they are either raised on
//! hot paths or their message already identifies the raising site.
//!
//! Every kind converts into [`Error`], a closed union with a stable
//! [`ErrorCode`] per variant.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod code;
mod decorated;
mod logic;
mod macros;
pub mod public;
mod query;
mod report;
mod resource;
mod storage;
mod translate;

pub use code::{ErrorCategory, ErrorCode, Responsibility};
pub use decorated::{Failure, Payload, WithBacktrace};
pub use ember_backtrace::Trace;
pub use logic::{ContractViolation, LogicError, LogicErrorKind};
pub use public::{
    CrossTableLinkTarget, DescriptorMismatch, InvalidTableRef, MultipleSyncAgents, NoSuchTable,
    TableNameInUse, UnsupportedFileFormatVersion,
};
pub use query::{InvalidPath, InvalidQuery, InvalidQueryArgument, SerializationError, SyntaxError};
pub use report::{FailureReport, ReportOptions, log_failure};
pub use resource::{AddressSpaceExhausted, MaximumFileSizeExceeded, OutOfDiskSpace};
pub use storage::{DuplicatePrimaryKeyValue, KeyAlreadyUsed, KeyNotFound, NoSubscriptionForWrite};
pub use translate::{Boundary, ResultExt};

/// Result alias used across the engine.
pub type Result<T> = std::result::Result<T, Error>;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Any failure raised by the engine.
///
/// One variant per kind; matching is exhaustive on purpose so that a new
/// kind forces every handler to be revisited.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // -- Public --
    /// See [`NoSuchTable`].
    #[error(transparent)]
    NoSuchTable(#[from] NoSuchTable),
    /// See [`TableNameInUse`].
    #[error(transparent)]
    TableNameInUse(#[from] TableNameInUse),
    /// See [`InvalidTableRef`].
    #[error(transparent)]
    InvalidTableRef(#[from] InvalidTableRef),
    /// See [`CrossTableLinkTarget`].
    #[error(transparent)]
    CrossTableLinkTarget(#[from] CrossTableLinkTarget),
    /// See [`DescriptorMismatch`].
    #[error(transparent)]
    DescriptorMismatch(#[from] DescriptorMismatch),
    /// See [`UnsupportedFileFormatVersion`].
    #[error(transparent)]
    UnsupportedFileFormatVersion(#[from] UnsupportedFileFormatVersion),
    /// See [`MultipleSyncAgents`].
    #[error(transparent)]
    MultipleSyncAgents(#[from] MultipleSyncAgents),

    // -- Resource --
    /// See [`AddressSpaceExhausted`].
    #[error(transparent)]
    AddressSpaceExhausted(#[from] AddressSpaceExhausted),
    /// See [`MaximumFileSizeExceeded`].
    #[error(transparent)]
    MaximumFileSizeExceeded(#[from] MaximumFileSizeExceeded),
    /// See [`OutOfDiskSpace`].
    #[error(transparent)]
    OutOfDiskSpace(#[from] OutOfDiskSpace),

    // -- Structured --
    /// See [`KeyNotFound`].
    #[error(transparent)]
    KeyNotFound(#[from] KeyNotFound),
    /// See [`KeyAlreadyUsed`].
    #[error(transparent)]
    KeyAlreadyUsed(#[from] KeyAlreadyUsed),
    /// See [`DuplicatePrimaryKeyValue`].
    #[error(transparent)]
    DuplicatePrimaryKeyValue(#[from] DuplicatePrimaryKeyValue),
    /// See [`NoSubscriptionForWrite`].
    #[error(transparent)]
    NoSubscriptionForWrite(#[from] NoSubscriptionForWrite),

    // -- Query --
    /// See [`SyntaxError`].
    #[error(transparent)]
    SyntaxError(#[from] SyntaxError),
    /// See [`InvalidQuery`].
    #[error(transparent)]
    InvalidQuery(#[from] InvalidQuery),
    /// See [`InvalidQueryArgument`].
    #[error(transparent)]
    InvalidQueryArgument(#[from] InvalidQueryArgument),
    /// See [`SerializationError`].
    #[error(transparent)]
    Serialization(#[from] SerializationError),
    /// See [`InvalidPath`].
    #[error(transparent)]
    InvalidPath(#[from] InvalidPath),

    // -- Internal --
    /// See [`LogicError`].
    #[error(transparent)]
    Logic(#[from] LogicError),
}

impl Error {
    /// The wrapped kind as a [`Failure`] trait object.
    pub fn as_failure(&self) -> &dyn Failure {
        match self {
            Self::NoSuchTable(e) => e,
            Self::TableNameInUse(e) => e,
            Self::InvalidTableRef(e) => e,
            Self::CrossTableLinkTarget(e) => e,
            Self::DescriptorMismatch(e) => e,
            Self::UnsupportedFileFormatVersion(e) => e,
            Self::MultipleSyncAgents(e) => e,
            Self::AddressSpaceExhausted(e) => e,
            Self::MaximumFileSizeExceeded(e) => e,
            Self::OutOfDiskSpace(e) => e,
            Self::KeyNotFound(e) => e,
            Self::KeyAlreadyUsed(e) => e,
            Self::DuplicatePrimaryKeyValue(e) => e,
            Self::NoSubscriptionForWrite(e) => e,
            Self::SyntaxError(e) => e,
            Self::InvalidQuery(e) => e,
            Self::InvalidQueryArgument(e) => e,
            Self::Serialization(e) => e,
            Self::InvalidPath(e) => e,
            Self::Logic(e) => e,
        }
    }

    /// Stable identity of the wrapped kind.
    pub fn code(&self) -> ErrorCode {
        self.as_failure().code()
    }

    /// Shorthand for `self.code().category()`.
    pub fn category(&self) -> ErrorCategory {
        self.code().category()
    }

    /// Human-readable message of the wrapped kind.
    pub fn message(&self) -> &str {
        self.as_failure().message()
    }

    /// Backtrace captured when the wrapped kind was built, if it is decorated.
    pub fn trace(&self) -> Option<&Trace> {
        self.as_failure().trace()
    }

    /// `true` for public kinds and [`LogicError`].
    pub fn is_decorated(&self) -> bool {
        self.code().is_decorated()
    }

    /// The broken rule, if this is a [`LogicError`].
    pub fn logic_error_kind(&self) -> Option<LogicErrorKind> {
        match self {
            Self::Logic(e) => Some(e.kind()),
            _ => None,
        }
    }
}

impl From<LogicErrorKind> for Error {
    fn from(kind: LogicErrorKind) -> Self {
        Self::Logic(LogicError::new(kind))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
