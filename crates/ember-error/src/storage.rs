// SPDX-License-Identifier: MIT OR Apache-2.0
//! Failures raised by keyed storage paths and the sync write path.
//!
//! None of these capture a backtrace. Key lookups fail routinely and are
//! usually translated at the table API boundary, see [`crate::Boundary`].

use crate::macros::message_failure;
use crate::{ErrorCode, Failure};

message_failure! {
    /// A key lookup found no object.
    KeyNotFound => KeyNotFound
}

message_failure! {
    /// An object was created with a key that is already taken.
    KeyAlreadyUsed => KeyAlreadyUsed
}

message_failure! {
    /// A write happened outside every subscription granted to the session.
    NoSubscriptionForWrite => NoSubscriptionForWrite
}

/// A primary key property ended up holding duplicate values.
///
/// The type and property are readable on their own so callers can build
/// their own message without parsing this one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct DuplicatePrimaryKeyValue {
    object_type: String,
    property: String,
    message: String,
}

impl DuplicatePrimaryKeyValue {
    /// Build the failure for `object_type.property`.
    pub fn new(object_type: impl Into<String>, property: impl Into<String>) -> Self {
        let object_type = object_type.into();
        let property = property.into();
        let message =
            format!("Primary key property '{object_type}.{property}' has duplicate values");
        Self {
            object_type,
            property,
            message,
        }
    }

    /// Name of the object type.
    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    /// Name of the primary key property.
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Composed message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Failure for DuplicatePrimaryKeyValue {
    fn code(&self) -> ErrorCode {
        ErrorCode::DuplicatePrimaryKeyValue
    }

    fn message(&self) -> &str {
        &self.message
    }
}
