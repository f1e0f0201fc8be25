// SPDX-License-Identifier: MIT OR Apache-2.0
//! Re-expressing low-level failures when they cross a layer boundary.
//!
//! Failures are never swallowed. At a boundary they are either translated by
//! one of the rules below or passed through untouched, keeping their kind
//! and their original trace.

use crate::{Error, InvalidQuery, NoSuchTable, TableNameInUse};

/// A layer boundary with translation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Boundary {
    /// Storage to table API.
    ///
    /// * [`KeyNotFound`](crate::KeyNotFound) becomes [`NoSuchTable`].
    /// * [`KeyAlreadyUsed`](crate::KeyAlreadyUsed) becomes [`TableNameInUse`].
    TableApi,
    /// Link path resolution to query binding.
    ///
    /// * [`InvalidPath`](crate::InvalidPath) becomes [`InvalidQuery`] with
    ///   the same message.
    QueryBinding,
}

impl Error {
    /// Apply the rules of `boundary`. Kinds without a rule pass through.
    pub fn translate(self, boundary: Boundary) -> Error {
        match (boundary, self) {
            (Boundary::TableApi, Error::KeyNotFound(e)) => {
                tracing::debug!(
                    target: "ember.error",
                    ?boundary,
                    from = "KEY_NOT_FOUND",
                    detail = e.message(),
                    "translating failure"
                );
                NoSuchTable::new().into()
            }
            (Boundary::TableApi, Error::KeyAlreadyUsed(e)) => {
                tracing::debug!(
                    target: "ember.error",
                    ?boundary,
                    from = "KEY_ALREADY_USED",
                    detail = e.message(),
                    "translating failure"
                );
                TableNameInUse::new().into()
            }
            (Boundary::QueryBinding, Error::InvalidPath(e)) => {
                tracing::debug!(
                    target: "ember.error",
                    ?boundary,
                    from = "INVALID_PATH",
                    "translating failure"
                );
                InvalidQuery::new(e.message()).into()
            }
            (_, other) => other,
        }
    }
}

/// Boundary translation for results.
pub trait ResultExt<T> {
    /// Convert the error into [`Error`] and apply the rules of `boundary`.
    fn at_boundary(self, boundary: Boundary) -> crate::Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn at_boundary(self, boundary: Boundary) -> crate::Result<T> {
        self.map_err(|e| e.into().translate(boundary))
    }
}
