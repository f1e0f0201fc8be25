// SPDX-License-Identifier: MIT OR Apache-2.0
//! Failures raised by the query front end.
//!
//! The parser and binder run for every generated query, including permission
//! and metrics queries, so none of these kinds capture a backtrace.

use crate::macros::message_failure;

message_failure! {
    /// The query text is not well formed.
    SyntaxError => SyntaxError
}

message_failure! {
    /// The query is well formed but does not make sense where it is bound,
    /// e.g. an unknown property or mismatched operand types.
    InvalidQuery => InvalidQuery
}

message_failure! {
    /// A placeholder argument is missing, malformed or of the wrong type.
    InvalidQueryArgument => InvalidQueryArgument
}

message_failure! {
    /// A query could not be turned back into its textual description.
    SerializationError => SerializationFailed
}

message_failure! {
    /// A user constructed link path is not valid input.
    InvalidPath => InvalidPath
}
