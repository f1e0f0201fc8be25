// SPDX-License-Identifier: MIT OR Apache-2.0
//! Failures caused by the host environment rather than by the caller.
//!
//! These kinds are raised from allocation and I/O paths and do not capture a
//! backtrace: the message names the limit or path involved, which already
//! pins down the raising site.

use crate::macros::message_failure;

message_failure! {
    /// Memory could no longer be mapped (`mmap`/`mremap` failed).
    AddressSpaceExhausted => AddressSpaceExhausted
}

message_failure! {
    /// A reference would not fit in the largest representable file offset.
    MaximumFileSizeExceeded => MaximumFileSizeExceeded
}

message_failure! {
    /// A write failed because the disk is full.
    OutOfDiskSpace => OutOfDiskSpace
}
