// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fuzz boundary translation with arbitrary messages.
//!
//! Verifies that translation never panics, only the documented rules change
//! the kind, and InvalidPath keeps its message when it becomes InvalidQuery.
#![no_main]
use ember_backtrace::{CapturePolicy, override_capture_policy};
use ember_error::{
    Boundary, Error, ErrorCode, InvalidPath, KeyAlreadyUsed, KeyNotFound, OutOfDiskSpace,
    SyntaxError,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _guard = override_capture_policy(CapturePolicy::Disabled);
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let message = String::from_utf8_lossy(rest).into_owned();

    let err: Error = match selector % 5 {
        0 => KeyNotFound::new(message.clone()).into(),
        1 => KeyAlreadyUsed::new(message.clone()).into(),
        2 => InvalidPath::new(message.clone()).into(),
        3 => SyntaxError::new(message.clone()).into(),
        _ => OutOfDiskSpace::new(message.clone()).into(),
    };
    let boundary = if selector & 0x80 == 0 {
        Boundary::TableApi
    } else {
        Boundary::QueryBinding
    };

    let before = err.code();
    let after = err.translate(boundary);
    match (boundary, before) {
        (Boundary::TableApi, ErrorCode::KeyNotFound) => {
            assert_eq!(after.code(), ErrorCode::NoSuchTable)
        }
        (Boundary::TableApi, ErrorCode::KeyAlreadyUsed) => {
            assert_eq!(after.code(), ErrorCode::TableNameInUse)
        }
        (Boundary::QueryBinding, ErrorCode::InvalidPath) => {
            assert_eq!(after.code(), ErrorCode::InvalidQuery);
            assert_eq!(after.message(), message);
        }
        _ => {
            assert_eq!(after.code(), before);
            assert_eq!(after.message(), message);
        }
    }
});
