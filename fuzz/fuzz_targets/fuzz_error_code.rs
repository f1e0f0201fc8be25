// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fuzz ErrorCode / LogicErrorKind deserialization and report round-trips.
//!
//! Verifies:
//! 1. Deserializing arbitrary strings as ErrorCode never panics.
//! 2. Parsed codes have consistent Display/as_str/category.
//! 3. LogicError construction for any kind yields a non-empty message.
//! 4. FailureReport round-trips through JSON.
#![no_main]
use ember_backtrace::{CapturePolicy, override_capture_policy};
use ember_error::{Error, ErrorCode, FailureReport, LogicErrorKind};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _guard = override_capture_policy(CapturePolicy::Disabled);
    let s = match std::str::from_utf8(data) {
        Ok(s) => s,
        Err(_) => return,
    };

    // --- Property 1/2: JSON deserialization never panics ---
    if let Ok(code) = serde_json::from_str::<ErrorCode>(s) {
        assert_eq!(format!("{code}"), code.as_str(), "Display and as_str must agree");
        assert_eq!(code.is_decorated(), code.category().is_decorated());
        let json = serde_json::to_string(&code).expect("ErrorCode must serialize");
        let rt: ErrorCode = serde_json::from_str(&json).expect("ErrorCode round-trip");
        assert_eq!(code, rt);
    }

    // --- Property 3: any logic kind builds ---
    let idx = data.first().copied().unwrap_or(0) as usize % LogicErrorKind::ALL.len();
    let kind = LogicErrorKind::ALL[idx];
    let err: Error = kind.into();
    assert!(!err.message().is_empty());
    assert_eq!(err.logic_error_kind(), Some(kind));

    // --- Property 4: FailureReport JSON round-trip ---
    let report = FailureReport::from(&err);
    let json = serde_json::to_string(&report).expect("report must serialize");
    let rt: FailureReport = serde_json::from_str(&json).expect("report round-trip");
    assert_eq!(report, rt);

    let _ = serde_json::from_str::<LogicErrorKind>(s);
    let _ = serde_json::from_str::<FailureReport>(s);
});
