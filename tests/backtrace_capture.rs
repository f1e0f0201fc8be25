// SPDX-License-Identifier: MIT OR Apache-2.0
//! Capture-cost tests: decorated kinds capture exactly once and render
//! lazily; bare kinds never touch the capture facility.

use std::thread;

use ember_backtrace::{CapturePolicy, UNAVAILABLE, capture_calls, override_capture_policy};
use ember_error::{
    AddressSpaceExhausted, DuplicatePrimaryKeyValue, Error, InvalidPath, InvalidQuery,
    InvalidQueryArgument, KeyAlreadyUsed, KeyNotFound, LogicError, LogicErrorKind,
    MaximumFileSizeExceeded, NoSubscriptionForWrite, NoSuchTable, OutOfDiskSpace,
    SerializationError, SyntaxError, TableNameInUse, UnsupportedFileFormatVersion,
};

// ─── helpers ────────────────────────────────────────────────────────────────

/// Number of capture calls made on this thread while running `f`.
fn captures_during<T>(f: impl FnOnce() -> T) -> (T, u64) {
    let before = capture_calls();
    let out = f();
    (out, capture_calls() - before)
}

// ═══════════════════════════════════════════════════════════════════════════
// 1. Capture counts
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn bare_kinds_never_capture() {
    let _guard = override_capture_policy(CapturePolicy::Enabled);
    let (errs, calls) = captures_during(|| {
        let errs: Vec<Error> = vec![
            AddressSpaceExhausted::new("mmap").into(),
            MaximumFileSizeExceeded::new("ref").into(),
            OutOfDiskSpace::new("disk").into(),
            KeyNotFound::new("key").into(),
            KeyAlreadyUsed::new("key").into(),
            DuplicatePrimaryKeyValue::new("Person", "email").into(),
            NoSubscriptionForWrite::new("write").into(),
            SyntaxError::new("syntax").into(),
            InvalidQuery::new("query").into(),
            InvalidQueryArgument::new("arg").into(),
            SerializationError::new("serial").into(),
            InvalidPath::new("path").into(),
        ];
        errs
    });
    assert_eq!(calls, 0);
    assert!(errs.iter().all(|e| e.trace().is_none()));
}

#[test]
fn decorated_kinds_capture_once_each() {
    let _guard = override_capture_policy(CapturePolicy::Enabled);
    let (_errs, calls) = captures_during(|| {
        let errs: Vec<Error> = vec![
            NoSuchTable::new().into(),
            TableNameInUse::new().into(),
            UnsupportedFileFormatVersion::new(3).into(),
            LogicError::new(LogicErrorKind::StringTooBig).into(),
        ];
        errs
    });
    assert_eq!(calls, 4);
}

#[test]
fn disabled_policy_still_counts_but_yields_empty_trace() {
    let _guard = override_capture_policy(CapturePolicy::Disabled);
    let (err, calls) = captures_during(NoSuchTable::new);
    assert_eq!(calls, 1);
    assert!(!err.trace().is_captured());
    assert_eq!(err.trace().render(), UNAVAILABLE);
    assert_eq!(err.message(), "No such table exists");
}

// ═══════════════════════════════════════════════════════════════════════════
// 2. Lazy rendering
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn construction_does_not_render() {
    let _guard = override_capture_policy(CapturePolicy::Enabled);
    let err = LogicError::new(LogicErrorKind::RowIndexOutOfRange);
    assert!(!err.trace().is_rendered());
    let _ = err.to_string();
    assert!(!err.trace().is_rendered());
    let _ = format!("{err:?}");
    assert!(!err.trace().is_rendered());
}

#[test]
fn diagnostic_starts_with_message_and_caches_rendering() {
    let _guard = override_capture_policy(CapturePolicy::Enabled);
    let err = TableNameInUse::new();
    let first = err.diagnostic();
    assert!(first.starts_with("The specified table name is already in use\n"));
    let rendered = err.trace().render();
    assert!(std::ptr::eq(rendered, err.trace().render()));
    assert_eq!(first, err.diagnostic());
}

#[test]
fn alternate_display_appends_backtrace() {
    let _guard = override_capture_policy(CapturePolicy::Disabled);
    let err = NoSuchTable::new();
    assert_eq!(format!("{err:#}"), format!("No such table exists\n{UNAVAILABLE}"));
}

#[test]
fn clones_share_the_capture() {
    let _guard = override_capture_policy(CapturePolicy::Enabled);
    let err = NoSuchTable::new();
    let copy = err.clone();
    if err.trace().is_captured() {
        assert!(err.trace().same_capture(copy.trace()));
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// 3. Threads
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn failures_on_different_threads_are_independent() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            thread::spawn(move || {
                let _guard = override_capture_policy(CapturePolicy::Enabled);
                let (err, calls) = captures_during(|| UnsupportedFileFormatVersion::new(i));
                assert_eq!(calls, 1);
                assert_eq!(err.source_version(), i);
                err
            })
        })
        .collect();

    let errs: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for (i, err) in errs.iter().enumerate() {
        assert!(err.message().contains(&format!("({i})")));
    }
}

#[test]
fn rendering_one_thread_failure_leaves_the_other_untouched() {
    let spawn = || {
        thread::spawn(|| {
            let _guard = override_capture_policy(CapturePolicy::Enabled);
            NoSuchTable::new()
        })
    };
    let (a, b) = (spawn(), spawn());
    let a = a.join().unwrap();
    let b = b.join().unwrap();
    assert!(!a.trace().same_capture(b.trace()));

    let text = a.trace().render().to_owned();
    assert!(!text.is_empty());
    assert!(!b.trace().is_rendered());
    assert!(!b.trace().render().is_empty());
}

#[test]
fn failure_crosses_threads_with_its_trace() {
    let _guard = override_capture_policy(CapturePolicy::Enabled);
    let err: Error = LogicError::new(LogicErrorKind::DetachedAccessor).into();
    let captured = err.trace().is_some_and(|t| t.is_captured());
    let moved = thread::spawn(move || err).join().unwrap();
    assert_eq!(moved.logic_error_kind(), Some(LogicErrorKind::DetachedAccessor));
    assert_eq!(
        moved.trace().is_some_and(|t| t.is_captured()),
        captured
    );
}
