// SPDX-License-Identifier: MIT OR Apache-2.0
//! The [`Failure`] capability and the backtrace decorator.

use ember_backtrace::Trace;
use std::fmt;
use std::ops::Deref;

use crate::{ErrorCategory, ErrorCode};

// ---------------------------------------------------------------------------
// Failure
// ---------------------------------------------------------------------------

/// Surface shared by every failure kind.
///
/// Reading the message never fails and never symbolizes a backtrace.
pub trait Failure: std::error::Error + Send + Sync + 'static {
    /// Stable identity of the kind.
    fn code(&self) -> ErrorCode;

    /// Human-readable message.
    fn message(&self) -> &str;

    /// Backtrace captured at construction, for decorated kinds.
    fn trace(&self) -> Option<&Trace> {
        None
    }

    /// Shorthand for `self.code().category()`.
    fn category(&self) -> ErrorCategory {
        self.code().category()
    }
}

/// Base payload of a decorated kind.
pub trait Payload: fmt::Debug + Send + Sync + 'static {
    /// Identity of the kind this payload describes.
    const CODE: ErrorCode;

    /// Human-readable message.
    fn message(&self) -> &str;
}

// ---------------------------------------------------------------------------
// WithBacktrace
// ---------------------------------------------------------------------------

/// A payload together with the call stack active when it was built.
///
/// The stack is captured inside [`WithBacktrace::wrap`] but only symbolized
/// when [`diagnostic`](Self::diagnostic), alternate `Display` (`{:#}`) or
/// [`Trace::render`] is used. Payload accessors are reachable through
/// `Deref`.
#[derive(Clone)]
pub struct WithBacktrace<B> {
    base: B,
    trace: Trace,
}

impl<B> WithBacktrace<B> {
    /// Capture the current stack and attach it to `base`.
    pub fn wrap(base: B) -> Self {
        Self {
            base,
            trace: ember_backtrace::capture(),
        }
    }

    /// The wrapped payload.
    pub fn base(&self) -> &B {
        &self.base
    }

    /// The stack captured at construction.
    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Drop the trace and return the payload.
    pub fn into_base(self) -> B {
        self.base
    }
}

impl<B: Payload> WithBacktrace<B> {
    /// Human-readable message of the payload.
    pub fn message(&self) -> &str {
        self.base.message()
    }

    /// Message followed by the rendered backtrace.
    pub fn diagnostic(&self) -> String {
        format!("{}\n{}", self.base.message(), self.trace.render())
    }
}

impl<B: Default> Default for WithBacktrace<B> {
    fn default() -> Self {
        Self::wrap(B::default())
    }
}

impl<B> Deref for WithBacktrace<B> {
    type Target = B;

    fn deref(&self) -> &B {
        &self.base
    }
}

impl<B: Payload> fmt::Display for WithBacktrace<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base.message())?;
        if f.alternate() {
            write!(f, "\n{}", self.trace.render())?;
        }
        Ok(())
    }
}

impl<B: Payload> fmt::Debug for WithBacktrace<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WithBacktrace")
            .field("code", &B::CODE)
            .field("base", &self.base)
            .field("trace", &self.trace)
            .finish()
    }
}

impl<B: Payload> std::error::Error for WithBacktrace<B> {}

impl<B: Payload> Failure for WithBacktrace<B> {
    fn code(&self) -> ErrorCode {
        B::CODE
    }

    fn message(&self) -> &str {
        self.base.message()
    }

    fn trace(&self) -> Option<&Trace> {
        Some(&self.trace)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use ember_backtrace::{CapturePolicy, capture_calls, override_capture_policy};

    #[derive(Debug, Clone, PartialEq)]
    struct Sample(&'static str);

    impl Payload for Sample {
        const CODE: ErrorCode = ErrorCode::DescriptorMismatch;

        fn message(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn wrap_captures_exactly_once() {
        let before = capture_calls();
        let err = WithBacktrace::wrap(Sample("sample"));
        assert_eq!(capture_calls() - before, 1);
        assert_eq!(err.message(), "sample");
    }

    #[test]
    fn display_is_message_only() {
        let err = WithBacktrace::wrap(Sample("sample"));
        assert_eq!(err.to_string(), "sample");
        assert!(!err.trace().is_rendered());
    }

    #[test]
    fn alternate_display_appends_backtrace() {
        let _guard = override_capture_policy(CapturePolicy::Enabled);
        let err = WithBacktrace::wrap(Sample("sample"));
        let full = format!("{err:#}");
        assert!(full.starts_with("sample\n"));
        assert!(err.trace().is_rendered());
        assert_eq!(full, err.diagnostic());
    }

    #[test]
    fn diagnostic_uses_placeholder_without_frames() {
        let _guard = override_capture_policy(CapturePolicy::Disabled);
        let err = WithBacktrace::wrap(Sample("sample"));
        assert_eq!(
            err.diagnostic(),
            format!("sample\n{}", ember_backtrace::UNAVAILABLE)
        );
    }

    #[test]
    fn failure_surface() {
        let err = WithBacktrace::wrap(Sample("sample"));
        let failure: &dyn Failure = &err;
        assert_eq!(failure.code(), ErrorCode::DescriptorMismatch);
        assert_eq!(failure.category(), ErrorCategory::Public);
        assert!(failure.trace().is_some());
    }

    #[test]
    fn deref_and_into_base() {
        let err = WithBacktrace::wrap(Sample("sample"));
        assert_eq!(err.0, "sample");
        assert_eq!(err.into_base(), Sample("sample"));
    }

    #[test]
    fn clone_shares_trace() {
        let err = WithBacktrace::wrap(Sample("sample"));
        let copy = err.clone();
        assert!(err.trace().same_capture(copy.trace()) || !err.trace().is_captured());
    }

    #[test]
    fn debug_includes_code_without_rendering() {
        let err = WithBacktrace::wrap(Sample("sample"));
        let dbg = format!("{err:?}");
        assert!(dbg.contains("DescriptorMismatch"));
        assert!(dbg.contains("sample"));
        assert!(!err.trace().is_rendered());
    }
}
