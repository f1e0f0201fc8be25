// SPDX-License-Identifier: MIT OR Apache-2.0
//! Call-stack capture for EmberDB failure diagnostics.
//!
//! [`capture`] records the active frames of the calling thread without
//! resolving symbols. The expensive part, turning addresses into readable
//! text, happens in [`Trace::render`], at most once per captured trace.
//!
//! Capture never fails: when it is disabled through [`CapturePolicy`] or the
//! platform cannot walk the stack, the returned [`Trace`] is simply empty and
//! renders as [`UNAVAILABLE`].

#![deny(unsafe_code)]
#![warn(missing_docs)]

use std::backtrace::{Backtrace, BacktraceStatus};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};

/// Text rendered for a trace that holds no frames.
pub const UNAVAILABLE: &str = "<backtrace unavailable>";

// ---------------------------------------------------------------------------
// CapturePolicy
// ---------------------------------------------------------------------------

/// Whether [`capture`] walks the stack or returns an empty trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CapturePolicy {
    /// Walk the stack on every capture.
    #[default]
    Enabled,
    /// Skip the stack walk; every capture yields an empty trace.
    Disabled,
}

impl CapturePolicy {
    const fn to_raw(self) -> u8 {
        match self {
            Self::Enabled => 0,
            Self::Disabled => 1,
        }
    }

    const fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Self::Disabled,
            _ => Self::Enabled,
        }
    }
}

static GLOBAL_POLICY: AtomicU8 = AtomicU8::new(CapturePolicy::Enabled.to_raw());

thread_local! {
    static POLICY_OVERRIDES: RefCell<Vec<(u64, CapturePolicy)>> = const { RefCell::new(Vec::new()) };
    static NEXT_OVERRIDE: Cell<u64> = const { Cell::new(0) };
    static CAPTURE_CALLS: Cell<u64> = const { Cell::new(0) };
}

/// Set the process-wide capture policy.
pub fn set_capture_policy(policy: CapturePolicy) {
    GLOBAL_POLICY.store(policy.to_raw(), Ordering::Relaxed);
    tracing::debug!(target: "ember.backtrace", ?policy, "capture policy updated");
}

/// The policy [`capture`] would apply on the current thread right now.
///
/// A thread-scoped override installed with [`override_capture_policy`] wins
/// over the process-wide setting.
pub fn capture_policy() -> CapturePolicy {
    POLICY_OVERRIDES
        .try_with(|stack| stack.borrow().last().map(|&(_, policy)| policy))
        .ok()
        .flatten()
        .unwrap_or_else(|| CapturePolicy::from_raw(GLOBAL_POLICY.load(Ordering::Relaxed)))
}

/// Override the capture policy for the current thread until the returned
/// guard is dropped.
///
/// Guards nest. The most recently installed live guard wins; dropping a
/// guard removes only its own override, in whatever order guards are dropped.
pub fn override_capture_policy(policy: CapturePolicy) -> PolicyGuard {
    let token = NEXT_OVERRIDE
        .try_with(|next| {
            let token = next.get();
            next.set(token.wrapping_add(1));
            token
        })
        .ok();
    if let Some(token) = token {
        let _ = POLICY_OVERRIDES.try_with(|stack| stack.borrow_mut().push((token, policy)));
    }
    PolicyGuard {
        token,
        _not_send: PhantomData,
    }
}

/// Removes its thread-scoped policy override on drop.
#[must_use = "the override is removed as soon as the guard is dropped"]
#[derive(Debug)]
pub struct PolicyGuard {
    token: Option<u64>,
    _not_send: PhantomData<*const ()>,
}

impl Drop for PolicyGuard {
    fn drop(&mut self) {
        let Some(token) = self.token else {
            return;
        };
        let _ = POLICY_OVERRIDES.try_with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(pos) = stack.iter().rposition(|&(t, _)| t == token) {
                stack.remove(pos);
            }
        });
    }
}

// ---------------------------------------------------------------------------
// Capture
// ---------------------------------------------------------------------------

/// Number of times [`capture`] has been called on the current thread.
///
/// Counts every call, including those that produced an empty trace.
pub fn capture_calls() -> u64 {
    CAPTURE_CALLS.try_with(Cell::get).unwrap_or(0)
}

/// Capture the calling thread's stack.
///
/// Frames are recorded unresolved. Symbolization is deferred to
/// [`Trace::render`].
pub fn capture() -> Trace {
    let _ = CAPTURE_CALLS.try_with(|calls| calls.set(calls.get().wrapping_add(1)));

    if capture_policy() == CapturePolicy::Disabled {
        return Trace::empty();
    }

    let backtrace = Backtrace::force_capture();
    match backtrace.status() {
        BacktraceStatus::Captured => Trace {
            captured: Some(Arc::new(Captured {
                backtrace,
                rendered: OnceLock::new(),
            })),
        },
        _ => Trace::empty(),
    }
}

/// Render `trace` as text. Equivalent to [`Trace::render`].
pub fn render(trace: &Trace) -> &str {
    trace.render()
}

// ---------------------------------------------------------------------------
// Trace
// ---------------------------------------------------------------------------

struct Captured {
    backtrace: Backtrace,
    rendered: OnceLock<String>,
}

/// Opaque handle to a captured call stack.
///
/// Cloning is cheap and clones share the rendered text, so a trace is
/// symbolized at most once no matter how many copies read it.
#[derive(Clone, Default)]
pub struct Trace {
    captured: Option<Arc<Captured>>,
}

impl Trace {
    /// A trace with no frames.
    pub const fn empty() -> Self {
        Self { captured: None }
    }

    /// `true` if frames were recorded at capture time.
    pub fn is_captured(&self) -> bool {
        self.captured.is_some()
    }

    /// `true` once the frames have been symbolized.
    pub fn is_rendered(&self) -> bool {
        self.captured
            .as_ref()
            .is_some_and(|c| c.rendered.get().is_some())
    }

    /// Human-readable frames, symbolized on first call and cached.
    ///
    /// Returns [`UNAVAILABLE`] for an empty trace or when symbolization
    /// produced no text.
    pub fn render(&self) -> &str {
        match &self.captured {
            Some(captured) => captured
                .rendered
                .get_or_init(|| symbolize(&captured.backtrace)),
            None => UNAVAILABLE,
        }
    }

    /// `true` if both handles refer to the same capture.
    pub fn same_capture(&self, other: &Trace) -> bool {
        match (&self.captured, &other.captured) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

fn symbolize(backtrace: &Backtrace) -> String {
    tracing::trace!(target: "ember.backtrace", "symbolizing captured backtrace");
    let text = backtrace.to_string();
    if text.trim().is_empty() {
        UNAVAILABLE.to_owned()
    } else {
        text
    }
}

impl fmt::Debug for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never symbolize from Debug.
        f.debug_struct("Trace")
            .field("captured", &self.is_captured())
            .field("rendered", &self.is_rendered())
            .finish()
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.render())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
