// SPDX-License-Identifier: MIT OR Apache-2.0
//! Logging a failure at the point where it is consumed.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{Error, ErrorCategory, ErrorCode, LogicErrorKind};

/// Knobs for [`log_failure`] and [`FailureReport::from_error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportOptions {
    /// Render and include the backtrace of decorated kinds.
    pub include_backtrace: bool,
}

/// Serialisable snapshot of an [`Error`] for log records and bug reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FailureReport {
    /// Identity of the kind.
    pub code: ErrorCode,
    /// Category of the kind.
    pub category: ErrorCategory,
    /// Human-readable message.
    pub message: String,
    /// The broken rule, for logic errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logic_kind: Option<LogicErrorKind>,
    /// Rendered backtrace, when requested and available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backtrace: Option<String>,
}

impl FailureReport {
    /// Snapshot `err`. Rendering the backtrace is only paid for when
    /// `options.include_backtrace` is set.
    pub fn from_error(err: &Error, options: &ReportOptions) -> Self {
        let backtrace = if options.include_backtrace {
            err.trace().map(|t| t.render().to_owned())
        } else {
            None
        };
        Self {
            code: err.code(),
            category: err.category(),
            message: err.message().to_owned(),
            logic_kind: err.logic_error_kind(),
            backtrace,
        }
    }
}

impl From<&Error> for FailureReport {
    fn from(err: &Error) -> Self {
        Self::from_error(err, &ReportOptions::default())
    }
}

/// Emit one `tracing` event for a consumed failure on target `ember.error`.
///
/// Logic errors log at `error`, resource exhaustion at `warn`, everything
/// else at `info`.
pub fn log_failure(err: &Error, options: &ReportOptions) {
    let code = err.code();
    let category = err.category();
    let message = err.message();
    // Rendered by the subscriber on record; filtered events never symbolize.
    let backtrace = err
        .trace()
        .filter(|_| options.include_backtrace)
        .map(tracing::field::display);

    match category {
        ErrorCategory::Internal => tracing::error!(
            target: "ember.error",
            %code,
            %category,
            logic_kind = err.logic_error_kind().map(|k| k.as_str()),
            backtrace,
            "{message}"
        ),
        ErrorCategory::Resource => tracing::warn!(
            target: "ember.error",
            %code,
            %category,
            "{message}"
        ),
        ErrorCategory::Public | ErrorCategory::Structured | ErrorCategory::Query => {
            tracing::info!(
                target: "ember.error",
                %code,
                %category,
                backtrace,
                "{message}"
            )
        }
    }
}
