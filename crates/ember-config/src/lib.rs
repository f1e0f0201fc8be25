// SPDX-License-Identifier: MIT OR Apache-2.0
//! Diagnostics configuration for EmberDB.
//!
//! [`DiagnosticsConfig`] controls whether decorated failures capture a
//! backtrace, and how consumed failures are logged. It is loaded from TOML,
//! overlaid with `EMBER_*` environment variables, validated into advisory
//! [`ConfigWarning`]s, and finally installed with [`DiagnosticsConfig::apply`].
#![deny(unsafe_code)]
#![warn(missing_docs)]

use ember_backtrace::CapturePolicy;
use ember_error::ReportOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration loading or validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The requested configuration file was not found.
    #[error("config file not found: {path}")]
    FileNotFound {
        /// Path that was requested.
        path: String,
    },

    /// The file exists but could not be read as UTF-8 text.
    #[error("failed to read config {path}: {reason}")]
    ReadError {
        /// Path that was requested.
        path: String,
        /// Underlying I/O error detail.
        reason: String,
    },

    /// The file could not be parsed as valid TOML.
    #[error("failed to parse config: {reason}")]
    ParseError {
        /// Human-readable parse error detail.
        reason: String,
    },

    /// Semantic validation failed (one or more problems).
    #[error("config validation failed: {reasons:?}")]
    ValidationError {
        /// Individual validation failure messages.
        reasons: Vec<String>,
    },
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

/// Advisory-level issues that do not prevent operation but deserve attention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// Backtrace capture is off; decorated failures will carry no frames.
    CaptureDisabled,
    /// Backtrace logging is on but nothing is captured to log.
    IneffectiveLogBacktraces,
    /// Every logged decorated failure will be symbolized.
    ExpensiveBacktraceLogging {
        /// Configured log level.
        log_level: String,
    },
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigWarning::CaptureDisabled => {
                write!(f, "backtrace capture is disabled; failures will carry no frames")
            }
            ConfigWarning::IneffectiveLogBacktraces => write!(
                f,
                "log_backtraces has no effect while capture_backtraces is false"
            ),
            ConfigWarning::ExpensiveBacktraceLogging { log_level } => write!(
                f,
                "log_backtraces symbolizes every logged failure at level '{log_level}'"
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

/// Diagnostics settings for failure capture and logging.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct DiagnosticsConfig {
    /// Capture a backtrace when a decorated failure is built.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capture_backtraces: Option<bool>,

    /// Log level override (e.g. `"debug"`, `"info"`, `"warn"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Include rendered backtraces in failure log events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_backtraces: Option<bool>,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            capture_backtraces: Some(true),
            log_level: Some("info".into()),
            log_backtraces: Some(false),
        }
    }
}

impl DiagnosticsConfig {
    /// Capture policy implied by `capture_backtraces` (enabled when unset).
    pub fn capture_policy(&self) -> CapturePolicy {
        match self.capture_backtraces {
            Some(false) => CapturePolicy::Disabled,
            _ => CapturePolicy::Enabled,
        }
    }

    /// Report options implied by `log_backtraces` (off when unset).
    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            include_backtrace: self.log_backtraces.unwrap_or(false),
        }
    }

    /// Log level for the `ember` targets, `"info"` when unset.
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    /// Filter for the `ember.*` log targets at the configured level.
    ///
    /// Library crates never install a subscriber; the host binary passes
    /// this to `tracing_subscriber::fmt().with_env_filter(..)`.
    pub fn env_filter(&self) -> Result<EnvFilter, ConfigError> {
        let level = self.log_level();
        if !VALID_LOG_LEVELS.contains(&level) {
            return Err(ConfigError::ValidationError {
                reasons: vec![format!("invalid log_level '{level}'")],
            });
        }
        EnvFilter::try_new(format!("ember={level}")).map_err(|e| ConfigError::ParseError {
            reason: e.to_string(),
        })
    }

    /// Install the capture policy process-wide.
    pub fn apply(&self) {
        let policy = self.capture_policy();
        ember_backtrace::set_capture_policy(policy);
        tracing::debug!(
            target: "ember.config",
            ?policy,
            log_level = self.log_level(),
            log_backtraces = self.report_options().include_backtrace,
            "diagnostics config applied"
        );
    }
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Recognised log levels.
const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Environment variable overriding `capture_backtraces`.
pub const ENV_CAPTURE_BACKTRACES: &str = "EMBER_CAPTURE_BACKTRACES";
/// Environment variable overriding `log_level`.
pub const ENV_LOG_LEVEL: &str = "EMBER_LOG_LEVEL";
/// Environment variable overriding `log_backtraces`.
pub const ENV_LOG_BACKTRACES: &str = "EMBER_LOG_BACKTRACES";

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load a [`DiagnosticsConfig`] from an optional TOML file path.
///
/// * If `path` is `Some`, reads and parses the file.
/// * If `path` is `None`, returns [`DiagnosticsConfig::default()`].
///
/// Environment variable overrides are applied on top in both cases.
pub fn load_config(path: Option<&Path>) -> Result<DiagnosticsConfig, ConfigError> {
    let mut config = match path {
        Some(p) => {
            let content = std::fs::read_to_string(p).map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                    path: p.display().to_string(),
                },
                _ => ConfigError::ReadError {
                    path: p.display().to_string(),
                    reason: e.to_string(),
                },
            })?;
            parse_toml(&content)?
        }
        None => DiagnosticsConfig::default(),
    };
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Parse a TOML string into a [`DiagnosticsConfig`].
pub fn parse_toml(content: &str) -> Result<DiagnosticsConfig, ConfigError> {
    toml::from_str::<DiagnosticsConfig>(content).map_err(|e| ConfigError::ParseError {
        reason: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Env overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides from the process environment.
///
/// Recognised variables:
/// - `EMBER_CAPTURE_BACKTRACES`
/// - `EMBER_LOG_LEVEL`
/// - `EMBER_LOG_BACKTRACES`
pub fn apply_env_overrides(config: &mut DiagnosticsConfig) {
    apply_env_overrides_from(config, |key| std::env::var(key).ok());
}

/// Apply overrides read through `lookup` instead of the process environment.
///
/// Boolean variables accept `1/0`, `true/false`, `yes/no` and `on/off`;
/// anything else is ignored with a warning.
pub fn apply_env_overrides_from<F>(config: &mut DiagnosticsConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup(ENV_CAPTURE_BACKTRACES) {
        match parse_bool(&val) {
            Some(b) => config.capture_backtraces = Some(b),
            None => ignored_override(ENV_CAPTURE_BACKTRACES, &val),
        }
    }
    if let Some(val) = lookup(ENV_LOG_LEVEL) {
        config.log_level = Some(val);
    }
    if let Some(val) = lookup(ENV_LOG_BACKTRACES) {
        match parse_bool(&val) {
            Some(b) => config.log_backtraces = Some(b),
            None => ignored_override(ENV_LOG_BACKTRACES, &val),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn ignored_override(var: &str, value: &str) {
    tracing::warn!(target: "ember.config", var, value, "ignoring non-boolean override");
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a parsed configuration, returning advisory warnings.
///
/// An unknown log level is a hard [`ConfigError::ValidationError`]; the
/// backtrace settings only ever produce warnings.
pub fn validate_config(config: &DiagnosticsConfig) -> Result<Vec<ConfigWarning>, ConfigError> {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<ConfigWarning> = Vec::new();

    if let Some(ref level) = config.log_level {
        if !VALID_LOG_LEVELS.contains(&level.as_str()) {
            errors.push(format!("invalid log_level '{level}'"));
        }
    }

    let capture = config.capture_policy() == CapturePolicy::Enabled;
    let log_backtraces = config.report_options().include_backtrace;

    if !capture {
        warnings.push(ConfigWarning::CaptureDisabled);
        if log_backtraces {
            warnings.push(ConfigWarning::IneffectiveLogBacktraces);
        }
    } else if log_backtraces {
        warnings.push(ConfigWarning::ExpensiveBacktraceLogging {
            log_level: config.log_level.clone().unwrap_or_else(|| "info".into()),
        });
    }

    if errors.is_empty() {
        Ok(warnings)
    } else {
        Err(ConfigError::ValidationError { reasons: errors })
    }
}

// ---------------------------------------------------------------------------
// Merging
// ---------------------------------------------------------------------------

/// Merge two configurations.  Values in `overlay` take precedence over `base`.
pub fn merge_configs(base: DiagnosticsConfig, overlay: DiagnosticsConfig) -> DiagnosticsConfig {
    DiagnosticsConfig {
        capture_backtraces: overlay.capture_backtraces.or(base.capture_backtraces),
        log_level: overlay.log_level.or(base.log_level),
        log_backtraces: overlay.log_backtraces.or(base.log_backtraces),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
