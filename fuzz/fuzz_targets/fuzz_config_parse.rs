// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fuzz DiagnosticsConfig parsing, environment overrides and the settings
//! derived from them.
//!
//! The input is split on NUL bytes into a TOML document followed by values
//! for `EMBER_CAPTURE_BACKTRACES`, `EMBER_LOG_LEVEL` and
//! `EMBER_LOG_BACKTRACES`. Verifies:
//! 1. `parse_toml` never panics; an unparseable document starts from defaults.
//! 2. Boolean overrides set their field only for accepted spellings.
//! 3. The log level override is taken verbatim.
//! 4. `capture_policy()` and `report_options()` agree with the fields.
//! 5. Validation warnings agree with the fields.
//! 6. `env_filter()` succeeds exactly when validation does.
#![no_main]
use ember_backtrace::CapturePolicy;
use ember_config::{
    ConfigWarning, DiagnosticsConfig, ENV_CAPTURE_BACKTRACES, ENV_LOG_BACKTRACES, ENV_LOG_LEVEL,
};
use libfuzzer_sys::fuzz_target;

fn accepted_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(s) => s,
        Err(_) => return,
    };
    let mut parts = s.split('\0');
    let document = parts.next().unwrap_or_default();
    let capture = parts.next().map(str::to_owned);
    let level = parts.next().map(str::to_owned);
    let log_backtraces = parts.next().map(str::to_owned);

    // --- Property 1: parse_toml never panics ---
    let base = ember_config::parse_toml(document).unwrap_or_default();

    let mut config = base.clone();
    ember_config::apply_env_overrides_from(&mut config, |key| match key {
        ENV_CAPTURE_BACKTRACES => capture.clone(),
        ENV_LOG_LEVEL => level.clone(),
        ENV_LOG_BACKTRACES => log_backtraces.clone(),
        _ => None,
    });

    // --- Property 2: boolean overrides ---
    let expected = capture
        .as_deref()
        .and_then(accepted_bool)
        .map(Some)
        .unwrap_or(base.capture_backtraces);
    assert_eq!(config.capture_backtraces, expected);
    let expected = log_backtraces
        .as_deref()
        .and_then(accepted_bool)
        .map(Some)
        .unwrap_or(base.log_backtraces);
    assert_eq!(config.log_backtraces, expected);

    // --- Property 3: log level override ---
    match &level {
        Some(level) => assert_eq!(config.log_level.as_deref(), Some(level.as_str())),
        None => assert_eq!(config.log_level, base.log_level),
    }

    // --- Property 4: derived settings ---
    let disabled = config.capture_backtraces == Some(false);
    assert_eq!(config.capture_policy() == CapturePolicy::Disabled, disabled);
    let include = config.log_backtraces == Some(true);
    assert_eq!(config.report_options().include_backtrace, include);

    // --- Properties 5 and 6: validation and the log filter ---
    let validated = ember_config::validate_config(&config);
    assert_eq!(validated.is_ok(), config.env_filter().is_ok());
    if let Ok(warnings) = validated {
        assert_eq!(warnings.contains(&ConfigWarning::CaptureDisabled), disabled);
        assert_eq!(
            warnings.contains(&ConfigWarning::IneffectiveLogBacktraces),
            disabled && include
        );
        let expensive = warnings
            .iter()
            .any(|w| matches!(w, ConfigWarning::ExpensiveBacktraceLogging { .. }));
        assert_eq!(expensive, !disabled && include);
    }
});
