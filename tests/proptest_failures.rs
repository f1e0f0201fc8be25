// SPDX-License-Identifier: MIT OR Apache-2.0
//! Property-based tests for failure construction, translation and config.

use proptest::prelude::*;

use ember_backtrace::{CapturePolicy, capture_calls, override_capture_policy};
use ember_config::{
    ConfigWarning, DiagnosticsConfig, ENV_CAPTURE_BACKTRACES, ENV_LOG_BACKTRACES,
    apply_env_overrides_from, merge_configs, parse_toml, validate_config,
};
use ember_error::{
    Boundary, DescriptorMismatch, Error, ErrorCode, FailureReport, InvalidPath, InvalidTableRef,
    KeyNotFound, LogicError, LogicErrorKind, NoSuchTable, OutOfDiskSpace, SyntaxError,
    UnsupportedFileFormatVersion,
};

// ── Strategies ──────────────────────────────────────────────────────────

fn fast_config() -> ProptestConfig {
    ProptestConfig {
        cases: 64,
        ..ProptestConfig::default()
    }
}

fn arb_logic_kind() -> BoxedStrategy<LogicErrorKind> {
    (0..LogicErrorKind::ALL.len())
        .prop_map(|i| LogicErrorKind::ALL[i])
        .boxed()
}

fn arb_code() -> BoxedStrategy<ErrorCode> {
    (0..ErrorCode::ALL.len())
        .prop_map(|i| ErrorCode::ALL[i])
        .boxed()
}

fn arb_bare_error() -> BoxedStrategy<Error> {
    prop_oneof![
        ".{0,40}".prop_map(|m| Error::from(OutOfDiskSpace::new(m))),
        ".{0,40}".prop_map(|m| Error::from(KeyNotFound::new(m))),
        ".{0,40}".prop_map(|m| Error::from(SyntaxError::new(m))),
        ".{0,40}".prop_map(|m| Error::from(InvalidPath::new(m))),
    ]
    .boxed()
}

fn arb_public_error() -> BoxedStrategy<Error> {
    prop_oneof![
        Just(()).prop_map(|_| Error::from(NoSuchTable::new())),
        Just(()).prop_map(|_| Error::from(DescriptorMismatch::new())),
        ".{0,40}".prop_map(|c| Error::from(InvalidTableRef::new(c))),
        any::<i32>().prop_map(|v| Error::from(UnsupportedFileFormatVersion::new(v))),
        arb_logic_kind().prop_map(Error::from),
    ]
    .boxed()
}

fn arb_error() -> BoxedStrategy<Error> {
    prop_oneof![arb_bare_error(), arb_public_error()].boxed()
}

fn arb_boundary() -> BoxedStrategy<Boundary> {
    prop_oneof![Just(Boundary::TableApi), Just(Boundary::QueryBinding)].boxed()
}

fn arb_config() -> BoxedStrategy<DiagnosticsConfig> {
    (
        proptest::option::of(any::<bool>()),
        proptest::option::of(prop_oneof![
            Just("error".to_owned()),
            Just("warn".to_owned()),
            Just("info".to_owned()),
            Just("debug".to_owned()),
            Just("trace".to_owned()),
        ]),
        proptest::option::of(any::<bool>()),
    )
        .prop_map(
            |(capture_backtraces, log_level, log_backtraces)| DiagnosticsConfig {
                capture_backtraces,
                log_level,
                log_backtraces,
            },
        )
        .boxed()
}

fn arb_env_value() -> BoxedStrategy<Option<String>> {
    proptest::option::of(prop_oneof![
        Just("1".to_owned()),
        Just("off".to_owned()),
        Just(" Yes ".to_owned()),
        Just("FALSE".to_owned()),
        "[a-z0-9 ]{0,6}",
    ])
    .boxed()
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(fast_config())]

    #[test]
    fn logic_error_keeps_kind_and_captures_once(kind in arb_logic_kind()) {
        let _guard = override_capture_policy(CapturePolicy::Disabled);
        let before = capture_calls();
        let err: Error = LogicError::new(kind).into();
        prop_assert_eq!(capture_calls() - before, 1);
        prop_assert_eq!(err.logic_error_kind(), Some(kind));
        prop_assert_eq!(err.message(), kind.message());
    }

    #[test]
    fn bare_errors_keep_message_and_never_capture(err in arb_bare_error()) {
        prop_assert!(err.trace().is_none());
        prop_assert!(!err.is_decorated());
        prop_assert_eq!(err.to_string(), err.message());
    }

    #[test]
    fn translation_keeps_identity_of_untouched_kinds(
        err in arb_error(),
        boundary in arb_boundary(),
    ) {
        let code = err.code();
        let message = err.message().to_owned();
        let logic_kind = err.logic_error_kind();
        let trace = err.trace().cloned();
        let out = err.translate(boundary);
        match (boundary, code) {
            (Boundary::TableApi, ErrorCode::KeyNotFound) => {
                prop_assert_eq!(out.code(), ErrorCode::NoSuchTable);
            }
            (Boundary::QueryBinding, ErrorCode::InvalidPath) => {
                prop_assert_eq!(out.code(), ErrorCode::InvalidQuery);
                prop_assert_eq!(out.message(), message.as_str());
            }
            _ => {
                prop_assert_eq!(out.code(), code);
                prop_assert_eq!(out.message(), message.as_str());
                prop_assert_eq!(out.logic_error_kind(), logic_kind);
                if let Some(trace) = trace.filter(|t| t.is_captured()) {
                    prop_assert!(out.trace().is_some_and(|t| t.same_capture(&trace)));
                }
            }
        }
    }

    #[test]
    fn unsupported_version_message_contains_version(v in any::<i32>()) {
        let _guard = override_capture_policy(CapturePolicy::Disabled);
        let err = UnsupportedFileFormatVersion::new(v);
        let needle = format!("({v})");
        prop_assert!(err.message().contains(&needle));
    }

    #[test]
    fn code_category_is_stable(code in arb_code()) {
        prop_assert_eq!(code.is_decorated(), code.category().is_decorated());
        let json = serde_json::to_string(&code).unwrap();
        let back: ErrorCode = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, code);
    }

    #[test]
    fn report_json_roundtrips(err in arb_bare_error()) {
        let report = FailureReport::from(&err);
        let json = serde_json::to_string(&report).unwrap();
        let back: FailureReport = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, report);
    }

    #[test]
    fn valid_configs_always_validate(cfg in arb_config()) {
        prop_assert!(validate_config(&cfg).is_ok());
    }

    #[test]
    fn env_overrides_keep_derived_settings_consistent(
        cfg in arb_config(),
        capture in arb_env_value(),
        log_backtraces in arb_env_value(),
    ) {
        let mut cfg = cfg;
        apply_env_overrides_from(&mut cfg, |key| match key {
            ENV_CAPTURE_BACKTRACES => capture.clone(),
            ENV_LOG_BACKTRACES => log_backtraces.clone(),
            _ => None,
        });
        let disabled = cfg.capture_backtraces == Some(false);
        let include = cfg.log_backtraces == Some(true);
        prop_assert_eq!(cfg.capture_policy() == CapturePolicy::Disabled, disabled);
        prop_assert_eq!(cfg.report_options().include_backtrace, include);
        let warnings = validate_config(&cfg).unwrap();
        prop_assert_eq!(warnings.contains(&ConfigWarning::CaptureDisabled), disabled);
        prop_assert_eq!(
            warnings.contains(&ConfigWarning::IneffectiveLogBacktraces),
            disabled && include
        );
        prop_assert!(cfg.env_filter().is_ok());
    }

    #[test]
    fn merge_with_self_is_identity(cfg in arb_config()) {
        let merged = merge_configs(cfg.clone(), cfg.clone());
        prop_assert_eq!(merged, cfg);
    }

    #[test]
    fn config_survives_toml(cfg in arb_config()) {
        let text = toml::to_string(&cfg).unwrap();
        let back = parse_toml(&text).unwrap();
        prop_assert_eq!(back, cfg);
    }
}
