// SPDX-License-Identifier: MIT OR Apache-2.0

/// Declares a bare, message-only kind. No backtrace is captured.
macro_rules! message_failure {
    ($(#[$meta:meta])* $name:ident => $code:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        #[error("{message}")]
        pub struct $name {
            message: String,
        }

        impl $name {
            /// Build the failure with a message chosen by the raising site.
            pub fn new(message: impl Into<String>) -> Self {
                Self {
                    message: message.into(),
                }
            }

            /// The message given at construction.
            pub fn message(&self) -> &str {
                &self.message
            }
        }

        impl $crate::Failure for $name {
            fn code(&self) -> $crate::ErrorCode {
                $crate::ErrorCode::$code
            }

            fn message(&self) -> &str {
                &self.message
            }
        }
    };
}

/// Declares the unit payload of a decorated kind with a fixed message.
macro_rules! fixed_payload {
    ($(#[$meta:meta])* $name:ident => $code:ident, $message:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name;

        impl $name {
            /// The fixed message of this kind.
            pub const MESSAGE: &'static str = $message;
        }

        impl $crate::Payload for $name {
            const CODE: $crate::ErrorCode = $crate::ErrorCode::$code;

            fn message(&self) -> &str {
                Self::MESSAGE
            }
        }
    };
}

pub(crate) use {fixed_payload, message_failure};
