//! `ErrorCodes` / `LSPErrorCodes` name↔value tables.
//!
//! [`crate::error::code`] holds the raw integer constants the rest of the
//! crate builds wire payloads from; this module is the schema-registry
//! counterpart that can name a code it receives back (useful for logging
//! a `HandlerRejection`'s chosen code, or validating one a `Handler`
//! returns).

use crate::error::LspError;

macro_rules! error_code_enum {
    ($name:ident { $($variant:ident = $value:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant = $value),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn by_value(value: i64) -> Result<Self, LspError> {
                match value {
                    $($value => Ok(Self::$variant),)+
                    other => Err(LspError::unknown_enum_value(stringify!($name), "value", other)),
                }
            }

            pub fn value(self) -> i64 {
                self as i64
            }

            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),+
                }
            }
        }
    };
}

error_code_enum!(ErrorCodes {
    ParseError = -32700,
    InvalidRequest = -32600,
    MethodNotFound = -32601,
    InvalidParams = -32602,
    InternalError = -32603,
    ServerNotInitialized = -32002,
    UnknownErrorCode = -32001,
});

error_code_enum!(LspErrorCodes {
    RequestFailed = -32803,
    ServerCancelled = -32802,
    ContentModified = -32801,
    RequestCancelled = -32800,
});

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn error_codes_round_trip() {
        for variant in ErrorCodes::ALL {
            assert_eq!(ErrorCodes::by_value(variant.value()).unwrap(), *variant);
        }
        for variant in LspErrorCodes::ALL {
            assert_eq!(LspErrorCodes::by_value(variant.value()).unwrap(), *variant);
        }
    }

    #[test]
    fn codes_match_the_error_module_constants() {
        use crate::error::code;
        assert_eq!(ErrorCodes::InvalidParams.value(), code::INVALID_PARAMS);
        assert_eq!(ErrorCodes::MethodNotFound.value(), code::METHOD_NOT_FOUND);
        assert_eq!(LspErrorCodes::ContentModified.value(), code::CONTENT_MODIFIED);
        assert_eq!(LspErrorCodes::RequestCancelled.value(), code::REQUEST_CANCELLED);
    }
}
