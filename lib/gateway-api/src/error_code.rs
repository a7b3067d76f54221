//! Structured error codes carried in the `err_code` field of gateway responses
//!
//! The gateway mixes numeric and string codes in the same field. They are
//! decoded once here so callers only ever match on [`ErrorCode`].

use serde::{Deserialize, Deserializer};
use std::fmt;

/// String code the gateway sends when the registration password has rotated
pub const CREDENTIAL_STALE_CODE: &str = "Error.RedisDynamicPassword";

/// Numeric code the gateway sends when a route is already published
pub const ROUTE_EXISTS_CODE: i64 = 410100;

/// Decoded `err_code` value
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ErrorCode {
    /// No error code, `0`, or an empty string
    #[default]
    Ok,
    /// The registration credential no longer matches the gateway's copy
    CredentialStale,
    /// The published route is already present in the routing directory
    RouteExists,
    /// Any other code, kept verbatim
    Other(String),
}

impl ErrorCode {
    pub fn is_ok(&self) -> bool {
        matches!(self, ErrorCode::Ok)
    }

    fn from_number(code: i64) -> Self {
        match code {
            0 => ErrorCode::Ok,
            ROUTE_EXISTS_CODE => ErrorCode::RouteExists,
            other => ErrorCode::Other(other.to_string()),
        }
    }

    fn from_text(code: &str) -> Self {
        match code.trim() {
            "" | "0" => ErrorCode::Ok,
            CREDENTIAL_STALE_CODE => ErrorCode::CredentialStale,
            other => match other.parse::<i64>() {
                Ok(number) => Self::from_number(number),
                Err(_) => ErrorCode::Other(other.to_string()),
            },
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Ok => write!(f, "ok"),
            ErrorCode::CredentialStale => write!(f, "{}", CREDENTIAL_STALE_CODE),
            ErrorCode::RouteExists => write!(f, "{}", ROUTE_EXISTS_CODE),
            ErrorCode::Other(code) => write!(f, "{}", code),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCode {
    Number(i64),
    Float(f64),
    Text(String),
    Flag(bool),
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<RawCode>::deserialize(deserializer)?;
        Ok(match raw {
            None => ErrorCode::Ok,
            Some(RawCode::Number(code)) => ErrorCode::from_number(code),
            Some(RawCode::Float(code)) if code.fract() == 0.0 => {
                ErrorCode::from_number(code as i64)
            }
            Some(RawCode::Float(code)) => ErrorCode::Other(code.to_string()),
            Some(RawCode::Text(code)) => ErrorCode::from_text(&code),
            Some(RawCode::Flag(flag)) => ErrorCode::Other(flag.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Body {
        #[serde(default)]
        err_code: ErrorCode,
    }

    fn decode(json: &str) -> ErrorCode {
        serde_json::from_str::<Body>(json).unwrap().err_code
    }

    #[test]
    fn test_numeric_codes() {
        assert_eq!(decode(r#"{"err_code": 410100}"#), ErrorCode::RouteExists);
        assert_eq!(decode(r#"{"err_code": 0}"#), ErrorCode::Ok);
        assert_eq!(decode(r#"{"err_code": 500}"#), ErrorCode::Other("500".to_string()));
    }

    #[test]
    fn test_string_codes() {
        assert_eq!(
            decode(r#"{"err_code": "Error.RedisDynamicPassword"}"#),
            ErrorCode::CredentialStale
        );
        assert_eq!(decode(r#"{"err_code": "410100"}"#), ErrorCode::RouteExists);
        assert_eq!(decode(r#"{"err_code": ""}"#), ErrorCode::Ok);
        assert_eq!(
            decode(r#"{"err_code": "Error.Unknown"}"#),
            ErrorCode::Other("Error.Unknown".to_string())
        );
    }

    #[test]
    fn test_missing_and_null_codes() {
        assert_eq!(decode(r#"{}"#), ErrorCode::Ok);
        assert_eq!(decode(r#"{"err_code": null}"#), ErrorCode::Ok);
    }

    #[test]
    fn test_float_code_from_loose_encoders() {
        assert_eq!(decode(r#"{"err_code": 410100.0}"#), ErrorCode::RouteExists);
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::CredentialStale.to_string(), "Error.RedisDynamicPassword");
        assert_eq!(ErrorCode::RouteExists.to_string(), "410100");
    }
}
