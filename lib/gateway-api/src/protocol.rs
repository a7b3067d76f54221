//! Protocol tags advertised at registration and target-address schemes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Protocol a registered service speaks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Https,
    Grpc,
    Grpcs,
}

impl Default for Protocol {
    fn default() -> Self {
        Protocol::Http
    }
}

impl Protocol {
    pub const ALL: [Protocol; 4] =
        [Protocol::Http, Protocol::Https, Protocol::Grpc, Protocol::Grpcs];

    /// Tag sent in the registration body
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
            Protocol::Grpc => "grpc",
            Protocol::Grpcs => "grpcs",
        }
    }

    /// URL scheme prefix, e.g. `grpcs://`
    pub fn scheme(&self) -> &'static str {
        match self {
            Protocol::Http => "http://",
            Protocol::Https => "https://",
            Protocol::Grpc => "grpc://",
            Protocol::Grpcs => "grpcs://",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown protocol tag: {0}")]
pub struct ProtocolParseError(pub String);

impl FromStr for Protocol {
    type Err = ProtocolParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Protocol::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ProtocolParseError(s.to_string()))
    }
}

/// Strip a recognized scheme from a target address.
///
/// Returns `None` when the target carries none of the four known schemes.
pub fn strip_target_scheme(target: &str) -> Option<&str> {
    Protocol::ALL
        .iter()
        .find_map(|p| target.strip_prefix(p.scheme()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_known_schemes() {
        assert_eq!(strip_target_scheme("grpcs://10.0.0.1:9000"), Some("10.0.0.1:9000"));
        assert_eq!(strip_target_scheme("grpc://10.0.0.1:9000"), Some("10.0.0.1:9000"));
        assert_eq!(strip_target_scheme("http://forum:8080"), Some("forum:8080"));
        assert_eq!(strip_target_scheme("https://forum:8443"), Some("forum:8443"));
    }

    #[test]
    fn test_reject_unknown_scheme() {
        assert_eq!(strip_target_scheme("10.0.0.1:9000"), None);
        assert_eq!(strip_target_scheme("tcp://10.0.0.1:9000"), None);
        assert_eq!(strip_target_scheme(""), None);
    }

    #[test]
    fn test_parse_protocol() {
        assert_eq!("grpc".parse::<Protocol>(), Ok(Protocol::Grpc));
        assert_eq!("HTTPS".parse::<Protocol>(), Ok(Protocol::Https));
        assert!("quic".parse::<Protocol>().is_err());
    }

    #[test]
    fn test_serde_tag() {
        assert_eq!(serde_json::to_string(&Protocol::Grpcs).unwrap(), "\"grpcs\"");
        let parsed: Protocol = serde_json::from_str("\"http\"").unwrap();
        assert_eq!(parsed, Protocol::Http);
    }
}
