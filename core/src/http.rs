//! HTTP method model shared by the request builder and the transports.
//!
//! # Design
//! The host hands methods over as text, so `HttpMethod` parses
//! case-insensitively and rejects anything outside the seven supported
//! verbs. Whether a method carries a request body decides both how the URL
//! is built and how the transport is configured.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownMethod;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Head,
    Put,
    Delete,
    Patch,
    Options,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Head,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Options,
    ];

    /// True for every method that sends parameters in the request body
    /// instead of the query string.
    pub fn is_like_post(self) -> bool {
        !matches!(self, HttpMethod::Get | HttpMethod::Head)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Head => "HEAD",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownMethod(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_and_head_are_not_like_post() {
        assert!(!HttpMethod::Get.is_like_post());
        assert!(!HttpMethod::Head.is_like_post());
    }

    #[test]
    fn body_carrying_methods_are_like_post() {
        for m in [
            HttpMethod::Post,
            HttpMethod::Put,
            HttpMethod::Delete,
            HttpMethod::Patch,
            HttpMethod::Options,
        ] {
            assert!(m.is_like_post(), "{m} should carry a body");
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("Patch".parse::<HttpMethod>().unwrap(), HttpMethod::Patch);
        assert_eq!("OPTIONS".parse::<HttpMethod>().unwrap(), HttpMethod::Options);
    }

    #[test]
    fn parse_rejects_unknown_verbs() {
        let err = "TRACE".parse::<HttpMethod>().unwrap_err();
        assert_eq!(err.0, "TRACE");
    }

    #[test]
    fn display_matches_wire_name() {
        for m in HttpMethod::ALL {
            assert_eq!(m.to_string(), m.as_str());
            assert_eq!(m.as_str().parse::<HttpMethod>().unwrap(), m);
        }
    }

    #[test]
    fn default_is_get() {
        assert_eq!(HttpMethod::default(), HttpMethod::Get);
    }
}
