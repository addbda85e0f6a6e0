//! HTTP methods a resource route can be bound to

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ResourceError;

/// HTTP method of a generated route
///
/// Parsing is case-insensitive, so route files may say `get`, `GET` or `Get`.
///
/// # Examples
///
/// ```
/// use rhtmx_resources::HttpMethod;
///
/// let method: HttpMethod = "post".parse().unwrap();
/// assert_eq!(method, HttpMethod::Post);
/// assert_eq!(method.as_str(), "POST");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    /// Canonical upper-case spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
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
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            "HEAD" => Ok(HttpMethod::Head),
            "OPTIONS" => Ok(HttpMethod::Options),
            _ => Err(ResourceError::UnknownMethod(s.to_string())),
        }
    }
}

impl TryFrom<String> for HttpMethod {
    type Error = ResourceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HttpMethod> for String {
    fn from(method: HttpMethod) -> Self {
        method.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("DELETE".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
        assert_eq!(" Patch ".parse::<HttpMethod>().unwrap(), HttpMethod::Patch);
    }

    #[test]
    fn test_parse_unknown_method() {
        let err = "fetch".parse::<HttpMethod>().unwrap_err();
        assert_eq!(err, ResourceError::UnknownMethod("fetch".to_string()));
    }

    #[test]
    fn test_serde_uses_upper_case() {
        let json = serde_json::to_string(&HttpMethod::Put).unwrap();
        assert_eq!(json, "\"PUT\"");
        let back: HttpMethod = serde_json::from_str("\"put\"").unwrap();
        assert_eq!(back, HttpMethod::Put);
    }
}
