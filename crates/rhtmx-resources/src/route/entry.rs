//! Concrete routes produced by resource expansion.

use serde::Serialize;
use std::collections::HashMap;

use super::pattern::PathPattern;
use crate::method::HttpMethod;

/// Controller and action a route dispatches to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Target {
    pub controller: String,
    pub action: String,
}

impl Target {
    pub fn new(controller: impl Into<String>, action: impl Into<String>) -> Self {
        Target {
            controller: controller.into(),
            action: action.into(),
        }
    }
}

/// One (pattern, method, target, name) mapping
///
/// Entries are built once when the route table is declared and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    /// URL pattern, e.g. `/posts/:id(.:format)`
    pub pattern: PathPattern,
    pub method: HttpMethod,
    pub target: Target,
    /// Route name used by URL helpers, e.g. `edit_post`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Reverse-registration identifier, e.g. `["Post", "edit"]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Vec<String>>,
    /// Placeholders every URL for this route must supply, in order
    pub keys: Vec<String>,
}

impl RouteEntry {
    /// Builds an unnamed, unregistered entry
    pub fn new(pattern: PathPattern, method: HttpMethod, target: Target) -> Self {
        let keys = pattern
            .required_params()
            .into_iter()
            .map(str::to_string)
            .collect();
        RouteEntry {
            pattern,
            method,
            target,
            name: None,
            resource: None,
            keys,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_resource(mut self, resource: Vec<String>) -> Self {
        self.resource = Some(resource);
        self
    }

    pub fn action(&self) -> &str {
        &self.target.action
    }

    /// Matches method and path, returning captured placeholders
    pub fn matches(&self, method: HttpMethod, path: &str) -> Option<HashMap<String, String>> {
        if self.method != method {
            return None;
        }
        self.pattern.matches(path)
    }

    /// Builds a URL for this route
    pub fn generate_url(&self, params: &HashMap<String, String>) -> Option<String> {
        self.pattern.generate(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_exclude_optional_format() {
        let pattern = PathPattern::parse("/posts/:post_id/comments/:id(.:format)").unwrap();
        let entry = RouteEntry::new(pattern, HttpMethod::Get, Target::new("comments", "show"));
        assert_eq!(entry.keys, vec!["post_id", "id"]);
        assert_eq!(entry.name, None);
        assert_eq!(entry.action(), "show");
    }

    #[test]
    fn test_matches_checks_method() {
        let pattern = PathPattern::parse("/posts/:id(.:format)").unwrap();
        let entry = RouteEntry::new(pattern, HttpMethod::Put, Target::new("posts", "update"));
        assert!(entry.matches(HttpMethod::Put, "/posts/3").is_some());
        assert!(entry.matches(HttpMethod::Get, "/posts/3").is_none());
    }

    #[test]
    fn test_serializes_without_empty_fields() {
        let pattern = PathPattern::parse("/posts(.:format)").unwrap();
        let entry = RouteEntry::new(pattern, HttpMethod::Post, Target::new("posts", "create"));
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["pattern"], "/posts(.:format)");
        assert_eq!(json["method"], "POST");
        assert!(json.get("name").is_none());
    }
}
