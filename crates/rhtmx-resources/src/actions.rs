//! Ordered action → HTTP method maps for collection and member routes.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::method::HttpMethod;

/// Actions generated for every collection resource
pub const RESERVED_ACTIONS: &[&str] = &["index", "create", "new", "show", "update", "destroy"];

/// Member actions every collection resource gets unless overridden
pub const DEFAULT_MEMBER_ACTIONS: &[(&str, HttpMethod)] =
    &[("edit", HttpMethod::Get), ("delete", HttpMethod::Get)];

/// Action map that keeps declaration order
///
/// Inserting an action that already exists replaces its method but keeps its
/// original position, so merging user actions over the defaults never
/// reorders the generated routes.
///
/// # Examples
///
/// ```
/// use rhtmx_resources::{ActionMap, HttpMethod};
///
/// let member = ActionMap::default_member()
///     .with("archive", HttpMethod::Post)
///     .with("edit", HttpMethod::Post);
///
/// let actions: Vec<_> = member.iter().map(|(a, m)| (a, *m)).collect();
/// assert_eq!(actions, vec![
///     ("edit", HttpMethod::Post),
///     ("delete", HttpMethod::Get),
///     ("archive", HttpMethod::Post),
/// ]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionMap {
    entries: Vec<(String, HttpMethod)>,
}

impl ActionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// `edit` → GET, `delete` → GET
    pub fn default_member() -> Self {
        DEFAULT_MEMBER_ACTIONS
            .iter()
            .map(|(action, method)| (action.to_string(), *method))
            .collect()
    }

    /// Inserts or replaces an action, returning the previous method
    pub fn insert(&mut self, action: impl Into<String>, method: HttpMethod) -> Option<HttpMethod> {
        let action = action.into();
        match self.entries.iter_mut().find(|(a, _)| *a == action) {
            Some((_, existing)) => Some(std::mem::replace(existing, method)),
            None => {
                self.entries.push((action, method));
                None
            }
        }
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with(mut self, action: impl Into<String>, method: HttpMethod) -> Self {
        self.insert(action, method);
        self
    }

    /// Merges `overrides` over `self`: existing actions take the override's
    /// method in place, new actions are appended in the override's order
    pub fn merged_with(&self, overrides: &ActionMap) -> ActionMap {
        overrides
            .iter()
            .fold(self.clone(), |merged, (action, method)| merged.with(action, *method))
    }

    pub fn get(&self, action: &str) -> Option<HttpMethod> {
        self.entries
            .iter()
            .find(|(a, _)| a == action)
            .map(|(_, method)| *method)
    }

    pub fn contains(&self, action: &str) -> bool {
        self.get(action).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HttpMethod)> {
        self.entries.iter().map(|(a, m)| (a.as_str(), m))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, HttpMethod)> for ActionMap {
    fn from_iter<I: IntoIterator<Item = (S, HttpMethod)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(ActionMap::new(), |map, (action, method)| map.with(action, method))
    }
}

impl Serialize for ActionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (action, method) in &self.entries {
            map.serialize_entry(action, method)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ActionMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ActionMapVisitor;

        impl<'de> Visitor<'de> for ActionMapVisitor {
            type Value = ActionMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a table of action names to HTTP methods")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ActionMap, A::Error> {
                let mut map = ActionMap::new();
                while let Some((action, method)) = access.next_entry::<String, HttpMethod>()? {
                    map.insert(action, method);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(ActionMapVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_insert_keeps_position() {
        let mut map = ActionMap::new()
            .with("publish", HttpMethod::Put)
            .with("archive", HttpMethod::Post);
        let previous = map.insert("publish", HttpMethod::Post);

        assert_eq!(previous, Some(HttpMethod::Put));
        let actions: Vec<_> = map.iter().map(|(a, _)| a).collect();
        assert_eq!(actions, vec!["publish", "archive"]);
        assert_eq!(map.get("publish"), Some(HttpMethod::Post));
    }

    #[test]
    fn test_merge_over_defaults() {
        let user = ActionMap::new().with("edit", HttpMethod::Post);
        let merged = ActionMap::default_member().merged_with(&user);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged.get("edit"), Some(HttpMethod::Post));
        assert_eq!(merged.get("delete"), Some(HttpMethod::Get));
    }

    #[test]
    fn test_deserialize_preserves_order() {
        let map: ActionMap =
            serde_json::from_str(r#"{"zeta": "get", "alpha": "post", "mid": "DELETE"}"#).unwrap();
        let actions: Vec<_> = map.iter().map(|(a, m)| (a, *m)).collect();
        assert_eq!(
            actions,
            vec![
                ("zeta", HttpMethod::Get),
                ("alpha", HttpMethod::Post),
                ("mid", HttpMethod::Delete),
            ]
        );
    }

    #[test]
    fn test_deserialize_rejects_bad_method() {
        let result = serde_json::from_str::<ActionMap>(r#"{"archive": "fetch"}"#);
        assert!(result.is_err());
    }
}
