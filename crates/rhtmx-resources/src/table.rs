//! Immutable route table produced by a [`RouteBuilder`](crate::RouteBuilder).

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::error::ResourceError;
use crate::route::RouteEntry;

/// What a reverse-registration identifier points to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceRegistration {
    /// Name of the registered route
    pub name: Option<String>,
    /// Placeholders needed to build its URL
    pub keys: Vec<String>,
    /// Pattern of the registered route
    pub pattern: String,
}

/// Ordered, write-once list of routes
///
/// Routes keep declaration order, which is also matching order for a
/// dispatcher (first match wins). Names are unique.
///
/// # Examples
///
/// ```
/// use rhtmx_resources::{ResourceOptions, RouteExpander};
///
/// let expander = RouteExpander::new();
/// let mut routes = expander.builder();
/// routes.resources("posts", ResourceOptions::default()).unwrap();
/// let table = routes.finish();
///
/// assert_eq!(table.len(), 8);
/// assert_eq!(table.url_for_params("edit_post", &[("id", "7")]).unwrap(), "/posts/7/edit");
///
/// let index = table.resource_index();
/// let show = &index[&vec!["Post".to_string()]];
/// assert_eq!(show.keys, vec!["id"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    named: HashMap<String, usize>,
}

impl RouteTable {
    /// Builds a table, rejecting duplicate route names
    pub fn from_entries(entries: Vec<RouteEntry>) -> Result<Self, ResourceError> {
        let mut named = HashMap::new();
        for (index, entry) in entries.iter().enumerate() {
            if let Some(name) = &entry.name {
                if named.insert(name.clone(), index).is_some() {
                    return Err(ResourceError::DuplicateRouteName(name.clone()));
                }
            }
        }
        Ok(RouteTable { entries, named })
    }

    /// Builds a table from entries whose names were already checked
    pub(crate) fn from_unique(entries: Vec<RouteEntry>) -> Self {
        let named = entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| entry.name.clone().map(|name| (name, index)))
            .collect();
        RouteTable { entries, named }
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Gets a route by its name (O(1) HashMap lookup)
    pub fn by_name(&self, name: &str) -> Option<&RouteEntry> {
        self.named.get(name).map(|&index| &self.entries[index])
    }

    /// Reverse-registration index: identifier tokens → registered route
    ///
    /// When several routes register the same identifier the first one wins.
    pub fn resource_index(&self) -> BTreeMap<Vec<String>, ResourceRegistration> {
        let mut index = BTreeMap::new();
        for entry in &self.entries {
            if let Some(resource) = &entry.resource {
                index
                    .entry(resource.clone())
                    .or_insert_with(|| ResourceRegistration {
                        name: entry.name.clone(),
                        keys: entry.keys.clone(),
                        pattern: entry.pattern.to_string(),
                    });
            }
        }
        index
    }

    /// Generates a URL for a named route
    ///
    /// Returns `None` if the route doesn't exist or required parameters are missing
    pub fn url_for(&self, name: &str, params: &HashMap<String, String>) -> Option<String> {
        self.by_name(name)
            .and_then(|entry| entry.generate_url(params))
    }

    /// Convenience method for generating URLs with an array of parameter tuples
    pub fn url_for_params(&self, name: &str, params: &[(&str, &str)]) -> Option<String> {
        let param_map: HashMap<String, String> = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        self.url_for(name, &param_map)
    }

    /// Pretty-printed JSON array of the entries
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.entries)
    }
}

impl<'a> IntoIterator for &'a RouteTable {
    type Item = &'a RouteEntry;
    type IntoIter = std::slice::Iter<'a, RouteEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::HttpMethod;
    use crate::route::{PathPattern, Target};

    fn entry(pattern: &str, name: Option<&str>) -> RouteEntry {
        let entry = RouteEntry::new(
            PathPattern::parse(pattern).unwrap(),
            HttpMethod::Get,
            Target::new("posts", "show"),
        );
        match name {
            Some(name) => entry.with_name(name),
            None => entry,
        }
    }

    #[test]
    fn test_from_entries_rejects_duplicates() {
        let result = RouteTable::from_entries(vec![
            entry("/a", Some("a")),
            entry("/b", None),
            entry("/c", Some("a")),
        ]);
        assert_eq!(result, Err(ResourceError::DuplicateRouteName("a".to_string())));
    }

    #[test]
    fn test_by_name_and_url_for() {
        let table = RouteTable::from_entries(vec![
            entry("/posts/:id(.:format)", Some("post")),
            entry("/posts(.:format)", None),
        ])
        .unwrap();

        assert_eq!(table.by_name("post").unwrap().pattern.as_str(), "/posts/:id(.:format)");
        assert_eq!(table.url_for_params("post", &[("id", "3")]).unwrap(), "/posts/3");
        assert_eq!(
            table
                .url_for_params("post", &[("id", "3"), ("format", "json")])
                .unwrap(),
            "/posts/3.json"
        );
        assert_eq!(table.url_for_params("post", &[]), None);
        assert_eq!(table.url_for_params("missing", &[]), None);
    }

    #[test]
    fn test_first_registration_wins() {
        let table = RouteTable::from_entries(vec![
            entry("/first", Some("first")).with_resource(vec!["Post".to_string()]),
            entry("/second", Some("second")).with_resource(vec!["Post".to_string()]),
        ])
        .unwrap();

        let index = table.resource_index();
        assert_eq!(index.len(), 1);
        assert_eq!(index[&vec!["Post".to_string()]].pattern, "/first");
    }

    #[test]
    fn test_to_json_is_array() {
        let table = RouteTable::from_entries(vec![entry("/posts", Some("posts"))]).unwrap();
        let json: serde_json::Value = serde_json::from_str(&table.to_json().unwrap()).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["name"], "posts");
    }
}
