//! Resource expansion: `resources` / `resource` declarations → route entries.
//!
//! A collection named `posts` expands to, in order:
//!
//! | method | pattern | action | name |
//! |---|---|---|---|
//! | GET | `/posts(/index)(.:format)` | index | `posts` |
//! | POST | `/posts(.:format)` | create | |
//! | GET | `/posts/new(.:format)` | new | `new_post` |
//! | *M* | `/posts/A(.:format)` | *collection A* | `A_posts` |
//! | GET | `/posts/:id(.:format)` | show | `post` |
//! | *M* | `/posts/:id/A(.:format)` | *member A* (`edit`, `delete`, …) | `A_post` |
//! | PUT | `/posts/:id(.:format)` | update | |
//! | DELETE | `/posts/:id(.:format)` | destroy | |
//!
//! followed by whatever the nested block declares under `/posts/:post_id`.
//!
//! When the singular equals the name (`news`), the index is named `news_index`.

use std::collections::HashSet;
use tracing::{debug, trace, warn};

use crate::actions::DEFAULT_MEMBER_ACTIONS;
use crate::error::ResourceError;
use crate::inflect::{EnglishInflector, Inflector};
use crate::method::HttpMethod;
use crate::options::{validate_name, ResourceOptions, DEFAULT_KEY};
use crate::route::{PathPattern, RouteEntry, Target};
use crate::scope::Scope;
use crate::table::RouteTable;

/// Callback declaring child routes inside a nested scope
pub type NestedBlock<'a> = &'a dyn Fn(&mut RouteBuilder<'_>) -> Result<(), ResourceError>;

// ============================================================================
// Expander
// ============================================================================

/// Expands resource declarations into ordered route entries
///
/// Holds no router state; every call is a function of its scope, name,
/// options and nested block.
///
/// # Examples
///
/// ```
/// use rhtmx_resources::{ResourceOptions, RouteExpander, Scope};
///
/// let expander = RouteExpander::new();
/// let entries = expander
///     .expand_collection(&Scope::root(), "posts", &ResourceOptions::default(), None)
///     .unwrap();
///
/// let names: Vec<_> = entries.iter().filter_map(|e| e.name.as_deref()).collect();
/// assert_eq!(names, vec!["posts", "new_post", "post", "edit_post", "delete_post"]);
/// ```
pub struct RouteExpander {
    inflector: Box<dyn Inflector>,
}

impl RouteExpander {
    /// Expander using [`EnglishInflector`]
    pub fn new() -> Self {
        Self::with_inflector(EnglishInflector::new())
    }

    pub fn with_inflector(inflector: impl Inflector + 'static) -> Self {
        RouteExpander {
            inflector: Box::new(inflector),
        }
    }

    pub fn inflector(&self) -> &dyn Inflector {
        self.inflector.as_ref()
    }

    /// Builder rooted at the top-level scope
    pub fn builder(&self) -> RouteBuilder<'_> {
        RouteBuilder::new(self, Scope::root())
    }

    /// Builder rooted at `scope`
    pub fn builder_at(&self, scope: Scope) -> RouteBuilder<'_> {
        RouteBuilder::new(self, scope)
    }

    /// Expands a collection of resources (`resources :posts`)
    pub fn expand_collection(
        &self,
        scope: &Scope,
        name: &str,
        options: &ResourceOptions,
        nested: Option<NestedBlock<'_>>,
    ) -> Result<Vec<RouteEntry>, ResourceError> {
        validate_name(name)?;
        options.validate_collection()?;

        let singular = options
            .singular
            .clone()
            .unwrap_or_else(|| self.inflector.singularize(name));
        let entity = options
            .entity
            .clone()
            .unwrap_or_else(|| self.inflector.classify(&singular));
        let keys = options.keys();
        let root_keys = keys
            .iter()
            .map(|k| format!(":{k}"))
            .collect::<Vec<_>>()
            .join("/");

        let resource = resource_scope(scope, options);
        let controller = resource.controller(options.controller.as_deref().unwrap_or(name));
        let base = scope.path().to_string() + "/" + name;
        let route = |suffix: &str, method: HttpMethod, action: &str| {
            PathPattern::parse(&format!("{base}{suffix}"))
                .map(|pattern| RouteEntry::new(pattern, method, Target::new(&controller, action)))
        };

        let mut entries = Vec::new();

        // index
        let index_name = if singular == name {
            format!("{name}_index")
        } else {
            name.to_string()
        };
        entries.push(
            route("(/index)(.:format)", HttpMethod::Get, "index")?
                .with_name(resource.route_name(&index_name, None))
                .with_resource(resource.register(&[name])),
        );

        // create
        entries.push(route("(.:format)", HttpMethod::Post, "create")?);

        // new
        entries.push(
            route("/new(.:format)", HttpMethod::Get, "new")?
                .with_name(resource.route_name(&singular, Some("new")))
                .with_resource(resource.register(&[name, "new"])),
        );

        // user defined collection routes
        for (action, method) in options.collection.iter() {
            entries.push(
                route(&format!("/{action}(.:format)"), *method, action)?
                    .with_name(resource.route_name(name, Some(action)))
                    .with_resource(resource.register(&[name, action])),
            );
        }

        // show
        entries.push(
            route(&format!("/{root_keys}(.:format)"), HttpMethod::Get, "show")?
                .with_name(resource.route_name(&singular, None))
                .with_resource(resource.register(&[entity.as_str()])),
        );

        // member routes, built-ins first
        for (action, method) in options.member.iter() {
            if let Some((_, default)) = DEFAULT_MEMBER_ACTIONS.iter().find(|(a, _)| *a == action) {
                if default != method {
                    warn!(resource = name, action, %method, "member action overrides built-in method");
                }
            }
        }
        for (action, method) in options.member_actions().iter() {
            entries.push(
                route(&format!("/{root_keys}/{action}(.:format)"), *method, action)?
                    .with_name(resource.route_name(&singular, Some(action)))
                    .with_resource(resource.register(&[entity.as_str(), action])),
            );
        }

        // update
        entries.push(route(&format!("/{root_keys}(.:format)"), HttpMethod::Put, "update")?);

        // destroy
        entries.push(route(&format!("/{root_keys}(.:format)"), HttpMethod::Delete, "destroy")?);

        if let Some(block) = nested {
            let nested_keys = keys
                .iter()
                .map(|k| {
                    if *k == DEFAULT_KEY {
                        format!(":{singular}_id")
                    } else {
                        format!(":{k}")
                    }
                })
                .collect::<Vec<_>>()
                .join("/");
            let child = resource
                .clone()
                .with_path(&format!("/{name}/{nested_keys}"))
                .with_name_prefix(singular.as_str())
                .with_resource_prefix(entity.as_str());
            entries.extend(self.expand_nested(child, block)?);
        }

        check_unique_names(&entries)?;
        log_expansion("resources", name, &entries);
        Ok(entries)
    }

    /// Expands a singular resource (`resource :account`)
    pub fn expand_singular(
        &self,
        scope: &Scope,
        name: &str,
        options: &ResourceOptions,
        nested: Option<NestedBlock<'_>>,
    ) -> Result<Vec<RouteEntry>, ResourceError> {
        validate_name(name)?;
        options.validate_singular()?;

        let resource = resource_scope(scope, options);
        let default_controller = self.inflector.pluralize(name);
        let controller = resource.controller(
            options
                .controller
                .as_deref()
                .unwrap_or(default_controller.as_str()),
        );
        let base = scope.path().to_string() + "/" + name;
        let route = |suffix: &str, method: HttpMethod, action: &str| {
            PathPattern::parse(&format!("{base}{suffix}"))
                .map(|pattern| RouteEntry::new(pattern, method, Target::new(&controller, action)))
        };

        let mut entries = vec![
            route("(.:format)", HttpMethod::Get, "show")?
                .with_name(resource.route_name(name, None))
                .with_resource(resource.register(&[name])),
            route("(.:format)", HttpMethod::Post, "create")?,
            route("(.:format)", HttpMethod::Put, "update")?,
            route("(.:format)", HttpMethod::Delete, "destroy")?,
        ];
        for action in ["new", "edit", "delete"] {
            entries.push(
                route(&format!("/{action}(.:format)"), HttpMethod::Get, action)?
                    .with_name(resource.route_name(name, Some(action)))
                    .with_resource(resource.register(&[name, action])),
            );
        }

        if let Some(block) = nested {
            let child = resource
                .clone()
                .with_path(&format!("/{name}"))
                .with_name_prefix(name)
                .with_resource_prefix(name);
            entries.extend(self.expand_nested(child, block)?);
        }

        check_unique_names(&entries)?;
        log_expansion("resource", name, &entries);
        Ok(entries)
    }

    fn expand_nested(
        &self,
        scope: Scope,
        block: NestedBlock<'_>,
    ) -> Result<Vec<RouteEntry>, ResourceError> {
        let mut child = RouteBuilder::new(self, scope);
        block(&mut child)?;
        Ok(child.into_entries())
    }
}

impl Default for RouteExpander {
    fn default() -> Self {
        Self::new()
    }
}

/// Scope of the resource's own routes: the parent scope plus the prefixes
/// given in the options
///
/// The path is left alone; resource paths are built from the parent path.
fn resource_scope(scope: &Scope, options: &ResourceOptions) -> Scope {
    scope.clone().with_prefixes(
        options.name_prefix.as_deref(),
        options.resource_prefix.as_deref(),
        options.effective_controller_prefix(),
    )
}

fn check_unique_names(entries: &[RouteEntry]) -> Result<(), ResourceError> {
    let mut seen = HashSet::new();
    for name in entries.iter().filter_map(|e| e.name.as_deref()) {
        if !seen.insert(name) {
            return Err(ResourceError::DuplicateRouteName(name.to_string()));
        }
    }
    Ok(())
}

fn log_expansion(kind: &str, name: &str, entries: &[RouteEntry]) {
    debug!(kind, resource = name, routes = entries.len(), "expanded resource routes");
    for entry in entries {
        trace!(
            method = %entry.method,
            pattern = %entry.pattern,
            controller = %entry.target.controller,
            action = %entry.target.action,
            name = entry.name.as_deref().unwrap_or(""),
            "route"
        );
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Collects declarations made in one scope
///
/// Passed to nested blocks so child declarations land in the child scope.
/// Route names must be unique across everything a builder collects.
///
/// # Examples
///
/// ```
/// use rhtmx_resources::{ResourceOptions, RouteExpander};
///
/// let expander = RouteExpander::new();
/// let mut routes = expander.builder();
/// routes
///     .resources_with("posts", ResourceOptions::default(), |posts| {
///         posts.resources("comments", ResourceOptions::default())?;
///         Ok(())
///     })
///     .unwrap()
///     .resource("account", ResourceOptions::default())
///     .unwrap();
///
/// let table = routes.finish();
/// let comment = table.by_name("post_comment").unwrap();
/// assert_eq!(comment.pattern.as_str(), "/posts/:post_id/comments/:id(.:format)");
/// assert!(table.by_name("account").is_some());
/// ```
pub struct RouteBuilder<'e> {
    expander: &'e RouteExpander,
    scope: Scope,
    entries: Vec<RouteEntry>,
    names: HashSet<String>,
}

impl<'e> RouteBuilder<'e> {
    pub fn new(expander: &'e RouteExpander, scope: Scope) -> Self {
        RouteBuilder {
            expander,
            scope,
            entries: Vec::new(),
            names: HashSet::new(),
        }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// Declares a collection of resources
    pub fn resources(
        &mut self,
        name: &str,
        options: ResourceOptions,
    ) -> Result<&mut Self, ResourceError> {
        let entries = self
            .expander
            .expand_collection(&self.scope, name, &options, None)?;
        self.extend(entries)
    }

    /// Declares a collection of resources with nested routes
    pub fn resources_with<F>(
        &mut self,
        name: &str,
        options: ResourceOptions,
        block: F,
    ) -> Result<&mut Self, ResourceError>
    where
        F: Fn(&mut RouteBuilder<'_>) -> Result<(), ResourceError>,
    {
        let block: NestedBlock<'_> = &block;
        let entries = self
            .expander
            .expand_collection(&self.scope, name, &options, Some(block))?;
        self.extend(entries)
    }

    /// Declares a singular resource
    pub fn resource(
        &mut self,
        name: &str,
        options: ResourceOptions,
    ) -> Result<&mut Self, ResourceError> {
        let entries = self
            .expander
            .expand_singular(&self.scope, name, &options, None)?;
        self.extend(entries)
    }

    /// Declares a singular resource with nested routes
    pub fn resource_with<F>(
        &mut self,
        name: &str,
        options: ResourceOptions,
        block: F,
    ) -> Result<&mut Self, ResourceError>
    where
        F: Fn(&mut RouteBuilder<'_>) -> Result<(), ResourceError>,
    {
        let block: NestedBlock<'_> = &block;
        let entries = self
            .expander
            .expand_singular(&self.scope, name, &options, Some(block))?;
        self.extend(entries)
    }

    /// Declares routes under `/name`, prefixing names, registrations and
    /// controllers with `name`
    pub fn namespace<F>(&mut self, name: &str, block: F) -> Result<&mut Self, ResourceError>
    where
        F: Fn(&mut RouteBuilder<'_>) -> Result<(), ResourceError>,
    {
        validate_name(name)?;
        let mut child = RouteBuilder::new(self.expander, self.scope.namespace(name));
        block(&mut child)?;
        debug!(namespace = name, routes = child.entries.len(), "expanded namespace");
        self.extend(child.into_entries())
    }

    pub fn into_entries(self) -> Vec<RouteEntry> {
        self.entries
    }

    /// Freezes the collected routes into a table
    pub fn finish(self) -> RouteTable {
        RouteTable::from_unique(self.entries)
    }

    /// Appends entries if none of their names is already taken
    fn extend(&mut self, entries: Vec<RouteEntry>) -> Result<&mut Self, ResourceError> {
        check_unique_names(&entries)?;
        if let Some(taken) = entries
            .iter()
            .filter_map(|e| e.name.as_deref())
            .find(|name| self.names.contains(*name))
        {
            return Err(ResourceError::DuplicateRouteName(taken.to_string()));
        }
        self.names
            .extend(entries.iter().filter_map(|e| e.name.clone()));
        self.entries.extend(entries);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn summary(entries: &[RouteEntry]) -> Vec<(String, String, String, Option<String>)> {
        entries
            .iter()
            .map(|e| {
                (
                    e.method.to_string(),
                    e.pattern.to_string(),
                    e.target.action.clone(),
                    e.name.clone(),
                )
            })
            .collect()
    }

    fn row(
        method: &str,
        pattern: &str,
        action: &str,
        name: Option<&str>,
    ) -> (String, String, String, Option<String>) {
        (
            method.to_string(),
            pattern.to_string(),
            action.to_string(),
            name.map(str::to_string),
        )
    }

    #[test]
    fn test_collection_default_expansion() {
        let entries = RouteExpander::new()
            .expand_collection(&Scope::root(), "posts", &ResourceOptions::default(), None)
            .unwrap();

        assert_eq!(
            summary(&entries),
            vec![
                row("GET", "/posts(/index)(.:format)", "index", Some("posts")),
                row("POST", "/posts(.:format)", "create", None),
                row("GET", "/posts/new(.:format)", "new", Some("new_post")),
                row("GET", "/posts/:id(.:format)", "show", Some("post")),
                row("GET", "/posts/:id/edit(.:format)", "edit", Some("edit_post")),
                row("GET", "/posts/:id/delete(.:format)", "delete", Some("delete_post")),
                row("PUT", "/posts/:id(.:format)", "update", None),
                row("DELETE", "/posts/:id(.:format)", "destroy", None),
            ]
        );
        assert!(entries.iter().all(|e| e.target.controller == "posts"));
    }

    #[test]
    fn test_collection_registrations() {
        let entries = RouteExpander::new()
            .expand_collection(&Scope::root(), "posts", &ResourceOptions::default(), None)
            .unwrap();
        let registrations: Vec<_> = entries.iter().filter_map(|e| e.resource.clone()).collect();

        assert_eq!(
            registrations,
            vec![
                vec!["posts".to_string()],
                vec!["posts".to_string(), "new".to_string()],
                vec!["Post".to_string()],
                vec!["Post".to_string(), "edit".to_string()],
                vec!["Post".to_string(), "delete".to_string()],
            ]
        );
    }

    #[test]
    fn test_singular_default_expansion() {
        let entries = RouteExpander::new()
            .expand_singular(&Scope::root(), "account", &ResourceOptions::default(), None)
            .unwrap();

        assert_eq!(
            summary(&entries),
            vec![
                row("GET", "/account(.:format)", "show", Some("account")),
                row("POST", "/account(.:format)", "create", None),
                row("PUT", "/account(.:format)", "update", None),
                row("DELETE", "/account(.:format)", "destroy", None),
                row("GET", "/account/new(.:format)", "new", Some("new_account")),
                row("GET", "/account/edit(.:format)", "edit", Some("edit_account")),
                row("GET", "/account/delete(.:format)", "delete", Some("delete_account")),
            ]
        );
        assert!(entries.iter().all(|e| e.target.controller == "accounts"));
        assert!(entries.iter().all(|e| e.keys.is_empty()));
    }

    #[test]
    fn test_uncountable_name_gets_index_suffix() {
        let entries = RouteExpander::new()
            .expand_collection(&Scope::root(), "news", &ResourceOptions::default(), None)
            .unwrap();

        assert_eq!(entries.len(), 8);
        let names: Vec<_> = entries.iter().filter_map(|e| e.name.as_deref()).collect();
        assert_eq!(
            names,
            vec!["news_index", "new_news", "news", "edit_news", "delete_news"]
        );
        assert!(check_unique_names(&entries).is_ok());
    }

    #[test]
    fn test_builder_rejects_duplicate_declaration() {
        let expander = RouteExpander::new();
        let mut routes = expander.builder();
        routes.resources("posts", ResourceOptions::default()).unwrap();

        let result = routes.resources("posts", ResourceOptions::default()).map(|_| ());
        assert_eq!(result, Err(ResourceError::DuplicateRouteName("posts".to_string())));
        assert_eq!(routes.entries().len(), 8);
    }

    #[test]
    fn test_nested_error_aborts_parent() {
        let expander = RouteExpander::new();
        let mut routes = expander.builder();
        let result = routes.resources_with("posts", ResourceOptions::default(), |posts| {
            posts.resources("", ResourceOptions::default())?;
            Ok(())
        });

        assert!(matches!(result, Err(ResourceError::InvalidName { .. })));
        assert!(routes.entries().is_empty());
    }
}
