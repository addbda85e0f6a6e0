//! Nesting context inherited by route declarations.

/// Accumulated prefixes for a level of route declarations
///
/// A scope is never mutated by the declarations made in it: nesting derives
/// a new scope from the parent, so sibling branches of a route tree are
/// independent of each other.
///
/// # Examples
///
/// ```
/// use rhtmx_resources::Scope;
///
/// let scope = Scope::root().namespace("admin").with_name_prefix("post");
///
/// assert_eq!(scope.path(), "/admin");
/// assert_eq!(scope.route_name("comments", None), "admin_post_comments");
/// assert_eq!(scope.route_name("comment", Some("new")), "new_admin_post_comment");
/// assert_eq!(scope.controller("comments"), "admin/comments");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    path: String,
    name_prefix: Vec<String>,
    resource_prefix: Vec<String>,
    controller_prefix: Vec<String>,
}

impl Scope {
    /// Top-level scope: no path, no prefixes
    pub fn root() -> Self {
        Self::default()
    }

    /// Top-level scope mounted under a base path, e.g. `/app`
    pub fn mounted_at(base_path: &str) -> Self {
        let trimmed = base_path.trim_end_matches('/');
        let path = match trimmed {
            "" => String::new(),
            p if p.starts_with('/') => p.to_string(),
            p => format!("/{p}"),
        };
        Scope {
            path,
            ..Self::default()
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Path prefix of every route declared in this scope (`""` at the root)
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name_prefix(&self) -> &[String] {
        &self.name_prefix
    }

    pub fn resource_prefix(&self) -> &[String] {
        &self.resource_prefix
    }

    pub fn controller_prefix(&self) -> &[String] {
        &self.controller_prefix
    }

    // ========================================================================
    // Derivation
    // ========================================================================

    /// Appends a raw path fragment such as `/posts/:post_id`
    pub fn with_path(mut self, fragment: &str) -> Self {
        self.path.push_str(fragment);
        self
    }

    pub fn with_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix.push(prefix.into());
        self
    }

    pub fn with_resource_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.resource_prefix.push(prefix.into());
        self
    }

    pub fn with_controller_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.controller_prefix.push(prefix.into());
        self
    }

    /// Applies an optional prefix of each kind
    pub(crate) fn with_prefixes(
        self,
        name_prefix: Option<&str>,
        resource_prefix: Option<&str>,
        controller_prefix: Option<&str>,
    ) -> Self {
        let scope = match name_prefix {
            Some(prefix) => self.with_name_prefix(prefix),
            None => self,
        };
        let scope = match resource_prefix {
            Some(prefix) => scope.with_resource_prefix(prefix),
            None => scope,
        };
        match controller_prefix {
            Some(prefix) => scope.with_controller_prefix(prefix),
            None => scope,
        }
    }

    /// Child scope for a namespace: `/name` path, and `name` as name,
    /// resource and controller prefix
    pub fn namespace(&self, name: &str) -> Self {
        self.clone()
            .with_path(&format!("/{name}"))
            .with_name_prefix(name)
            .with_resource_prefix(name)
            .with_controller_prefix(name)
    }

    // ========================================================================
    // Naming
    // ========================================================================

    /// Joins route-name tokens with `_`
    ///
    /// The most specific token (`action`) comes first, then the inherited
    /// name prefix, then `base`.
    pub fn route_name(&self, base: &str, action: Option<&str>) -> String {
        action
            .into_iter()
            .chain(self.name_prefix.iter().map(String::as_str))
            .chain(std::iter::once(base))
            .collect::<Vec<_>>()
            .join("_")
    }

    /// Reverse-registration identifier: resource prefix followed by `key`
    pub fn register(&self, key: &[&str]) -> Vec<String> {
        self.resource_prefix
            .iter()
            .cloned()
            .chain(key.iter().map(|k| k.to_string()))
            .collect()
    }

    /// Controller path with the controller prefix applied
    pub fn controller(&self, controller: &str) -> String {
        self.controller_prefix
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(controller))
            .collect::<Vec<_>>()
            .join("/")
    }
}
