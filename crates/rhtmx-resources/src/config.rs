// File: src/config.rs
// Purpose: Route declarations parsed from routes.toml

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::error::ResourceError;
use crate::expand::{RouteBuilder, RouteExpander};
use crate::options::ResourceOptions;
use crate::scope::Scope;
use crate::table::RouteTable;

/// Route file configuration
///
/// ```toml
/// [routing]
/// base_path = "/app"
///
/// [[routes]]
/// resources = "posts"
/// options = { member = { archive = "post" } }
///
///   [[routes.routes]]
///   resources = "comments"
///
/// [[routes]]
/// resource = "account"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoutesConfig {
    #[serde(default)]
    pub routing: RoutingConfig,

    #[serde(default)]
    pub routes: Vec<RouteDecl>,
}

/// Settings for the whole route file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Base path for all routes (e.g., "/app")
    #[serde(default)]
    pub base_path: Option<String>,
}

/// One declaration: exactly one of `resources`, `resource` or `namespace`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteDecl {
    #[serde(default)]
    pub resources: Option<String>,

    #[serde(default)]
    pub resource: Option<String>,

    #[serde(default)]
    pub namespace: Option<String>,

    #[serde(default)]
    pub options: ResourceOptions,

    /// Nested declarations
    #[serde(default)]
    pub routes: Vec<RouteDecl>,
}

/// What a [`RouteDecl`] declares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind<'a> {
    Resources(&'a str),
    Resource(&'a str),
    Namespace(&'a str),
}

impl RouteDecl {
    /// Resolves which declaration this entry makes
    pub fn kind(&self) -> Result<DeclKind<'_>, ResourceError> {
        match (
            self.resources.as_deref(),
            self.resource.as_deref(),
            self.namespace.as_deref(),
        ) {
            (Some(name), None, None) => Ok(DeclKind::Resources(name)),
            (None, Some(name), None) => Ok(DeclKind::Resource(name)),
            (None, None, Some(name)) => {
                if self.options != ResourceOptions::default() {
                    return Err(ResourceError::InvalidDeclaration(format!(
                        "namespace '{name}' does not take options"
                    )));
                }
                Ok(DeclKind::Namespace(name))
            }
            (None, None, None) => Err(ResourceError::InvalidDeclaration(
                "expected one of 'resources', 'resource' or 'namespace'".to_string(),
            )),
            _ => Err(ResourceError::InvalidDeclaration(
                "only one of 'resources', 'resource' or 'namespace' may be set".to_string(),
            )),
        }
    }

    /// Replays this declaration (and its children) into a builder
    pub fn apply(&self, builder: &mut RouteBuilder<'_>) -> Result<(), ResourceError> {
        match self.kind()? {
            DeclKind::Resources(name) if self.routes.is_empty() => {
                builder.resources(name, self.options.clone())?;
            }
            DeclKind::Resources(name) => {
                builder.resources_with(name, self.options.clone(), |child| {
                    apply_all(&self.routes, child)
                })?;
            }
            DeclKind::Resource(name) if self.routes.is_empty() => {
                builder.resource(name, self.options.clone())?;
            }
            DeclKind::Resource(name) => {
                builder.resource_with(name, self.options.clone(), |child| {
                    apply_all(&self.routes, child)
                })?;
            }
            DeclKind::Namespace(name) => {
                builder.namespace(name, |child| apply_all(&self.routes, child))?;
            }
        }
        Ok(())
    }
}

fn apply_all(decls: &[RouteDecl], builder: &mut RouteBuilder<'_>) -> Result<(), ResourceError> {
    decls.iter().try_for_each(|decl| decl.apply(builder))
}

impl RoutesConfig {
    /// Load configuration from a routes.toml file
    ///
    /// A missing or empty file yields an empty configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            debug!(path = %path.display(), "route file not found, using empty configuration");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read route file: {:?}", path))?;

        Self::parse(&content).with_context(|| format!("Failed to parse route file: {:?}", path))
    }

    /// Load configuration from default path (./routes.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("routes.toml")
    }

    /// Parses route file contents
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(toml::from_str(content)?)
    }

    /// Root scope, mounted at `routing.base_path` when set
    pub fn root_scope(&self) -> Scope {
        self.routing
            .base_path
            .as_deref()
            .map(Scope::mounted_at)
            .unwrap_or_default()
    }

    /// Expands every declaration, in file order
    pub fn build(&self, expander: &RouteExpander) -> Result<RouteTable, ResourceError> {
        let mut builder = expander.builder_at(self.root_scope());
        for decl in &self.routes {
            decl.apply(&mut builder)?;
        }
        let table = builder.finish();
        info!(routes = table.len(), "built route table");
        Ok(table)
    }
}

/// Loads a route file and expands it with the default expander
pub fn load_table(path: impl AsRef<Path>) -> Result<RouteTable> {
    let path = path.as_ref();
    let config = RoutesConfig::load(path)?;
    config
        .build(&RouteExpander::new())
        .with_context(|| format!("Invalid route declarations in {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::HttpMethod;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_config() {
        let config = RoutesConfig::parse("").unwrap();
        assert_eq!(config, RoutesConfig::default());
        assert!(config.build(&RouteExpander::new()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let config = RoutesConfig::load("does/not/exist/routes.toml").unwrap();
        assert!(config.routes.is_empty());
    }

    #[test]
    fn test_parse_nested_declarations() {
        let config = RoutesConfig::parse(
            r#"
            [[routes]]
            resources = "posts"
            options = { collection = { drafts = "get" }, member = { archive = "post" } }

              [[routes.routes]]
              resources = "comments"

            [[routes]]
            resource = "account"
            "#,
        )
        .unwrap();

        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.routes[0].kind().unwrap(), DeclKind::Resources("posts"));
        assert_eq!(config.routes[0].routes.len(), 1);
        assert_eq!(
            config.routes[0].options.member.get("archive"),
            Some(HttpMethod::Post)
        );
        assert_eq!(config.routes[1].kind().unwrap(), DeclKind::Resource("account"));
    }

    #[test]
    fn test_unknown_key_is_named() {
        let err = RoutesConfig::parse(
            r#"
            [[routes]]
            resources = "posts"
            plural = "postings"
            "#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("plural"));
    }

    #[test]
    fn test_declaration_needs_exactly_one_kind() {
        let decl = RouteDecl {
            resources: Some("posts".to_string()),
            resource: Some("account".to_string()),
            ..RouteDecl::default()
        };
        assert!(matches!(decl.kind(), Err(ResourceError::InvalidDeclaration(_))));
        assert!(matches!(
            RouteDecl::default().kind(),
            Err(ResourceError::InvalidDeclaration(_))
        ));
    }

    #[test]
    fn test_namespace_rejects_options() {
        let decl = RouteDecl {
            namespace: Some("admin".to_string()),
            options: ResourceOptions::new().with_controller("users"),
            ..RouteDecl::default()
        };
        assert!(matches!(decl.kind(), Err(ResourceError::InvalidDeclaration(_))));
    }

    #[test]
    fn test_base_path_mounts_routes() {
        let config = RoutesConfig::parse(
            r#"
            [routing]
            base_path = "/app"

            [[routes]]
            resource = "account"
            "#,
        )
        .unwrap();
        let table = config.build(&RouteExpander::new()).unwrap();
        assert_eq!(
            table.by_name("account").unwrap().pattern.as_str(),
            "/app/account(.:format)"
        );
    }
}
