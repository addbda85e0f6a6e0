//! # RHTMX Resources
//!
//! RESTful resource routing: expands `resources` / `resource` declarations
//! into ordered tables of concrete routes.
//!
//! - Collections (`/posts`, `/posts/:id`) and singular resources (`/account`)
//! - Extra collection and member actions with their own HTTP methods
//! - Composite keys (`/posts/:year/:slug`)
//! - Arbitrarily deep nesting (`/posts/:post_id/comments/:id`)
//! - Namespaces (`/admin/users`, controller `admin/users`)
//! - Optional format suffix on every route (`/posts/1.json`)
//! - Stable route names (`new_post`, `edit_post_comment`) and a
//!   reverse-registration index for URL generation
//! - Declarative route files (`routes.toml`)
//!
//! ## Functional Approach
//!
//! - **No router state**: [`RouteExpander`] is a pure function of scope,
//!   name, options and nested block
//! - **Explicit context passing**: nested blocks receive a derived [`Scope`]
//! - **Injected inflection**: pluralization goes through the [`Inflector`] trait
//! - **All-or-nothing**: options are validated before any route is emitted
//!
//! ## Example
//!
//! ```
//! use rhtmx_resources::{HttpMethod, ResourceOptions, RouteExpander};
//!
//! let expander = RouteExpander::new();
//! let mut routes = expander.builder();
//! routes
//!     .resources_with(
//!         "posts",
//!         ResourceOptions::new().with_member_action("publish", HttpMethod::Put),
//!         |posts| {
//!             posts.resources("comments", ResourceOptions::default())?;
//!             Ok(())
//!         },
//!     )
//!     .unwrap();
//! let table = routes.finish();
//!
//! let publish = table.by_name("publish_post").unwrap();
//! assert_eq!(publish.method, HttpMethod::Put);
//! assert_eq!(publish.pattern.as_str(), "/posts/:id/publish(.:format)");
//!
//! let url = table
//!     .url_for_params("edit_post_comment", &[("post_id", "1"), ("id", "2")])
//!     .unwrap();
//! assert_eq!(url, "/posts/1/comments/2/edit");
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod actions;
pub mod config;
mod error;
pub mod expand;
pub mod inflect;
mod method;
pub mod options;
pub mod route;
mod scope;
pub mod table;

// Re-export public types
pub use actions::{ActionMap, DEFAULT_MEMBER_ACTIONS, RESERVED_ACTIONS};
pub use config::{load_table, DeclKind, RouteDecl, RoutesConfig, RoutingConfig};
pub use error::ResourceError;
pub use expand::{NestedBlock, RouteBuilder, RouteExpander};
pub use inflect::{EnglishInflector, Inflector};
pub use method::HttpMethod;
pub use options::{ResourceOptions, DEFAULT_KEY};
pub use route::{PathPattern, PatternSegment, RouteEntry, Target};
pub use scope::Scope;
pub use table::{ResourceRegistration, RouteTable};
