//! Options accepted by `resources` and `resource` declarations.
//!
//! Every recognized option is a named field; anything else is rejected when
//! options are read from a route file. Defaults are merged *under* user
//! values: an unset `keys` means `["id"]`, and `member` actions are layered
//! over the built-in `edit`/`delete` rather than replacing them.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};

use crate::actions::{ActionMap, RESERVED_ACTIONS};
use crate::error::ResourceError;
use crate::method::HttpMethod;

static SEGMENT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());
static IDENT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());
static CONTROLLER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+(/[A-Za-z0-9_]+)*$").unwrap());
static ENTITY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(::[A-Za-z_][A-Za-z0-9_]*)*$").unwrap());

/// Default key used to identify a member of a collection
pub const DEFAULT_KEY: &str = "id";

/// Overrides for a single resource declaration
///
/// # Examples
///
/// ```
/// use rhtmx_resources::{HttpMethod, ResourceOptions};
///
/// let options = ResourceOptions::new()
///     .with_keys(["year", "slug"])
///     .with_collection_action("drafts", HttpMethod::Get)
///     .with_member_action("publish", HttpMethod::Put)
///     .with_namespace("admin");
///
/// assert_eq!(options.keys(), vec!["year", "slug"]);
/// assert_eq!(options.member_actions().len(), 3); // edit, delete, publish
/// assert_eq!(options.effective_controller_prefix(), Some("admin"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceOptions {
    /// Singular form, instead of asking the inflector
    #[serde(default)]
    pub singular: Option<String>,

    /// Backing entity identifier used to register member routes
    #[serde(default)]
    pub entity: Option<String>,

    /// Keys identifying one member, in URL order (a single string or a list)
    #[serde(default, deserialize_with = "one_or_many")]
    pub keys: Option<Vec<String>>,

    /// Controller handling the routes
    #[serde(default)]
    pub controller: Option<String>,

    /// Extra collection routes
    #[serde(default)]
    pub collection: ActionMap,

    /// Extra member routes, merged over `edit`/`delete`
    #[serde(default)]
    pub member: ActionMap,

    /// Controller namespace, used when `controller_prefix` is not given
    #[serde(default)]
    pub namespace: Option<String>,

    #[serde(default)]
    pub name_prefix: Option<String>,

    #[serde(default)]
    pub resource_prefix: Option<String>,

    #[serde(default)]
    pub controller_prefix: Option<String>,
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(Option::<OneOrMany>::deserialize(deserializer)?.map(|keys| match keys {
        OneOrMany::One(key) => vec![key],
        OneOrMany::Many(keys) => keys,
    }))
}

impl ResourceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    pub fn with_singular(mut self, singular: impl Into<String>) -> Self {
        self.singular = Some(singular.into());
        self
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Replaces the key list
    pub fn with_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_key(self, key: impl Into<String>) -> Self {
        self.with_keys([key.into()])
    }

    pub fn with_controller(mut self, controller: impl Into<String>) -> Self {
        self.controller = Some(controller.into());
        self
    }

    pub fn with_collection_action(mut self, action: impl Into<String>, method: HttpMethod) -> Self {
        self.collection.insert(action, method);
        self
    }

    pub fn with_member_action(mut self, action: impl Into<String>, method: HttpMethod) -> Self {
        self.member.insert(action, method);
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = Some(prefix.into());
        self
    }

    pub fn with_resource_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.resource_prefix = Some(prefix.into());
        self
    }

    pub fn with_controller_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.controller_prefix = Some(prefix.into());
        self
    }

    // ========================================================================
    // Resolved Values
    // ========================================================================

    /// Key list with the `["id"]` default applied
    pub fn keys(&self) -> Vec<&str> {
        match &self.keys {
            Some(keys) => keys.iter().map(String::as_str).collect(),
            None => vec![DEFAULT_KEY],
        }
    }

    /// Built-in `edit`/`delete` with the user's member actions merged over them
    pub fn member_actions(&self) -> ActionMap {
        ActionMap::default_member().merged_with(&self.member)
    }

    /// `controller_prefix`, falling back to `namespace`
    pub fn effective_controller_prefix(&self) -> Option<&str> {
        self.controller_prefix
            .as_deref()
            .or(self.namespace.as_deref())
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Checks options for a `resources` (collection) declaration
    pub fn validate_collection(&self) -> Result<(), ResourceError> {
        self.validate_common()?;

        if let Some(singular) = &self.singular {
            check_segment("singular", singular)?;
        }
        if let Some(entity) = &self.entity {
            if !ENTITY_REGEX.is_match(entity) {
                return Err(ResourceError::invalid_option(
                    "entity",
                    format!("'{entity}' is not a valid entity identifier"),
                ));
            }
        }
        if let Some(keys) = &self.keys {
            if keys.is_empty() {
                return Err(ResourceError::invalid_option("keys", "key list must not be empty"));
            }
            for key in keys {
                if !IDENT_REGEX.is_match(key) {
                    return Err(ResourceError::invalid_option(
                        "keys",
                        format!("'{key}' is not a valid key name"),
                    ));
                }
            }
            if let Some(duplicate) = keys
                .iter()
                .enumerate()
                .find(|(i, key)| keys[..*i].contains(*key))
                .map(|(_, key)| key)
            {
                return Err(ResourceError::invalid_option(
                    "keys",
                    format!("'{duplicate}' appears more than once"),
                ));
            }
        }

        check_actions("collection", &self.collection)?;
        check_actions("member", &self.member)
    }

    /// Checks options for a `resource` (singular) declaration
    ///
    /// Options that only make sense for collections are rejected by name.
    pub fn validate_singular(&self) -> Result<(), ResourceError> {
        let unsupported = [
            ("singular", self.singular.is_some()),
            ("entity", self.entity.is_some()),
            ("keys", self.keys.is_some()),
            ("collection", !self.collection.is_empty()),
            ("member", !self.member.is_empty()),
        ];
        if let Some((option, _)) = unsupported.iter().find(|(_, set)| *set) {
            return Err(ResourceError::UnsupportedOption {
                option: option.to_string(),
                kind: "resource".to_string(),
            });
        }
        self.validate_common()
    }

    fn validate_common(&self) -> Result<(), ResourceError> {
        if let Some(controller) = &self.controller {
            check_controller("controller", controller)?;
        }
        if let Some(namespace) = &self.namespace {
            check_controller("namespace", namespace)?;
        }
        if let Some(prefix) = &self.controller_prefix {
            check_controller("controller_prefix", prefix)?;
        }
        if let Some(prefix) = &self.name_prefix {
            check_segment("name_prefix", prefix)?;
        }
        if let Some(prefix) = &self.resource_prefix {
            if prefix.trim().is_empty() {
                return Err(ResourceError::invalid_option("resource_prefix", "must not be empty"));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Validation Helpers
// ============================================================================

/// Validates a resource name used as a path segment and route-name token
pub(crate) fn validate_name(name: &str) -> Result<(), ResourceError> {
    if name.is_empty() {
        return Err(ResourceError::InvalidName {
            name: name.to_string(),
            reason: "name must not be empty".to_string(),
        });
    }
    if !SEGMENT_REGEX.is_match(name) {
        return Err(ResourceError::InvalidName {
            name: name.to_string(),
            reason: "only letters, digits, '_' and '-' are allowed".to_string(),
        });
    }
    Ok(())
}

fn check_segment(option: &str, value: &str) -> Result<(), ResourceError> {
    if SEGMENT_REGEX.is_match(value) {
        Ok(())
    } else {
        Err(ResourceError::invalid_option(
            option,
            format!("'{value}' is not a valid path segment"),
        ))
    }
}

fn check_controller(option: &str, value: &str) -> Result<(), ResourceError> {
    if CONTROLLER_REGEX.is_match(value) {
        Ok(())
    } else {
        Err(ResourceError::invalid_option(
            option,
            format!("'{value}' is not a valid controller path"),
        ))
    }
}

fn check_actions(option: &str, actions: &ActionMap) -> Result<(), ResourceError> {
    for (action, _) in actions.iter() {
        check_segment(option, action)?;
        if RESERVED_ACTIONS.contains(&action) {
            return Err(ResourceError::ReservedAction {
                option: option.to_string(),
                action: action.to_string(),
            });
        }
    }
    Ok(())
}
