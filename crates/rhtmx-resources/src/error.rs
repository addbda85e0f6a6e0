//! Error types for resource expansion.

use thiserror::Error;

/// Errors raised while validating resource declarations.
///
/// Every variant is raised before a single route is emitted, so an expansion
/// either produces a complete set of entries or nothing at all.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResourceError {
    /// The resource name is empty or not a usable path segment.
    #[error("Invalid resource name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// An option carries a value that cannot be used.
    #[error("Invalid value for option '{option}': {reason}")]
    InvalidOption { option: String, reason: String },

    /// An option that only applies to another kind of declaration.
    #[error("Option '{option}' is not supported by {kind} declarations")]
    UnsupportedOption { option: String, kind: String },

    /// A user-declared action shadows one of the generated CRUD actions.
    #[error("Action '{action}' in '{option}' collides with a reserved action")]
    ReservedAction { option: String, action: String },

    /// Two routes in the same scope would share a name.
    #[error("Duplicate route name: {0}")]
    DuplicateRouteName(String),

    /// A path pattern with unbalanced optional groups or an empty placeholder.
    #[error("Invalid path pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// HTTP method string that is not recognized.
    #[error("Unknown HTTP method: {0}")]
    UnknownMethod(String),

    /// A route file entry that does not describe exactly one declaration.
    #[error("Invalid route declaration: {0}")]
    InvalidDeclaration(String),
}

impl ResourceError {
    pub(crate) fn invalid_option(option: &str, reason: impl Into<String>) -> Self {
        ResourceError::InvalidOption {
            option: option.to_string(),
            reason: reason.into(),
        }
    }
}
