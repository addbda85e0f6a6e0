//! Route module for resource routing
//!
//! Contains the pattern language used by generated routes and the route
//! entries themselves. Both are plain immutable values.

pub mod entry;
pub mod pattern;

// Re-export commonly used types
pub use entry::{RouteEntry, Target};
pub use pattern::{PathPattern, PatternSegment};
