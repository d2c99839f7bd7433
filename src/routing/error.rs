//! Errors raised while assembling and compiling the route tree.

use thiserror::Error;

/// Structural precondition violated by an attach.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// The child handle does not resolve to a node of this tree.
    #[error("child is missing")]
    ChildMissing,

    /// The child already has a parent.
    #[error("child already has a parent")]
    ChildAlreadyAttached,

    /// The child's sub-path is empty, bare `/`, or lacks a leading `/`.
    #[error("sub-path {0:?} is not valid")]
    InvalidSubPath(String),

    /// The parent has no routing scope yet.
    #[error("parent is not mounted")]
    ParentNotMounted,
}

/// Registration the routing engine cannot turn into a live route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Extension methods cannot be used as method filters.
    #[error("method {method} on {path} cannot be routed")]
    UnsupportedMethod { path: String, method: String },

    /// Path uses syntax the router rejects.
    #[error("route {path} is invalid: {reason}")]
    InvalidRoute { path: String, reason: &'static str },

    /// Path cannot be placed in the matcher next to the other routes.
    #[error("route {path} cannot be routed: {source}")]
    Unroutable {
        path: String,
        #[source]
        source: matchit::InsertError,
    },

    /// Scope handle not issued by this engine.
    #[error("scope {0} is unknown")]
    UnknownScope(usize),
}
