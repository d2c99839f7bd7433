//! Routing engine seam.
//!
//! The tree decides *where* handlers go; an engine decides how requests reach
//! them. Engines only need prefix-scoped mounting and method-restricted
//! registration.

use crate::routing::handler::SharedHandler;
use crate::routing::node::{MethodSet, ScopeId};

/// Prefix-scoped handler registry the tree mounts onto.
pub trait RoutingEngine {
    /// Create the top-level scope, rooted at `prefix`.
    fn root_scope(&mut self, prefix: &str) -> ScopeId;

    /// Create a sub-scope of `parent` rooted at `prefix` (relative to the
    /// parent scope).
    fn mount(&mut self, parent: ScopeId, prefix: &str) -> ScopeId;

    /// Register `handler` at `path` (relative to `scope`). An empty method
    /// set registers for every method.
    fn handle(&mut self, scope: ScopeId, path: &str, methods: &MethodSet, handler: SharedHandler);
}
