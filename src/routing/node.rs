//! Route node and the handles that point at it.

use std::fmt;

use axum::http::Method;

use crate::routing::handler::SharedHandler;

/// Handle to a node inside one particular tree.
///
/// The `tree` tag stops a handle issued by one builder from resolving in
/// another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) tree: u64,
    pub(crate) index: usize,
}

/// Handle to a routing-engine scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub usize);

/// Set of HTTP methods a handler is restricted to.
///
/// Empty means any method. Insertion order is kept and duplicates dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodSet {
    methods: Vec<Method>,
}

impl MethodSet {
    /// Matches every method.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn is_any(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn contains(&self, method: &Method) -> bool {
        self.is_any() || self.methods.contains(method)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter()
    }
}

impl FromIterator<Method> for MethodSet {
    fn from_iter<I: IntoIterator<Item = Method>>(iter: I) -> Self {
        let mut methods: Vec<Method> = Vec::new();
        for method in iter {
            if !methods.contains(&method) {
                methods.push(method);
            }
        }
        Self { methods }
    }
}

impl<const N: usize> From<[Method; N]> for MethodSet {
    fn from(methods: [Method; N]) -> Self {
        methods.into_iter().collect()
    }
}

impl fmt::Display for MethodSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_any() {
            return write!(f, "*");
        }
        for (i, method) in self.methods.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", method)?;
        }
        Ok(())
    }
}

/// A path segment, its optional handler and its position in the tree.
pub struct RouteNode {
    sub_path: String,
    methods: MethodSet,
    handler: Option<SharedHandler>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) scope: Option<ScopeId>,
}

impl RouteNode {
    /// Create a detached node.
    pub fn new(
        sub_path: impl Into<String>,
        methods: MethodSet,
        handler: Option<SharedHandler>,
    ) -> Self {
        Self {
            sub_path: sub_path.into(),
            methods,
            handler,
            children: Vec::new(),
            parent: None,
            scope: None,
        }
    }

    /// Structural node: a prefix that only groups its children.
    pub fn group(sub_path: impl Into<String>) -> Self {
        Self::new(sub_path, MethodSet::any(), None)
    }

    /// Node that serves `handler` for `methods`.
    pub fn endpoint(
        sub_path: impl Into<String>,
        methods: impl Into<MethodSet>,
        handler: SharedHandler,
    ) -> Self {
        Self::new(sub_path, methods.into(), Some(handler))
    }

    pub fn sub_path(&self) -> &str {
        &self.sub_path
    }

    pub fn methods(&self) -> &MethodSet {
        &self.methods
    }

    pub fn handler(&self) -> Option<&SharedHandler> {
        self.handler.as_ref()
    }

    /// Children in attachment order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn scope(&self) -> Option<ScopeId> {
        self.scope
    }

    /// True once the node owns a scope in the routing engine.
    pub fn is_mounted(&self) -> bool {
        self.scope.is_some()
    }
}

impl fmt::Debug for RouteNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteNode")
            .field("sub_path", &self.sub_path)
            .field("methods", &self.methods)
            .field("has_handler", &self.handler.is_some())
            .field("children", &self.children)
            .field("parent", &self.parent)
            .field("scope", &self.scope)
            .finish()
    }
}
