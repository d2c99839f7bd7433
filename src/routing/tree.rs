//! Route tree construction and introspection.
//!
//! # Responsibilities
//! - Grow the tree one attachment at a time (`TreeBuilder::attach`)
//! - Mount each attached node's scope under its parent's scope
//! - Register handlers on both the child scope and the parent scope
//! - Compose absolute paths and enumerate leaf endpoints (`RouteTree`)
//!
//! # Design Decisions
//! - Nodes live in an arena; `NodeId` handles replace back-pointers
//! - All preconditions are checked before anything is mutated
//! - `finish()` consumes the builder, so a built tree cannot change

use std::sync::atomic::{AtomicU64, Ordering};

use crate::routing::engine::RoutingEngine;
use crate::routing::error::BuildError;
use crate::routing::node::{NodeId, RouteNode};
use crate::routing::path;

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(1);

/// Immutable route tree.
///
/// Produced by [`TreeBuilder::finish`]. Safe to share across request tasks
/// without locking.
#[derive(Debug)]
pub struct RouteTree {
    id: u64,
    nodes: Vec<RouteNode>,
    root: NodeId,
}

impl RouteTree {
    fn with_root(root: RouteNode) -> Self {
        let id = NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed);
        Self {
            id,
            nodes: vec![root],
            root: NodeId { tree: id, index: 0 },
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Resolve a handle issued for this tree.
    pub fn node(&self, id: NodeId) -> Option<&RouteNode> {
        if id.tree != self.id {
            return None;
        }
        self.nodes.get(id.index)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut RouteNode> {
        if id.tree != self.id {
            return None;
        }
        self.nodes.get_mut(id.index)
    }

    /// Canonical absolute path of `id`.
    ///
    /// The root contributes its sub-path verbatim; every other node appends
    /// its sub-path to its parent's full path with doubled separators
    /// collapsed. Returns `None` for a handle from another tree.
    pub fn full_path(&self, id: NodeId) -> Option<String> {
        let node = self.node(id)?;
        match node.parent {
            None => Some(node.sub_path().to_string()),
            Some(parent) => {
                let parent_path = self.full_path(parent)?;
                Some(path::join(&parent_path, node.sub_path()))
            }
        }
    }

    /// Full paths of every node that carries a handler, in pre-order.
    pub fn collect_leaf_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        self.add_leaf_paths(self.root, &mut paths);
        paths
    }

    fn add_leaf_paths(&self, id: NodeId, paths: &mut Vec<String>) {
        let Some(node) = self.node(id) else {
            return;
        };

        if node.handler().is_some() {
            if let Some(full) = self.full_path(id) {
                paths.push(full);
            }
        }

        for child in node.children() {
            self.add_leaf_paths(*child, paths);
        }
    }

    /// Number of nodes reachable from the root, root included.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.node(id) {
                count += 1;
                stack.extend(node.children().iter().copied());
            }
        }
        count
    }
}

/// Mutable form of the tree, alive only during startup.
pub struct TreeBuilder<E: RoutingEngine> {
    tree: RouteTree,
    engine: E,
}

impl<E: RoutingEngine> TreeBuilder<E> {
    /// Bind `root` to a fresh scope of `engine`.
    ///
    /// The root may be `/`. When it carries a handler, the handler is
    /// registered at `/` of the root scope.
    pub fn new(mut root: RouteNode, mut engine: E) -> Result<Self, BuildError> {
        if !root.sub_path().starts_with('/') {
            return Err(BuildError::InvalidSubPath(root.sub_path().to_string()));
        }

        let scope = engine.root_scope(root.sub_path());
        root.scope = Some(scope);
        root.parent = None;
        if let Some(handler) = root.handler() {
            engine.handle(scope, "/", root.methods(), handler.clone());
        }

        tracing::debug!(path = %root.sub_path(), "Route tree created");

        Ok(Self {
            tree: RouteTree::with_root(root),
            engine,
        })
    }

    pub fn root(&self) -> NodeId {
        self.tree.root
    }

    /// Read-only view of the tree built so far.
    pub fn tree(&self) -> &RouteTree {
        &self.tree
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Take ownership of a detached node and return its handle.
    pub fn insert(&mut self, node: RouteNode) -> NodeId {
        let mut node = node;
        node.parent = None;
        node.scope = None;
        node.children.clear();

        let id = NodeId {
            tree: self.tree.id,
            index: self.tree.nodes.len(),
        };
        self.tree.nodes.push(node);
        id
    }

    /// Attach `child` below `parent`.
    ///
    /// Checks, in order: the child exists, has no parent, has a well-formed
    /// sub-path, and the parent is mounted. Nothing changes if a check
    /// fails.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<(), BuildError> {
        let child_node = self.tree.node(child).ok_or(BuildError::ChildMissing)?;

        // The root has no parent but already owns a scope.
        if child_node.parent.is_some() || child_node.scope.is_some() {
            return Err(BuildError::ChildAlreadyAttached);
        }

        if !path::is_valid_sub_path(child_node.sub_path()) {
            return Err(BuildError::InvalidSubPath(child_node.sub_path().to_string()));
        }

        let parent_scope = self
            .tree
            .node(parent)
            .and_then(|p| p.scope)
            .ok_or(BuildError::ParentNotMounted)?;

        let sub_path = child_node.sub_path().to_string();
        let methods = child_node.methods().clone();
        let handler = child_node.handler().cloned();

        let child_scope = self.engine.mount(parent_scope, &sub_path);
        if let Some(handler) = handler {
            self.engine.handle(child_scope, "/", &methods, handler.clone());
            self.engine.handle(parent_scope, &sub_path, &methods, handler);
        }

        if let Some(node) = self.tree.node_mut(child) {
            node.parent = Some(parent);
            node.scope = Some(child_scope);
        }
        if let Some(node) = self.tree.node_mut(parent) {
            node.children.push(child);
        }

        tracing::debug!(
            path = %self.tree.full_path(child).unwrap_or_default(),
            methods = %methods,
            "Route attached"
        );

        Ok(())
    }

    /// Insert `node` and attach it below `parent`.
    pub fn add(&mut self, parent: NodeId, node: RouteNode) -> Result<NodeId, BuildError> {
        let id = self.insert(node);
        self.attach(parent, id)?;
        Ok(id)
    }

    /// End the construction phase.
    pub fn finish(self) -> (RouteTree, E) {
        (self.tree, self.engine)
    }
}
