//! Endpoint discovery served at the root.

use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde::{Deserialize, Serialize};

use crate::http::response::{respond_error, respond_json};
use crate::routing::{shared, MethodSet, RouteNode, RouteTree, SharedHandler};

/// Discovery response: every leaf endpoint, in tree order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootPaths {
    pub paths: Vec<String>,
}

/// Root handler listing the live endpoint set.
///
/// The handler is created before the tree exists; the tree is handed over
/// with [`Discovery::publish`] once construction is finished. Until then the
/// handler answers `503`.
#[derive(Clone, Default)]
pub struct Discovery {
    tree: Arc<OnceLock<Arc<RouteTree>>>,
}

impl Discovery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Root node carrying the discovery handler for any method.
    pub fn root_node(&self) -> RouteNode {
        RouteNode::new("/", MethodSet::any(), Some(self.handler()))
    }

    pub fn handler(&self) -> SharedHandler {
        let tree = self.tree.clone();
        shared(move |_req: Request<Body>| {
            let tree = tree.clone();
            async move {
                match tree.get() {
                    Some(tree) => respond_json(RootPaths {
                        paths: tree.collect_leaf_paths(),
                    }),
                    None => respond_error(StatusCode::SERVICE_UNAVAILABLE, "route tree not ready"),
                }
            }
        })
    }

    /// Hand the finished tree to the handler. Returns false if a tree was
    /// already published.
    pub fn publish(&self, tree: Arc<RouteTree>) -> bool {
        self.tree.set(tree).is_ok()
    }
}
