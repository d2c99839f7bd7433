//! Route composition subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     RouteNode::new (independent segments)
//!     → tree.rs TreeBuilder::attach (validate, link, mount scope)
//!     → engine.rs RoutingEngine::mount / handle
//!     → TreeBuilder::finish → immutable RouteTree
//!     → axum_engine.rs AxumEngine::into_router → axum::Router
//!
//! Introspection (any time after finish):
//!     RouteTree::full_path / collect_leaf_paths
//! ```
//!
//! # Design Decisions
//! - The tree is built top-down: a node accepts children only once mounted
//! - Parents are referenced by handle, never owned by their children
//! - Handlers are trait objects shared between both scopes they serve
//! - Tree and router are immutable at runtime (thread-safe without locks)

pub mod axum_engine;
pub mod engine;
pub mod error;
pub mod handler;
pub mod node;
pub mod path;
pub mod tree;

pub use axum_engine::AxumEngine;
pub use engine::RoutingEngine;
pub use error::{BuildError, EngineError};
pub use handler::{shared, RequestHandler, SharedHandler};
pub use node::{MethodSet, NodeId, RouteNode, ScopeId};
pub use tree::{RouteTree, TreeBuilder};
