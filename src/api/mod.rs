//! Built-in endpoint modules.
//!
//! # Data Flow
//! ```text
//! lifecycle::startup::assemble
//!     → discovery.rs builds the root node (handler at "/")
//!     → each ApiModule::mount attaches its own subtree under the root
//!     → after finish, discovery.rs receives the frozen tree
//! ```
//!
//! # Design Decisions
//! - A module receives the builder and its parent handle, and attaches
//!   whatever nodes it needs; it never sees other modules' nodes
//! - Any attach failure is returned unchanged so startup can abort

pub mod discovery;
pub mod system;

use crate::routing::{AxumEngine, BuildError, NodeId, TreeBuilder};

pub use discovery::{Discovery, RootPaths};
pub use system::SystemModule;

/// A group of endpoints that mounts itself into the route tree.
pub trait ApiModule: Send + Sync {
    /// Module name, used for logging.
    fn name(&self) -> &str;

    /// Attach this module's nodes below `parent`.
    fn mount(&self, builder: &mut TreeBuilder<AxumEngine>, parent: NodeId) -> Result<(), BuildError>;
}
