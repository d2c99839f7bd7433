//! Startup orchestration.
//!
//! # Responsibilities
//! - Create the root node and bind it to a fresh routing engine
//! - Mount every API module, parents before children
//! - Freeze the tree, publish it to discovery, compile the router
//!
//! # Design Decisions
//! - Fail fast: any attach or compile error aborts startup
//! - Nothing is served from a partially built tree

use std::sync::Arc;

use axum::{middleware, Router};
use thiserror::Error;

use crate::api::{ApiModule, Discovery, SystemModule};
use crate::config::ServiceConfig;
use crate::observability::metrics::track_requests;
use crate::routing::{AxumEngine, BuildError, EngineError, RouteNode, RouteTree, TreeBuilder};

/// Reason the service could not reach a serving state.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("route tree assembly failed: {0}")]
    Build(#[from] BuildError),

    #[error("router compilation failed: {0}")]
    Engine(#[from] EngineError),
}

/// The frozen route tree and the router compiled from it.
pub struct Assembly {
    pub tree: Arc<RouteTree>,
    pub router: Router,
}

/// Modules mounted by default, in mount order.
pub fn default_modules(config: &ServiceConfig) -> Vec<Box<dyn ApiModule>> {
    vec![Box::new(SystemModule::new(config.api.system_prefix.clone()))]
}

/// Build the route tree with the default modules.
pub fn assemble(config: &ServiceConfig) -> Result<Assembly, StartupError> {
    assemble_with(config, &default_modules(config))
}

/// Build the route tree with an explicit module list.
pub fn assemble_with(
    config: &ServiceConfig,
    modules: &[Box<dyn ApiModule>],
) -> Result<Assembly, StartupError> {
    let discovery = Discovery::new();
    let root = if config.api.discovery_enabled {
        discovery.root_node()
    } else {
        RouteNode::group("/")
    };

    let mut builder = TreeBuilder::new(root, AxumEngine::new())?;
    let root = builder.root();

    for module in modules {
        if let Err(e) = module.mount(&mut builder, root) {
            tracing::error!(module = module.name(), error = %e, "Module failed to mount");
            return Err(e.into());
        }
        tracing::debug!(module = module.name(), "Module mounted");
    }

    let (tree, engine) = builder.finish();
    let tree = Arc::new(tree);
    discovery.publish(tree.clone());

    let route_count = engine.route_count();
    let mut router = engine.into_router()?;
    // route_layer panics on a router without routes.
    if route_count > 0 {
        router = router.route_layer(middleware::from_fn(track_requests));
    }

    for path in tree.collect_leaf_paths() {
        tracing::info!(path = %path, "Endpoint mounted");
    }

    Ok(Assembly { tree, router })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{shared, NodeId};
    use axum::body::Body;
    use axum::http::{Method, Request};

    struct ClashingCaptures;

    impl ApiModule for ClashingCaptures {
        fn name(&self) -> &str {
            "clashing"
        }

        fn mount(&self, builder: &mut TreeBuilder<AxumEngine>, parent: NodeId) -> Result<(), BuildError> {
            let noop = shared(|_req: Request<Body>| async { "" });
            builder.add(parent, RouteNode::endpoint("/users/{id}", [Method::GET], noop.clone()))?;
            builder.add(parent, RouteNode::endpoint("/users/{name}", [Method::GET], noop))?;
            Ok(())
        }
    }

    #[test]
    fn test_default_assembly() {
        let assembly = assemble(&ServiceConfig::default()).unwrap();
        assert_eq!(
            assembly.tree.collect_leaf_paths(),
            vec!["/", "/system/health", "/system/version"]
        );
    }

    #[test]
    fn test_discovery_can_be_disabled() {
        let mut config = ServiceConfig::default();
        config.api.discovery_enabled = false;

        let assembly = assemble(&config).unwrap();
        assert_eq!(
            assembly.tree.collect_leaf_paths(),
            vec!["/system/health", "/system/version"]
        );
    }

    #[test]
    fn test_bad_module_aborts_startup() {
        let mut config = ServiceConfig::default();
        config.api.system_prefix = "system".into();

        let err = assemble(&config).err().unwrap();
        assert!(matches!(err, StartupError::Build(BuildError::InvalidSubPath(_))));
    }

    #[test]
    fn test_no_modules_still_builds() {
        let mut config = ServiceConfig::default();
        config.api.discovery_enabled = false;

        let assembly = assemble_with(&config, &[]).unwrap();
        assert!(assembly.tree.collect_leaf_paths().is_empty());
    }

    #[test]
    fn test_unroutable_module_aborts_startup() {
        let modules: Vec<Box<dyn ApiModule>> = vec![Box::new(ClashingCaptures)];
        let err = assemble_with(&ServiceConfig::default(), &modules).err().unwrap();
        assert!(matches!(err, StartupError::Engine(EngineError::Unroutable { .. })));
    }
}
