//! System endpoints: liveness and build information.

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use serde::Serialize;

use crate::api::ApiModule;
use crate::http::response::respond_json;
use crate::routing::{shared, AxumEngine, BuildError, NodeId, RouteNode, TreeBuilder};

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct VersionInfo {
    pub name: &'static str,
    pub version: &'static str,
}

/// Mounts `<prefix>/health` and `<prefix>/version` under a structural group.
#[derive(Debug, Clone)]
pub struct SystemModule {
    prefix: String,
}

impl SystemModule {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl ApiModule for SystemModule {
    fn name(&self) -> &str {
        "system"
    }

    fn mount(&self, builder: &mut TreeBuilder<AxumEngine>, parent: NodeId) -> Result<(), BuildError> {
        let group = builder.add(parent, RouteNode::group(self.prefix.as_str()))?;

        builder.add(group, RouteNode::endpoint("/health", [Method::GET], shared(health)))?;
        builder.add(group, RouteNode::endpoint("/version", [Method::GET], shared(version)))?;

        Ok(())
    }
}

async fn health(_req: Request<Body>) -> Response {
    respond_json(HealthStatus { status: "ok" })
}

async fn version(_req: Request<Body>) -> Response {
    respond_json(VersionInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mounts_group_with_two_leaves() {
        let mut b = TreeBuilder::new(RouteNode::group("/"), AxumEngine::new()).unwrap();
        let root = b.root();
        SystemModule::new("/system").mount(&mut b, root).unwrap();
        let (tree, _) = b.finish();

        assert_eq!(tree.node_count(), 4);
        assert_eq!(
            tree.collect_leaf_paths(),
            vec!["/system/health", "/system/version"]
        );
    }

    #[test]
    fn test_bad_prefix_fails_mount() {
        let mut b = TreeBuilder::new(RouteNode::group("/"), AxumEngine::new()).unwrap();
        let root = b.root();
        let err = SystemModule::new("system").mount(&mut b, root).unwrap_err();
        assert_eq!(err, BuildError::InvalidSubPath("system".into()));
    }
}
