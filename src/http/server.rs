//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Wrap the router compiled from the route tree with middleware
//!   (tracing, timeout, request ID, JSON 404 fallback)
//! - Bind server to listener
//! - Drain in-flight requests on shutdown, bounded by a grace period

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::http::request::UuidRequestId;
use crate::http::response::not_found;
use crate::lifecycle::Assembly;
use crate::routing::RouteTree;

/// HTTP server for the user-management service.
pub struct HttpServer {
    router: Router,
    tree: Arc<RouteTree>,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a new HTTP server serving `assembly`.
    pub fn new(config: ServiceConfig, assembly: Assembly) -> Self {
        let router = Self::build_router(&config, assembly.router);
        Self {
            router,
            tree: assembly.tree,
            config,
        }
    }

    /// Wrap the compiled routes with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, routes: Router) -> Router {
        routes
            .fallback(not_found)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    /// The fully layered router, e.g. for in-process requests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// The route tree being served.
    pub fn tree(&self) -> &Arc<RouteTree> {
        &self.tree
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Run the server until `shutdown` fires, then drain.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            endpoints = self.tree.collect_leaf_paths().len(),
            "HTTP server starting"
        );

        let grace = Duration::from_secs(self.config.timeouts.shutdown_grace_secs);
        let mut deadline = shutdown.resubscribe();

        let serving = axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .into_future();

        tokio::select! {
            result = serving => result?,
            _ = async {
                let _ = deadline.recv().await;
                tokio::time::sleep(grace).await;
            } => {
                tracing::warn!(grace_secs = grace.as_secs(), "Grace period elapsed, closing open connections");
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
