//! Axum-backed routing engine.
//!
//! # Data Flow
//! ```text
//! TreeBuilder::attach
//!     → mount()   records a scope with its absolute prefix
//!     → handle()  records (absolute path, methods, handler) in order
//!
//! into_router() (once, after the tree is finished):
//!     fail on the first recorded unknown scope
//!     → group registrations by absolute path
//!     → dry-run every path through matchit, conflicts become errors
//!     → one MethodRouter per path, earliest registration wins
//!     → flat axum::Router
//! ```
//!
//! # Design Decisions
//! - Scopes are flattened into absolute paths instead of `Router::nest`,
//!   so a child's `/` registration serves `<mount>/` while the parent's
//!   registration serves `<mount>` and the two never overlap
//! - A method claimed by an earlier registration on the same path is not
//!   registered again; the first any-method registration becomes the
//!   path's method fallback and shadows later ones
//! - A child's `/` registration is dropped when its mount point ends in a
//!   catch-all; the catch-all already serves `<mount>/...`

use std::collections::BTreeMap;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::routing::{MethodFilter, MethodRouter};
use axum::Router;
use futures_util::future::BoxFuture;

use crate::routing::engine::RoutingEngine;
use crate::routing::error::EngineError;
use crate::routing::handler::{RequestHandler, SharedHandler};
use crate::routing::node::{MethodSet, ScopeId};
use crate::routing::path;

#[derive(Debug)]
struct Scope {
    prefix: String,
}

/// One handler registration, already resolved to an absolute path.
#[derive(Clone)]
pub struct Registration {
    pub path: String,
    pub methods: MethodSet,
    pub handler: SharedHandler,
}

/// Records scopes and registrations, then compiles them into an axum router.
#[derive(Default)]
pub struct AxumEngine {
    scopes: Vec<Scope>,
    registrations: Vec<Registration>,
    errors: Vec<EngineError>,
}

impl AxumEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn resolve(&mut self, scope: ScopeId) -> Option<String> {
        match self.scopes.get(scope.0) {
            Some(s) => Some(s.prefix.clone()),
            None => {
                tracing::warn!(scope = scope.0, "Unknown scope");
                self.errors.push(EngineError::UnknownScope(scope.0));
                None
            }
        }
    }

    /// Absolute prefix of `scope`.
    pub fn scope_prefix(&self, scope: ScopeId) -> Option<&str> {
        self.scopes.get(scope.0).map(|s| s.prefix.as_str())
    }

    /// Registrations in the order they were made.
    pub fn registrations(&self) -> &[Registration] {
        &self.registrations
    }

    /// Number of distinct absolute paths that will be routed.
    pub fn route_count(&self) -> usize {
        self.grouped().len()
    }

    fn grouped(&self) -> BTreeMap<&str, Vec<&Registration>> {
        let mut by_path: BTreeMap<&str, Vec<&Registration>> = BTreeMap::new();
        for registration in &self.registrations {
            by_path
                .entry(registration.path.as_str())
                .or_default()
                .push(registration);
        }
        by_path
    }

    /// Compile every registration into an axum router.
    ///
    /// Every path is inserted into a scratch `matchit` router first, so a
    /// route axum would refuse surfaces as an error instead of a panic.
    pub fn into_router(self) -> Result<Router, EngineError> {
        if let Some(err) = self.errors.first() {
            return Err(err.clone());
        }

        let grouped = self.grouped();

        let mut matcher = matchit::Router::new();
        for path in grouped.keys() {
            check_route(path)?;
            matcher
                .insert(*path, ())
                .map_err(|source| EngineError::Unroutable {
                    path: path.to_string(),
                    source,
                })?;
        }

        let mut router = Router::new();
        for (path, registrations) in grouped {
            router = router.route(path, method_router(path, &registrations)?);
        }

        Ok(router)
    }
}

impl RoutingEngine for AxumEngine {
    fn root_scope(&mut self, prefix: &str) -> ScopeId {
        self.scopes.push(Scope {
            prefix: path::normalize(prefix),
        });
        ScopeId(self.scopes.len() - 1)
    }

    fn mount(&mut self, parent: ScopeId, prefix: &str) -> ScopeId {
        let prefix = match self.resolve(parent) {
            Some(parent_prefix) => path::join(&parent_prefix, prefix),
            None => path::normalize(prefix),
        };
        self.scopes.push(Scope { prefix });
        ScopeId(self.scopes.len() - 1)
    }

    fn handle(&mut self, scope: ScopeId, path: &str, methods: &MethodSet, handler: SharedHandler) {
        let Some(prefix) = self.resolve(scope) else {
            return;
        };
        if path::normalize(path) == "/" && ends_in_catch_all(&prefix) {
            tracing::debug!(path = %prefix, "Trailing-slash registration covered by catch-all");
            return;
        }

        let path = path::join(&prefix, path);
        tracing::trace!(path = %path, methods = %methods, "Handler registered");
        self.registrations.push(Registration {
            path,
            methods: methods.clone(),
            handler,
        });
    }
}

fn method_router(path: &str, registrations: &[&Registration]) -> Result<MethodRouter, EngineError> {
    let mut router = MethodRouter::new();
    let mut claimed: Vec<Method> = Vec::new();
    let mut has_fallback = false;

    for registration in registrations {
        if has_fallback {
            tracing::debug!(path = %path, methods = %registration.methods, "Registration shadowed");
            continue;
        }

        if registration.methods.is_any() {
            router = router.fallback(endpoint(&registration.handler));
            has_fallback = true;
            continue;
        }

        for method in registration.methods.iter() {
            if claimed.contains(method) {
                tracing::debug!(path = %path, method = %method, "Method already routed");
                continue;
            }
            let filter = MethodFilter::try_from(method.clone()).map_err(|_| {
                EngineError::UnsupportedMethod {
                    path: path.to_string(),
                    method: method.to_string(),
                }
            })?;
            router = router.on(filter, endpoint(&registration.handler));
            claimed.push(method.clone());
        }
    }

    Ok(router)
}

fn endpoint(
    handler: &SharedHandler,
) -> impl Fn(Request<Body>) -> BoxFuture<'static, Response> + Clone + Send + Sync + 'static {
    let handler = handler.clone();
    move |req: Request<Body>| handler.call(req)
}

fn ends_in_catch_all(prefix: &str) -> bool {
    prefix
        .rsplit('/')
        .next()
        .is_some_and(|segment| segment.starts_with("{*"))
}

/// Reject the pre-0.8 capture syntax axum panics on but matchit accepts as
/// static text.
fn check_route(path: &str) -> Result<(), EngineError> {
    for segment in path.split('/') {
        if segment.starts_with(':') {
            return Err(EngineError::InvalidRoute {
                path: path.to_string(),
                reason: "use {name} instead of :name for captures",
            });
        }
        if segment.starts_with('*') {
            return Err(EngineError::InvalidRoute {
                path: path.to_string(),
                reason: "use {*name} instead of *name for wildcards",
            });
        }
    }
    Ok(())
}
