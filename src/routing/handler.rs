//! Request handler contract.
//!
//! The tree never looks inside a handler: it only stores it and hands the
//! same instance to the routing engine.

use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;

/// Anything that can answer an HTTP request.
pub trait RequestHandler: Send + Sync + 'static {
    /// Handle `req` and produce a response.
    fn call(&self, req: Request<Body>) -> BoxFuture<'static, Response>;
}

impl<F, Fut, R> RequestHandler for F
where
    F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    fn call(&self, req: Request<Body>) -> BoxFuture<'static, Response> {
        let fut = self(req);
        Box::pin(async move { fut.await.into_response() })
    }
}

/// A handler shared between the tree and every scope it is registered on.
pub type SharedHandler = Arc<dyn RequestHandler>;

/// Wrap a closure or handler type into a [`SharedHandler`].
pub fn shared<H: RequestHandler>(handler: H) -> SharedHandler {
    Arc::new(handler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_closure_handler() {
        let handler = shared(|_req: Request<Body>| async { (StatusCode::ACCEPTED, "ok") });

        let response = handler.call(Request::new(Body::empty())).await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }
}
