//! Composition of independently written modules into one tree.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::IntoResponse;
use serde_json::{json, Value};
use tower::ServiceExt;

use usermanager::api::{ApiModule, SystemModule};
use usermanager::config::ServiceConfig;
use usermanager::http::HttpServer;
use usermanager::lifecycle::{assemble_with, StartupError};
use usermanager::routing::{shared, AxumEngine, BuildError, MethodSet, NodeId, RouteNode, TreeBuilder};

/// Auth-shaped module: a structural `/auth` group with leaves two levels deep.
struct AuthModule;

impl ApiModule for AuthModule {
    fn name(&self) -> &str {
        "auth"
    }

    fn mount(&self, builder: &mut TreeBuilder<AxumEngine>, parent: NodeId) -> Result<(), BuildError> {
        let auth = builder.add(parent, RouteNode::group("/auth"))?;

        builder.add(
            auth,
            RouteNode::endpoint("/signup", [Method::POST], shared(|_req: Request<Body>| async { "signup" })),
        )?;
        builder.add(
            auth,
            RouteNode::endpoint("/login", [Method::POST], shared(|_req: Request<Body>| async { "login" })),
        )?;
        builder.add(
            auth,
            RouteNode::endpoint(
                "/userinfo/{id}",
                [Method::GET],
                shared(|req: Request<Body>| async move { req.uri().path().to_string() }),
            ),
        )?;

        let google = builder.add(auth, RouteNode::group("/google"))?;
        builder.add(
            google,
            RouteNode::endpoint("/login", MethodSet::any(), shared(|_req: Request<Body>| async { "google" })),
        )?;
        builder.add(
            google,
            RouteNode::endpoint(
                "/callback",
                MethodSet::any(),
                shared(|_req: Request<Body>| async { StatusCode::TEMPORARY_REDIRECT.into_response() }),
            ),
        )?;

        Ok(())
    }
}

/// Module that tries to attach a malformed segment.
struct BrokenModule;

impl ApiModule for BrokenModule {
    fn name(&self) -> &str {
        "broken"
    }

    fn mount(&self, builder: &mut TreeBuilder<AxumEngine>, parent: NodeId) -> Result<(), BuildError> {
        builder.add(parent, RouteNode::group("posts"))?;
        Ok(())
    }
}

fn server(modules: Vec<Box<dyn ApiModule>>) -> HttpServer {
    let config = ServiceConfig::default();
    let assembly = assemble_with(&config, &modules).unwrap();
    HttpServer::new(config, assembly)
}

async fn send(server: &HttpServer, method: Method, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = server.router().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

#[tokio::test]
async fn test_modules_compose_into_one_listing() {
    let server = server(vec![Box::new(AuthModule), Box::new(SystemModule::new("/system"))]);

    let (status, body) = send(&server, Method::GET, "/").await;
    assert_eq!(status, StatusCode::OK);

    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        body,
        json!({
            "paths": [
                "/",
                "/auth/signup",
                "/auth/login",
                "/auth/userinfo/{id}",
                "/auth/google/login",
                "/auth/google/callback",
                "/system/health",
                "/system/version",
            ]
        })
    );
}

#[tokio::test]
async fn test_nested_leaves_are_routed() {
    let server = server(vec![Box::new(AuthModule)]);

    assert_eq!(
        send(&server, Method::POST, "/auth/login").await,
        (StatusCode::OK, b"login".to_vec())
    );
    assert_eq!(
        send(&server, Method::GET, "/auth/google/login").await,
        (StatusCode::OK, b"google".to_vec())
    );
    assert_eq!(
        send(&server, Method::GET, "/auth/google/callback").await.0,
        StatusCode::TEMPORARY_REDIRECT
    );
    assert_eq!(
        send(&server, Method::GET, "/auth/userinfo/7").await,
        (StatusCode::OK, b"/auth/userinfo/7".to_vec())
    );
    assert_eq!(
        send(&server, Method::GET, "/auth/signup").await.0,
        StatusCode::METHOD_NOT_ALLOWED
    );
}

#[tokio::test]
async fn test_tree_paths_match_served_paths() {
    let server = server(vec![Box::new(AuthModule)]);
    let tree = server.tree().clone();

    for path in tree.collect_leaf_paths() {
        let uri = path.replace("{id}", "1");
        let (status, _) = send(&server, Method::OPTIONS, &uri).await;
        // Every listed path is routed: restricted ones answer 405, never 404.
        assert_ne!(status, StatusCode::NOT_FOUND, "{path}");
    }
}

#[test]
fn test_failing_module_aborts_assembly() {
    let modules: Vec<Box<dyn ApiModule>> = vec![Box::new(AuthModule), Box::new(BrokenModule)];
    let err = assemble_with(&ServiceConfig::default(), &modules).err().unwrap();

    assert!(matches!(
        err,
        StartupError::Build(BuildError::InvalidSubPath(ref p)) if p == "posts"
    ));
}
