//! Shared utilities for integration tests.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use usermanager::config::ServiceConfig;
use usermanager::http::HttpServer;
use usermanager::lifecycle::{assemble, Shutdown};

/// A service running on an ephemeral port.
pub struct TestService {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    #[allow(dead_code)]
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

impl TestService {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Assemble and start the service with `config`, bound to 127.0.0.1:0.
pub async fn spawn_service(config: ServiceConfig) -> TestService {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let assembly = assemble(&config).expect("route tree should assemble");
    let server = HttpServer::new(config, assembly);

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    TestService {
        addr,
        shutdown,
        handle,
    }
}

/// Client that never reuses connections, so shutdown is not held open.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
