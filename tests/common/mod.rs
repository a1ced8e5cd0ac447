//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use clacks_overhead::config::AppConfig;
use clacks_overhead::{HttpServer, Shutdown};

pub const ADMIN_KEY: &str = "test-admin-key";

/// Config for a test server on `addr`, persisting to `options` if given.
pub fn test_config(addr: SocketAddr, options: Option<&Path>) -> AppConfig {
    let mut config = AppConfig::default();
    config.listener.bind_address = addr.to_string();
    config.storage.path = options.map(|p| p.to_string_lossy().into_owned());
    config.storage.watch = options.is_some();
    config.admin.api_key = ADMIN_KEY.to_string();
    config
}

/// Start a server and wait until it accepts connections.
pub async fn start_server(config: AppConfig) -> Shutdown {
    let addr: SocketAddr = config.listener.bind_address.parse().unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    let server = HttpServer::new(config);
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(200)).await;
    shutdown
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

/// All values of a response header, in order.
pub fn header_values(res: &reqwest::Response, name: &str) -> Vec<String> {
    res.headers()
        .get_all(name)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}
