//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the site, API and admin handlers
//! - Wire up middleware (tracing, request ID, timeout, tribute hook)
//! - Start the option file watcher
//! - Bind server to listener and shut down on signal

use axum::{
    middleware,
    routing::{any, get},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin::{setup_admin_router, AdminState};
use crate::config::AppConfig;
use crate::http::middleware::tribute_middleware;
use crate::http::pages::{api_not_found, api_status, api_tribute, health, home, login};
use crate::http::request::{propagate_request_id_layer, request_span, set_request_id_layer};
use crate::tribute::{SettingsStore, TributeHeaders};
use crate::tribute::watcher::SettingsWatcher;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub tribute: Arc<TributeHeaders>,
}

/// HTTP server for the tribute-carrying site.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
    store: SettingsStore,
}

impl HttpServer {
    /// Create a new HTTP server, opening the configured option store.
    pub fn new(config: AppConfig) -> Self {
        let store = match &config.storage.path {
            Some(path) => SettingsStore::open(path),
            None => SettingsStore::in_memory(),
        };
        Self::with_store(config, store)
    }

    /// Create a server around an existing store.
    pub fn with_store(config: AppConfig, store: SettingsStore) -> Self {
        let state = AppState {
            tribute: Arc::new(TributeHeaders::new(store.clone())),
        };

        let router = Self::build_router(&config, state, &store);
        Self {
            router,
            config,
            store,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState, store: &SettingsStore) -> Router {
        let tribute = state.tribute.clone();

        let mut router = Router::new()
            .route("/", get(home))
            .route("/login", get(login))
            .route("/health", get(health))
            .route("/api/v1/status", get(api_status))
            .route("/api/v1/tribute", get(api_tribute))
            .route("/api/v1/{*rest}", any(api_not_found))
            .with_state(state);

        if config.admin.enabled {
            let admin = AdminState::new(store.clone(), &config.admin.api_key);
            router = router.merge(setup_admin_router(admin));
        }

        router
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(middleware::from_fn_with_state(tribute, tribute_middleware))
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(request_span))
                    .layer(propagate_request_id_layer()),
            )
    }

    /// The fully layered router, for serving or driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        // Dropping the watcher stops it, so hold it for the server's lifetime.
        let _watcher = match (&self.config.storage.path, self.config.storage.watch) {
            (Some(path), true) => {
                match SettingsWatcher::new(Path::new(path), self.store.clone()).run() {
                    Ok(w) => Some(w),
                    Err(e) => {
                        tracing::warn!(error = %e, "Option file watcher unavailable, hot reload disabled");
                        None
                    }
                }
            }
            _ => None,
        };

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The settings store shared with the hooks.
    pub fn store(&self) -> &SettingsStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tribute::{RawInput, X_CLACKS_OVERHEAD, X_CLACKS_OVERHEAD_ENCODED};
    use axum::body::Body;
    use axum::http::{header::AUTHORIZATION, Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    fn server() -> HttpServer {
        let mut config = AppConfig::default();
        config.storage.path = None;
        HttpServer::new(config)
    }

    async fn fetch(router: Router, path: &str) -> axum::response::Response {
        router
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    fn tribute_values(response: &axum::response::Response) -> Vec<String> {
        response
            .headers()
            .get_all(X_CLACKS_OVERHEAD)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_every_hook_point_emits_once() {
        let server = server();
        for path in ["/", "/login", "/health", "/api/v1/status", "/api/v1/nope", "/missing"] {
            let response = fetch(server.router(), path).await;
            assert_eq!(
                tribute_values(&response),
                ["Ozzy \"The Prince of Darkness\" Osbourne"],
                "path {path}"
            );
            assert!(response.headers().get(X_CLACKS_OVERHEAD_ENCODED).is_none());
        }
    }

    #[tokio::test]
    async fn test_disabled_site_sends_no_tribute() {
        let server = server();
        server.store().save(&RawInput::default()).unwrap();

        for path in ["/", "/login", "/api/v1/status"] {
            let response = fetch(server.router(), path).await;
            assert!(tribute_values(&response).is_empty(), "path {path}");
        }
    }

    #[tokio::test]
    async fn test_hex_header_everywhere() {
        let server = server();
        let raw: RawInput = serde_json::from_value(json!({
            "enabled": "1",
            "message": "Hi",
            "send_hex": "1",
        }))
        .unwrap();
        server.store().save(&raw).unwrap();

        for path in ["/", "/login", "/api/v1/tribute"] {
            let response = fetch(server.router(), path).await;
            assert_eq!(tribute_values(&response), ["Hi"]);
            assert_eq!(response.headers().get(X_CLACKS_OVERHEAD_ENCODED).unwrap(), "48 49");
        }
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let response = fetch(server().router(), "/").await;
        assert!(response.headers().get("x-request-id").is_some());
    }

    #[tokio::test]
    async fn test_admin_requires_key() {
        let server = server();
        let response = fetch(server.router(), "/admin/settings").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        // Even rejections carry the tribute.
        assert_eq!(tribute_values(&response).len(), 1);

        let response = server
            .router()
            .oneshot(
                Request::get("/admin/settings")
                    .header(AUTHORIZATION, "Bearer admin-secret-key")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_form_submission_saves_and_redirects() {
        let server = server();
        let response = server
            .router()
            .oneshot(
                Request::post("/admin/settings/page")
                    .header(AUTHORIZATION, "Bearer admin-secret-key")
                    .header("content-type", "application/x-www-form-urlencoded")
                    .body(Body::from("message=GNU+Terry+Pratchett&send_hex=1"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").unwrap(),
            "/admin/settings/page?updated=true"
        );

        let settings = server.store().load();
        assert!(!settings.enabled);
        assert!(settings.send_hex);
        assert_eq!(settings.message, "GNU Terry Pratchett");
    }
}
