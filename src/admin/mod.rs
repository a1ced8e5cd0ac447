//! Administrative surface for editing the tribute settings.
//!
//! JSON endpoints for tooling plus an HTML form, all behind bearer auth.

pub mod auth;
pub mod handlers;
pub mod page;

use std::sync::Arc;
use axum::{
    routing::get,
    Router,
    middleware,
};
use crate::tribute::SettingsStore;
use self::handlers::*;
use self::auth::admin_auth_middleware;

#[derive(Clone)]
pub struct AdminState {
    pub store: SettingsStore,
    pub api_key: Arc<str>,
}

impl AdminState {
    pub fn new(store: SettingsStore, api_key: &str) -> Self {
        Self {
            store,
            api_key: Arc::from(api_key),
        }
    }
}

pub fn setup_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/admin/settings", get(get_settings).put(put_settings))
        .route("/admin/settings/page", get(settings_page).post(submit_settings_page))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth_middleware))
        .with_state(state)
}
