//! The host site: HTML pages, the login page and the public REST API.

use axum::{
    extract::State,
    http::Uri,
    response::{Html, IntoResponse, Response},
};
use serde_json::json;

use crate::http::middleware::stamp_response;
use crate::http::response::{finish_rest, ApiError, ApiResponse};
use crate::http::server::AppState;

const HOME_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Clacks Overhead</title></head>
<body>
<h1>A man is not dead while his name is still spoken.</h1>
<p>Every response from this site carries an <code>X-Clacks-Overhead</code> header.</p>
<p><a href="/login">Log in</a></p>
</body>
</html>
"#;

const LOGIN_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Log In</title></head>
<body>
<form method="post" action="/login">
<p><label>Username <input type="text" name="log"></label></p>
<p><label>Password <input type="password" name="pwd"></label></p>
<p><input type="submit" value="Log In"></p>
</form>
</body>
</html>
"#;

pub async fn home() -> Html<&'static str> {
    Html(HOME_PAGE)
}

/// The login flow emits its headers itself, ahead of the primary hook.
pub async fn login(State(state): State<AppState>) -> Response {
    let mut response = Html(LOGIN_PAGE).into_response();
    let outcome = stamp_response(&*state.tribute, &mut response);
    tracing::debug!(?outcome, "Login page stamped");
    response
}

pub async fn health() -> &'static str {
    "OK"
}

pub async fn api_status(State(state): State<AppState>) -> Response {
    let reply = ApiResponse::ok(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "status": "operational",
    }));
    finish_rest(&*state.tribute, reply)
}

pub async fn api_tribute(State(state): State<AppState>) -> Response {
    let settings = state.tribute.store().load();
    let reply = ApiResponse::ok(json!({
        "enabled": settings.enabled,
        "message": settings.message,
    }));
    finish_rest(&*state.tribute, reply)
}

pub async fn api_not_found(State(state): State<AppState>, uri: Uri) -> Response {
    let err = ApiError::not_found(format!("No route was found matching {}", uri.path()));
    finish_rest(&*state.tribute, err)
}
