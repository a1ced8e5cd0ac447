use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::Deserialize;
use thiserror::Error;

use crate::admin::page::render_settings_page;
use crate::admin::AdminState;
use crate::tribute::{RawInput, StoreError, TributeSettings};

/// Failure on the admin save path.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("failed to save tribute settings: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Admin request failed");
        let body = serde_json::json!({ "error": self.to_string() });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub updated: Option<String>,
}

pub async fn get_settings(State(state): State<AdminState>) -> Json<TributeSettings> {
    Json((*state.store.load()).clone())
}

pub async fn put_settings(
    State(state): State<AdminState>,
    Json(raw): Json<RawInput>,
) -> Result<Json<TributeSettings>, AdminError> {
    let saved = state.store.save(&raw)?;
    Ok(Json(saved))
}

pub async fn settings_page(
    State(state): State<AdminState>,
    Query(query): Query<PageQuery>,
) -> Html<String> {
    let updated = query.updated.as_deref() == Some("true");
    Html(render_settings_page(&state.store.load(), updated))
}

pub async fn submit_settings_page(
    State(state): State<AdminState>,
    Form(raw): Form<RawInput>,
) -> Result<Redirect, AdminError> {
    state.store.save(&raw)?;
    Ok(Redirect::to("/admin/settings/page?updated=true"))
}
