//! Primary tribute hook.
//!
//! Layered over the whole router, so it sees every response on its way out:
//! pages, API replies, admin routes, fallbacks and timeouts alike.

use std::sync::Arc;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::tribute::{Emission, ResponseInterceptor, TributeHeaders};

/// Extension set on responses an earlier hook (login page, REST adapter)
/// already stamped, so the primary hook leaves them alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct TributeApplied;

/// Run `interceptor` on `response` now and mark it as handled.
pub fn stamp_response(interceptor: &dyn ResponseInterceptor, response: &mut Response) -> Emission {
    let outcome = interceptor.intercept(response);
    response.extensions_mut().insert(TributeApplied);
    outcome
}

pub async fn tribute_middleware(
    State(tribute): State<Arc<TributeHeaders>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    if response.extensions().get::<TributeApplied>().is_some() {
        return response;
    }

    let outcome = tribute.intercept(&mut response);
    tracing::trace!(?outcome, status = %response.status(), "Tribute hook ran");
    response
}
