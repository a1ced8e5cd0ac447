//! Structured API responses and the REST tribute hook.
//!
//! API handlers build an [`ApiResponse`] (or fail with an [`ApiError`]) and
//! hand it to [`finish_rest`] before returning. Only replies that expose a
//! header capability are stamped there; everything else passes through
//! unchanged and is left to the primary hook.

use axum::{
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::http::middleware::TributeApplied;
use crate::tribute::{HeaderSink, ResponseInterceptor};

/// A JSON API reply with its own header set.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    data: Value,
    headers: HeaderMap,
}

impl ApiResponse {
    pub fn new(status: StatusCode, data: Value) -> Self {
        Self {
            status,
            data,
            headers: HeaderMap::new(),
        }
    }

    pub fn ok(data: Value) -> Self {
        Self::new(StatusCode::OK, data)
    }

    /// Set a header, keeping earlier values of the same name unless `replace`.
    pub fn header(&mut self, name: HeaderName, value: HeaderValue, replace: bool) {
        if replace {
            self.headers.insert(name, value);
        } else {
            self.headers.append(name, value);
        }
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn data(&self) -> &Value {
        &self.data
    }
}

impl HeaderSink for ApiResponse {
    fn set_header(&mut self, name: HeaderName, value: HeaderValue, replace: bool) {
        self.header(name, value, replace);
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.data)).into_response();
        for (name, value) in self.headers.iter() {
            response.headers_mut().append(name.clone(), value.clone());
        }
        response
    }
}

/// A JSON error reply. Carries no header set of its own.
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "rest_no_route", message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "code": self.code,
            "message": self.message,
            "status": self.status.as_u16(),
        });
        (self.status, Json(body)).into_response()
    }
}

/// A value an API handler can return.
pub trait RestResponse: IntoResponse {
    /// The header capability, if this reply has one.
    fn header_capability(&mut self) -> Option<&mut dyn HeaderSink>;
}

impl RestResponse for ApiResponse {
    fn header_capability(&mut self) -> Option<&mut dyn HeaderSink> {
        Some(self)
    }
}

impl RestResponse for ApiError {
    fn header_capability(&mut self) -> Option<&mut dyn HeaderSink> {
        None
    }
}

impl<T, E> RestResponse for Result<T, E>
where
    T: RestResponse,
    E: RestResponse,
{
    fn header_capability(&mut self) -> Option<&mut dyn HeaderSink> {
        match self {
            Ok(reply) => reply.header_capability(),
            Err(err) => err.header_capability(),
        }
    }
}

/// Secondary hook: stamp a built API reply, then convert it.
pub fn finish_rest<R: RestResponse>(interceptor: &dyn ResponseInterceptor, mut reply: R) -> Response {
    let stamped = match reply.header_capability() {
        Some(sink) => {
            interceptor.intercept(sink);
            true
        }
        None => false,
    };

    let mut response = reply.into_response();
    if stamped {
        response.extensions_mut().insert(TributeApplied);
    }
    response
}
