//! Tribute header emission.
//!
//! Emission is a pure function of the current settings and a response handle.
//! Anything that can take a header qualifies as a handle through
//! [`HeaderSink`]; each point where the application lets a response go calls
//! a [`ResponseInterceptor`].

use axum::http::{HeaderMap, HeaderName, HeaderValue, Response};

use crate::tribute::hex::to_spaced_hex;
use crate::tribute::settings::TributeSettings;
use crate::tribute::store::SettingsStore;

/// Header carrying the tribute text.
pub const X_CLACKS_OVERHEAD: HeaderName = HeaderName::from_static("x-clacks-overhead");

/// Header carrying the hex-encoded tribute bytes.
pub const X_CLACKS_OVERHEAD_ENCODED: HeaderName =
    HeaderName::from_static("x-clacks-overhead-encoded");

/// Marker extension for responses whose headers are already on the wire.
///
/// Handlers that flush headers themselves insert it; emission then becomes a
/// no-op for that response.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadersCommitted;

/// Anything a response header can be written to.
pub trait HeaderSink {
    /// Whether headers have already been transmitted.
    fn headers_sent(&self) -> bool {
        false
    }

    /// Write a header. With `replace == false` existing values of the same
    /// name are kept and the new value is appended.
    fn set_header(&mut self, name: HeaderName, value: HeaderValue, replace: bool);
}

impl HeaderSink for HeaderMap {
    fn set_header(&mut self, name: HeaderName, value: HeaderValue, replace: bool) {
        if replace {
            self.insert(name, value);
        } else {
            self.append(name, value);
        }
    }
}

impl<B> HeaderSink for Response<B> {
    fn headers_sent(&self) -> bool {
        self.extensions().get::<HeadersCommitted>().is_some()
    }

    fn set_header(&mut self, name: HeaderName, value: HeaderValue, replace: bool) {
        self.headers_mut().set_header(name, value, replace);
    }
}

/// What a call to [`emit`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emission {
    /// Tribute switched off.
    Disabled,
    /// Headers were already sent; nothing written.
    AlreadySent,
    /// Number of header lines appended.
    Written(usize),
}

/// Append the tribute header(s) described by `settings` to `sink`.
///
/// Never fails. A message that cannot be represented as a header value is
/// logged and skipped.
pub fn emit(settings: &TributeSettings, sink: &mut dyn HeaderSink) -> Emission {
    if !settings.enabled {
        return Emission::Disabled;
    }
    if sink.headers_sent() {
        tracing::debug!("Headers already sent, skipping tribute");
        return Emission::AlreadySent;
    }

    let value = match HeaderValue::from_str(&settings.message) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "Tribute message is not a valid header value");
            return Emission::Written(0);
        }
    };
    sink.set_header(X_CLACKS_OVERHEAD, value, false);

    if !settings.send_hex {
        return Emission::Written(1);
    }

    // Hex output is plain ASCII, so this cannot fail.
    match HeaderValue::from_str(&to_spaced_hex(settings.message.as_bytes())) {
        Ok(encoded) => {
            sink.set_header(X_CLACKS_OVERHEAD_ENCODED, encoded, false);
            Emission::Written(2)
        }
        Err(_) => Emission::Written(1),
    }
}

/// A hook run at a point where a response is about to leave the process.
pub trait ResponseInterceptor: Send + Sync {
    fn intercept(&self, response: &mut dyn HeaderSink) -> Emission;
}

/// The process-wide tribute emitter.
///
/// Built once at startup and handed to every hook point.
#[derive(Clone)]
pub struct TributeHeaders {
    store: SettingsStore,
}

impl TributeHeaders {
    pub fn new(store: SettingsStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &SettingsStore {
        &self.store
    }
}

impl ResponseInterceptor for TributeHeaders {
    fn intercept(&self, response: &mut dyn HeaderSink) -> Emission {
        emit(&self.store.load(), response)
    }
}
