//! X-Clacks-Overhead tribute service library.
//!
//! Every response of the site carries `X-Clacks-Overhead: <message>` and,
//! optionally, `X-Clacks-Overhead-Encoded` with the message's bytes in hex.

pub mod admin;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod tribute;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use tribute::{SettingsStore, TributeHeaders, TributeSettings};
