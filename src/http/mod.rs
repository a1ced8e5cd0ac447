//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → request.rs (request id, request span)
//!     → middleware/tribute.rs (primary hook, wraps everything below)
//!     → pages.rs (site pages, login page hook, REST handlers)
//!     → response.rs (structured API replies, REST hook)
//!     → Send to client
//! ```

pub mod middleware;
pub mod pages;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::{finish_rest, ApiError, ApiResponse, RestResponse};
pub use server::{AppState, HttpServer};
