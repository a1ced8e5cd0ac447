//! Response middleware.

pub mod tribute;

pub use tribute::{stamp_response, tribute_middleware, TributeApplied};
