//! Tribute header subsystem.
//!
//! # Data Flow
//! ```text
//! admin form / API (RawInput)
//!     → settings.rs (sanitize, fill defaults)
//!     → store.rs (persist under OPTION_KEY, swap cached record)
//!
//! every outbound response:
//!     → emitter.rs (load cached record, append X-Clacks-Overhead[-Encoded])
//!
//! option file edited on disk:
//!     watcher.rs → store.reload()
//! ```
//!
//! # Design Decisions
//! - Emission never fails; it degrades to writing nothing
//! - Headers are appended, never replacing other tributes of the same name
//! - The hot path reads an `ArcSwap`, never the backend

pub mod emitter;
pub mod hex;
pub mod sanitize;
pub mod settings;
pub mod store;
pub mod watcher;

pub use emitter::{
    emit, Emission, HeaderSink, HeadersCommitted, ResponseInterceptor, TributeHeaders,
    X_CLACKS_OVERHEAD, X_CLACKS_OVERHEAD_ENCODED,
};
pub use settings::{RawInput, TributeSettings, DEFAULT_MESSAGE};
pub use store::{FileBackend, MemoryBackend, OptionBackend, SettingsStore, StoreError};
