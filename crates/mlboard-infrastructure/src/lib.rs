//! Durable client-side state for MLBoard.
//!
//! Covers everything the browser would keep in local storage and cookies:
//! the session file, the short-lived upload-response cache, and the
//! configuration file. All writes are atomic (tmp file, fsync, rename)
//! behind an advisory file lock.

pub mod config_service;
pub mod paths;
pub mod session_storage;
pub mod storage;
pub mod upload_cache;

pub use paths::{BoardPaths, PathError};
pub use session_storage::FileSessionStore;
pub use storage::AtomicJsonFile;
pub use upload_cache::UploadCache;
