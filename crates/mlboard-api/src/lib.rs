//! HTTP client for the remote AutoML backend.
//!
//! One thin request function per endpoint, implementing the
//! [`mlboard_core::backend::Backend`] seam. No retries, no caching, no
//! backoff: failures surface to the calling page as typed errors.

mod client;
mod response;

pub use client::ApiClient;
pub use response::{rejection_error, rejection_message};
