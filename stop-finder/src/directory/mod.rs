//! KMB stop directory: fetching, decoding, and per-session caching.
//!
//! The full stop list is one large payload that changes rarely, so it is
//! fetched once per session and every search after that reads the cached
//! copy.

mod cache;
mod client;
mod convert;
mod error;
mod session;

pub use cache::{DirectoryTransport, STOP_LIST_KEY, StopDirectoryCache};
pub use client::{
    DEFAULT_BASE_URL, DirectoryClient, DirectoryClientConfig, RawCoordinate, StopDto,
    StopListResponse,
};
pub use convert::decode_directory;
pub use error::DirectoryError;
pub use session::{MokaSessionStore, SessionConfig, SessionStore};
