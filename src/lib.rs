//! Direct-to-storage attachment upload coordinator.
//!
//! Pairs a batch of in-memory files with presigned upload URLs extracted
//! from a loosely-shaped backend response, uploads each file straight to
//! object storage, and reports one outcome per file so the caller can
//! surface partial failure.

pub mod config;
pub mod errors;
pub mod resolver;
pub mod uploader;

pub use config::UploaderConfig;
pub use errors::{UploadError, UploadResult};
pub use resolver::{resolve_upload_url, resolve_upload_urls, DEFAULT_URL_FIELD};
pub use uploader::{BatchUploader, UploadOutcome, UploadTransport, UploadableFile};
