// Main uploader module - orchestrates all upload functionality
//
// This module is responsible for pairing files with presigned upload URLs
// and writing them directly to object storage

pub mod batch;
pub mod file;
pub mod outcome;
pub mod transport;

pub use batch::BatchUploader;
pub use file::UploadableFile;
pub use outcome::UploadOutcome;
pub use transport::UploadTransport;
