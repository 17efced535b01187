use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid upload URL: {url}")]
    InvalidUploadUrl { url: String },

    #[error("no upload URL available")]
    MissingUploadUrl,

    #[error("Upload failed: {reason}")]
    UploadFailed { reason: String },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },
}

/// Custom result type
pub type UploadResult<T> = Result<T, UploadError>;

impl UploadError {
    pub fn validation(field: &str, message: &str) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    pub fn invalid_upload_url(url: &str) -> Self {
        Self::InvalidUploadUrl {
            url: url.to_string(),
        }
    }

    pub fn upload_failed(reason: impl Into<String>) -> Self {
        Self::UploadFailed {
            reason: reason.into(),
        }
    }

    /// Whether a second transport attempt can plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            UploadError::Network(_) | UploadError::UploadFailed { .. }
        )
    }

    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            UploadError::InvalidUploadUrl { .. }
                | UploadError::MissingUploadUrl
                | UploadError::Validation { .. }
        )
    }
}
