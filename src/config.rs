use std::time::Duration;

use crate::resolver::DEFAULT_URL_FIELD;

/// Tuning knobs for the batch uploader. No file-backed configuration:
/// callers construct this in process and hand it to `BatchUploader`.
#[derive(Debug, Clone)]
pub struct UploaderConfig {
    /// Per-request timeout applied by both transports.
    pub request_timeout: Duration,
    /// Field name probed first when resolving upload URLs from a response.
    pub url_field_hint: String,
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(120),
            url_field_hint: DEFAULT_URL_FIELD.to_string(),
        }
    }
}
