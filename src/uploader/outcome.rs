use serde::Serialize;

/// Per-file result of a batch upload. A success always carries the durable
/// object URL; a failure always carries a diagnostic message. Produced once
/// per input file and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum UploadOutcome {
    #[serde(rename = "uploaded")]
    #[serde(rename_all = "camelCase")]
    Uploaded {
        file_name: String,
        size: u64,
        content_type: String,
        /// Upload URL with its signing query stripped; the durable address.
        url: String,
    },
    #[serde(rename = "failed")]
    #[serde(rename_all = "camelCase")]
    Failed {
        file_name: String,
        size: u64,
        content_type: Option<String>,
        message: String,
    },
}

impl UploadOutcome {
    pub fn uploaded(
        file_name: impl Into<String>,
        size: u64,
        content_type: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::Uploaded {
            file_name: file_name.into(),
            size,
            content_type: content_type.into(),
            url: url.into(),
        }
    }

    pub fn failed(
        file_name: impl Into<String>,
        size: u64,
        content_type: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Failed {
            file_name: file_name.into(),
            size,
            content_type,
            message: message.into(),
        }
    }

    pub fn succeeded(&self) -> bool {
        matches!(self, Self::Uploaded { .. })
    }

    pub fn file_name(&self) -> &str {
        match self {
            Self::Uploaded { file_name, .. } | Self::Failed { file_name, .. } => file_name,
        }
    }

    pub fn size(&self) -> u64 {
        match self {
            Self::Uploaded { size, .. } | Self::Failed { size, .. } => *size,
        }
    }

    /// Durable object URL; only present on success.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Uploaded { url, .. } => Some(url),
            Self::Failed { .. } => None,
        }
    }

    pub fn content_type(&self) -> Option<&str> {
        match self {
            Self::Uploaded { content_type, .. } => Some(content_type),
            Self::Failed { content_type, .. } => content_type.as_deref(),
        }
    }

    /// Human-readable description for display next to the file name.
    pub fn message(&self) -> &str {
        match self {
            Self::Uploaded { .. } => "uploaded",
            Self::Failed { message, .. } => message,
        }
    }
}
