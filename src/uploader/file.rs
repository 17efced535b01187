use bytes::Bytes;

/// One unit of upload work: an in-memory payload plus the metadata needed to
/// name it and type it. Immutable once constructed; the coordinator never
/// mutates or retains it past the batch call.
#[derive(Debug, Clone)]
pub struct UploadableFile {
    name: String,
    content_type: Option<String>,
    payload: Bytes,
}

impl UploadableFile {
    pub fn new(name: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content_type: None,
            payload: payload.into(),
        }
    }

    /// Attach the content type the caller's file selection declared.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.payload.len() as u64
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// MIME type guessed from the file name extension. Last resort before
    /// the generic binary default.
    pub(crate) fn guess_content_type(&self) -> &'static str {
        let extension = self
            .name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("webp") => "image/webp",
            Some("gif") => "image/gif",
            Some("pdf") => "application/pdf",
            Some("txt") => "text/plain",
            Some("csv") => "text/csv",
            Some("zip") => "application/zip",
            Some("mp4") => "video/mp4",
            Some("mp3") => "audio/mpeg",
            _ => "application/octet-stream",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_tracks_payload_length() {
        let file = UploadableFile::new("a.png", vec![0u8; 16]);
        assert_eq!(file.size(), 16);
        assert_eq!(file.name(), "a.png");
        assert!(file.content_type().is_none());
    }

    #[test]
    fn test_declared_content_type_is_kept() {
        let file = UploadableFile::new("a.bin", Vec::new()).with_content_type("image/png");
        assert_eq!(file.content_type(), Some("image/png"));
    }

    #[test]
    fn test_guess_content_type_from_extension() {
        assert_eq!(
            UploadableFile::new("photo.PNG", Vec::new()).guess_content_type(),
            "image/png"
        );
        assert_eq!(
            UploadableFile::new("report.pdf", Vec::new()).guess_content_type(),
            "application/pdf"
        );
        assert_eq!(
            UploadableFile::new("no-extension", Vec::new()).guess_content_type(),
            "application/octet-stream"
        );
    }
}
