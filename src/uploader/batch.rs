use std::sync::Arc;

use serde_json::Value;
use url::Url;
use uuid::Uuid;

use crate::config::UploaderConfig;
use crate::errors::UploadError;
use crate::resolver;

use super::file::UploadableFile;
use super::outcome::UploadOutcome;
use super::transport::{default_transports, UploadTransport};

/// Coordinates one batch of direct-to-storage uploads. Files pair with
/// upload URLs by index only; that contract with the backend is honored
/// here and nowhere else.
pub struct BatchUploader {
    transports: Vec<Arc<dyn UploadTransport>>,
    config: UploaderConfig,
}

impl BatchUploader {
    pub fn new() -> Self {
        Self::with_config(UploaderConfig::default())
    }

    pub fn with_config(config: UploaderConfig) -> Self {
        let transports = default_transports(config.request_timeout);
        Self { transports, config }
    }

    /// Custom strategy list, tried in the given order.
    pub fn with_transports(
        transports: Vec<Arc<dyn UploadTransport>>,
        config: UploaderConfig,
    ) -> Self {
        Self { transports, config }
    }

    /// Resolve upload URLs out of `response` and upload `files` against
    /// them. The resolver runs in collect-all mode; pairing is positional.
    pub async fn upload_from_response(
        &self,
        response: &Value,
        files: Vec<UploadableFile>,
    ) -> Vec<UploadOutcome> {
        let hint = self.config.url_field_hint.clone();
        self.upload_from_response_with_field(response, files, &hint)
            .await
    }

    /// Same as `upload_from_response` with an explicit preferred field name.
    pub async fn upload_from_response_with_field(
        &self,
        response: &Value,
        files: Vec<UploadableFile>,
        url_field: &str,
    ) -> Vec<UploadOutcome> {
        let urls = resolver::resolve_upload_urls(response, url_field);
        self.upload_batch(files, urls).await
    }

    /// Upload `files[i]` to `urls[i]` for every index, all in flight at
    /// once. Returns exactly one outcome per input file, in input order,
    /// and resolves only after every slot has settled. Individual failures
    /// are data, never an `Err` out of this call.
    pub async fn upload_batch(
        &self,
        files: Vec<UploadableFile>,
        urls: Vec<String>,
    ) -> Vec<UploadOutcome> {
        let batch_id = Uuid::new_v4();
        log::info!(
            "batch {}: uploading {} file(s) against {} upload URL(s)",
            batch_id,
            files.len(),
            urls.len()
        );

        if urls.len() < files.len() {
            log::warn!(
                "batch {}: {} file(s) beyond index {} have no upload URL and will fail",
                batch_id,
                files.len() - urls.len(),
                urls.len()
            );
        } else if urls.len() > files.len() {
            log::debug!(
                "batch {}: ignoring {} surplus upload URL(s)",
                batch_id,
                urls.len() - files.len()
            );
        }

        let mut handles = Vec::with_capacity(files.len());
        for (index, file) in files.into_iter().enumerate() {
            let url = urls.get(index).cloned();
            let transports = self.transports.clone();
            let slot = (file.name().to_string(), file.size());
            let handle = tokio::spawn(upload_single(transports, file, url, batch_id, index));
            handles.push((slot, handle));
        }

        // Join in spawn order so outcome order matches input order no
        // matter which upload finishes first.
        let mut outcomes = Vec::with_capacity(handles.len());
        for ((file_name, size), handle) in handles {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    log::error!(
                        "batch {}: upload task for {} died: {}",
                        batch_id,
                        file_name,
                        e
                    );
                    outcomes.push(UploadOutcome::failed(
                        file_name,
                        size,
                        None,
                        format!("upload task failed: {}", e),
                    ));
                }
            }
        }

        let failed = outcomes.iter().filter(|o| !o.succeeded()).count();
        if failed == 0 {
            log::info!(
                "batch {}: all {} file(s) uploaded",
                batch_id,
                outcomes.len()
            );
        } else {
            log::warn!(
                "batch {}: {} of {} file(s) failed",
                batch_id,
                failed,
                outcomes.len()
            );
        }
        outcomes
    }
}

impl Default for BatchUploader {
    fn default() -> Self {
        Self::new()
    }
}

/// One file, one slot: validate, resolve the content type, then walk the
/// transport list until one accepts the write.
async fn upload_single(
    transports: Vec<Arc<dyn UploadTransport>>,
    file: UploadableFile,
    url: Option<String>,
    batch_id: Uuid,
    index: usize,
) -> UploadOutcome {
    let declared = file.content_type().map(str::to_string);

    let Some(url) = url.filter(|u| !u.trim().is_empty()) else {
        log::warn!(
            "batch {}: no upload URL for {} (index {})",
            batch_id,
            file.name(),
            index
        );
        return UploadOutcome::failed(
            file.name(),
            file.size(),
            declared,
            UploadError::MissingUploadUrl.to_string(),
        );
    };

    if file.name().is_empty() {
        return UploadOutcome::failed(
            file.name(),
            file.size(),
            declared,
            UploadError::validation("file", "file has no name").to_string(),
        );
    }

    let parsed = match Url::parse(&url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => parsed,
        _ => {
            log::warn!(
                "batch {}: invalid upload URL for {}: {}",
                batch_id,
                file.name(),
                url
            );
            return UploadOutcome::failed(
                file.name(),
                file.size(),
                declared,
                UploadError::invalid_upload_url(&url).to_string(),
            );
        }
    };

    let content_type = resolve_content_type(&parsed, &file);

    let mut last_error: Option<UploadError> = None;
    for transport in &transports {
        match transport
            .put(url.as_str(), file.payload().clone(), &content_type)
            .await
        {
            Ok(()) => {
                let public_url = public_url_of(&parsed);
                log::info!(
                    "batch {}: uploaded {} ({} bytes) via {} transport",
                    batch_id,
                    file.name(),
                    file.size(),
                    transport.name()
                );
                return UploadOutcome::uploaded(file.name(), file.size(), content_type, public_url);
            }
            Err(e) => {
                log::warn!(
                    "batch {}: {} transport failed for {}: {}",
                    batch_id,
                    transport.name(),
                    file.name(),
                    e
                );
                let retryable = e.is_retryable();
                last_error = Some(e);
                if !retryable {
                    break;
                }
            }
        }
    }

    let message = last_error
        .map(|e| e.to_string())
        .unwrap_or_else(|| "no transport available".to_string());
    UploadOutcome::failed(file.name(), file.size(), Some(content_type), message)
}

/// Presigned links often pin the content type at signing time; that pin
/// outranks whatever the file declares.
fn resolve_content_type(url: &Url, file: &UploadableFile) -> String {
    let pinned = url
        .query_pairs()
        .find(|(key, _)| key.eq_ignore_ascii_case("content-type"))
        .map(|(_, value)| value.into_owned());
    if let Some(pinned) = pinned {
        if !pinned.is_empty() {
            return pinned;
        }
    }
    if let Some(declared) = file.content_type() {
        return declared.to_string();
    }
    file.guess_content_type().to_string()
}

/// The path portion is the durable address; the query string carries only
/// the time-limited signature.
fn public_url_of(url: &Url) -> String {
    let mut public = url.clone();
    public.set_query(None);
    public.set_fragment(None);
    public.to_string()
}
