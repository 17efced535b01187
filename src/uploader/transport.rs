use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use crate::errors::{UploadError, UploadResult};

/// One way of writing raw bytes to a presigned URL. Strategies are tried in
/// the order `default_transports` returns them; the second exists because
/// some proxies reject the default client's request shaping but accept a
/// plain HTTP/1.1 request.
#[async_trait]
pub trait UploadTransport: Send + Sync {
    fn name(&self) -> &'static str;

    /// PUT `body` to `url` with `content_type` as the only header. A non-2xx
    /// status is an error carrying the status and response text.
    async fn put(&self, url: &str, body: Bytes, content_type: &str) -> UploadResult<()>;
}

/// Primary transport: pooled client, HTTP/2 where the server offers it.
pub struct PooledTransport {
    client: Client,
}

impl PooledTransport {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::builder().timeout(timeout).build().unwrap(),
        }
    }
}

#[async_trait]
impl UploadTransport for PooledTransport {
    fn name(&self) -> &'static str {
        "pooled"
    }

    async fn put(&self, url: &str, body: Bytes, content_type: &str) -> UploadResult<()> {
        send_put(&self.client, url, body, content_type).await
    }
}

/// Fallback transport: HTTP/1.1 only, one fresh connection per request.
pub struct LegacyHttp1Transport {
    client: Client,
}

impl LegacyHttp1Transport {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .http1_only()
                .pool_max_idle_per_host(0)
                .timeout(timeout)
                .build()
                .unwrap(),
        }
    }
}

#[async_trait]
impl UploadTransport for LegacyHttp1Transport {
    fn name(&self) -> &'static str {
        "http1-legacy"
    }

    async fn put(&self, url: &str, body: Bytes, content_type: &str) -> UploadResult<()> {
        send_put(&self.client, url, body, content_type).await
    }
}

async fn send_put(client: &Client, url: &str, body: Bytes, content_type: &str) -> UploadResult<()> {
    let response = client
        .put(url)
        .header(CONTENT_TYPE, content_type)
        .body(body)
        .send()
        .await?;

    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    let error_text: String = error_text.chars().take(300).collect();
    Err(UploadError::upload_failed(format!(
        "storage endpoint returned {}: {}",
        status, error_text
    )))
}

/// The fixed strategy order: pooled first, plain HTTP/1.1 as the fallback.
pub fn default_transports(timeout: Duration) -> Vec<Arc<dyn UploadTransport>> {
    vec![
        Arc::new(PooledTransport::new(timeout)),
        Arc::new(LegacyHttp1Transport::new(timeout)),
    ]
}
