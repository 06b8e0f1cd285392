use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};

/// Incrementally readable response body.
#[async_trait]
pub trait ResponseBody: Send {
    /// Next chunk of the body, `None` once the body is exhausted.
    async fn chunk(&mut self) -> Result<Option<Bytes>>;
}

pub struct SourceResponse {
    /// Final status, after any redirects were followed.
    pub status: u16,
    /// Reported content type. Diagnostic only: bodies are saved whatever
    /// their type.
    pub content_type: Option<String>,
    pub body: Box<dyn ResponseBody>,
}

impl SourceResponse {
    /// Drain the whole body into memory.
    pub async fn bytes(mut self) -> Result<Bytes> {
        let mut buf = BytesMut::new();
        while let Some(chunk) = self.body.chunk().await? {
            buf.extend_from_slice(&chunk);
        }
        Ok(buf.freeze())
    }
}

#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Issue a GET and return as soon as the status line is known.
    async fn get(&self, uri: &str) -> Result<SourceResponse>;

    /// GET a whole document, failing on any non-2xx status.
    async fn fetch_document(&self, uri: &str) -> Result<Bytes> {
        let resp = self.get(uri).await?;
        if !(200..300).contains(&resp.status) {
            return Err(anyhow!("HTTP {}", resp.status));
        }
        resp.bytes().await
    }
}
