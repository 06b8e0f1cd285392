use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use reqwest::{Client, RequestBuilder, Response};
use tracing::debug;

use super::traits::{RemoteSource, ResponseBody, SourceResponse};
use crate::config::{FetchConfig, USER_AGENT};

pub struct HttpSource {
    client: Client,
    headers: RwLock<HashMap<String, String>>,
}

impl HttpSource {
    /// Build a client that follows redirects and decodes gzip/brotli/deflate bodies.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("failed to build HTTP client")?;
        Ok(Self {
            client,
            headers: RwLock::new(HashMap::new()),
        })
    }

    /// Add a header sent with every subsequent request (e.g. an auth token).
    pub fn set_header(&self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.write().insert(name.into(), value.into());
    }

    fn build_request(&self, uri: &str) -> RequestBuilder {
        let headers = self.headers.read().clone();
        let mut req = self.client.get(uri);
        for (k, v) in &headers {
            req = req.header(k.as_str(), v.as_str());
        }
        req
    }
}

#[async_trait]
impl ResponseBody for Response {
    async fn chunk(&mut self) -> Result<Option<Bytes>> {
        Ok(Response::chunk(self).await?)
    }
}

#[async_trait]
impl RemoteSource for HttpSource {
    async fn get(&self, uri: &str) -> Result<SourceResponse> {
        let resp = self.build_request(uri).send().await?;

        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        debug!(
            "http get status={} final_url={} content_type={}",
            status,
            resp.url(),
            content_type.as_deref().unwrap_or("-")
        );

        Ok(SourceResponse {
            status,
            content_type,
            body: Box::new(resp),
        })
    }
}
