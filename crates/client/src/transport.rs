//! HTTP transport bound to one cluster endpoint
//!
//! Thin wrapper over `reqwest::Client`: builds `/v1/...` URLs, attaches
//! query parameters and JSON bodies, and maps non-2xx responses to the
//! error taxonomy. The inner client pools connections and is safe to share
//! across every handle produced by one `Client`.

use bytes::Bytes;
use reqwest::{Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use ac_core::types::ClusterErrorBody;
use ac_core::{ClientConfig, Error, Result};

/// One HTTP channel to a cluster
#[derive(Debug)]
pub struct Transport {
    http: reqwest::Client,
    base: Url,
}

impl Transport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base = config.endpoint_url()?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;
        Ok(Self { http, base })
    }

    pub fn endpoint(&self) -> &Url {
        &self.base
    }

    /// Build `<endpoint>/v1/<path>`. Each `/`-separated piece of `path`
    /// becomes its own segment, so object names keep their slashes.
    fn url(&self, path: &str) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| Error::Config(format!("endpoint '{}' cannot be a base", self.base)))?;
            segments.pop_if_empty();
            segments.push("v1");
            for segment in path.split('/') {
                segments.push(segment);
            }
        }
        Ok(url)
    }

    /// Issue a request and return the checked response
    pub async fn request<B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path)?;
        tracing::debug!(%method, %url, "cluster request");

        let mut request = self.http.request(method, url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        Self::check(response).await
    }

    /// Request returning the response body as text (e.g. an xaction id)
    pub async fn request_text<B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<String>
    where
        B: Serialize + ?Sized,
    {
        let response = self.request(method, path, query, body).await?;
        response
            .text()
            .await
            .map_err(|e| Error::Transport(e.to_string()))
    }

    /// Request deserializing the response body as JSON
    pub async fn request_json<T, B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.request(method, path, query, body).await?;
        response
            .json()
            .await
            .map_err(|e| Error::Decode(e.to_string()))
    }

    /// PUT-style request with a raw byte body
    pub async fn request_bytes(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Bytes,
        content_type: Option<&str>,
    ) -> Result<Response> {
        let url = self.url(path)?;
        tracing::debug!(%method, %url, bytes = body.len(), "cluster upload");

        let mut request = self.http.request(method, url).body(body);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(content_type) = content_type {
            request = request.header(reqwest::header::CONTENT_TYPE, content_type);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        Self::check(response).await
    }

    /// Map non-2xx responses to error kinds, preferring the cluster's
    /// structured error body when it parses.
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ClusterErrorBody>(&body)
            .ok()
            .map(|b| b.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                if body.is_empty() {
                    status.to_string()
                } else {
                    body.clone()
                }
            });
        Err(Error::from_status(status.as_u16(), message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(endpoint: &str) -> Transport {
        Transport::new(&ClientConfig::new(endpoint)).unwrap()
    }

    #[test]
    fn test_url_joins_api_prefix() {
        let t = transport("http://localhost:8080");
        let url = t.url("buckets/imagenet").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/v1/buckets/imagenet");
    }

    #[test]
    fn test_url_keeps_object_slashes_as_segments() {
        let t = transport("http://localhost:8080");
        let url = t.url("objects/data/shards/shard-000.tar").unwrap();
        assert_eq!(
            url.path(),
            "/v1/objects/data/shards/shard-000.tar"
        );
    }

    #[test]
    fn test_url_encodes_special_characters() {
        let t = transport("http://localhost:8080");
        let url = t.url("objects/data/a b").unwrap();
        assert_eq!(url.path(), "/v1/objects/data/a%20b");
    }

    #[test]
    fn test_url_with_trailing_slash_endpoint() {
        let t = transport("http://localhost:8080/");
        let url = t.url("buckets/b").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/v1/buckets/b");
    }

    #[test]
    fn test_new_rejects_bad_endpoint() {
        assert!(Transport::new(&ClientConfig::new("::::")).is_err());
    }
}
