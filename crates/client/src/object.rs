//! Object handle
//!
//! Identifies one object within a bucket. Residency ("cached") and health
//! ("ok") are properties of listing entries taken at list time; this handle
//! never re-derives them.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;
use reqwest::Method;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use ac_core::types::{ActionMsg, QPARAM_PROVIDER};
use ac_core::{Bck, Error, Result};

use crate::transport::Transport;

const HEADER_CHECKSUM_VALUE: &str = "ais-checksum-value";
const HEADER_CHECKSUM_TYPE: &str = "ais-checksum-type";
const HEADER_VERSION: &str = "ais-version";

/// Handle to one object name within a bucket
#[derive(Debug, Clone)]
pub struct Object {
    transport: Arc<Transport>,
    bck: Bck,
    name: String,
}

/// Object properties reported by a head request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectHeadInfo {
    pub size: Option<u64>,
    pub checksum: Option<String>,
    pub checksum_type: Option<String>,
    pub version: Option<String>,
}

impl Object {
    pub(crate) fn new(transport: Arc<Transport>, bck: Bck, name: &str) -> Self {
        Self {
            transport,
            bck,
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bck(&self) -> &Bck {
        &self.bck
    }

    fn path(&self) -> String {
        format!("objects/{}/{}", self.bck.name, self.name)
    }

    fn provider_query(&self) -> Vec<(&'static str, String)> {
        vec![(QPARAM_PROVIDER, self.bck.provider.to_string())]
    }

    /// Upload the file at `path` under this object name. Fails with `Io`
    /// when the path is unreadable and `NotFound` when the bucket is absent.
    pub async fn put_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let content_type = mime_guess::from_path(path).first_raw();
        self.put_bytes(Bytes::from(data), content_type).await
    }

    /// Upload an in-memory body under this object name
    pub async fn put_bytes(&self, data: Bytes, content_type: Option<&str>) -> Result<()> {
        let size = data.len();
        self.transport
            .request_bytes(
                Method::PUT,
                &self.path(),
                &self.provider_query(),
                data,
                content_type,
            )
            .await?;
        tracing::info!(bucket = %self.bck, object = %self.name, size, "object uploaded");
        Ok(())
    }

    /// Read the object, returning the response stream plus the checksum
    /// metadata the cluster attaches.
    pub async fn get(&self) -> Result<ObjectStream> {
        let response = self
            .transport
            .request::<ActionMsg>(Method::GET, &self.path(), &self.provider_query(), None)
            .await?;

        let content_length = response.content_length();
        let checksum = header_value(&response, HEADER_CHECKSUM_VALUE);
        let checksum_type = header_value(&response, HEADER_CHECKSUM_TYPE);
        Ok(ObjectStream {
            content_length,
            checksum,
            checksum_type,
            response,
        })
    }

    /// Object properties without content transfer; 404 maps to `NotFound`
    pub async fn head(&self) -> Result<ObjectHeadInfo> {
        let response = self
            .transport
            .request::<ActionMsg>(Method::HEAD, &self.path(), &self.provider_query(), None)
            .await?;
        Ok(ObjectHeadInfo {
            size: response.content_length(),
            checksum: header_value(&response, HEADER_CHECKSUM_VALUE),
            checksum_type: header_value(&response, HEADER_CHECKSUM_TYPE),
            version: header_value(&response, HEADER_VERSION),
        })
    }

    /// Delete the object; fails with `NotFound` when it is absent
    pub async fn delete(&self) -> Result<()> {
        self.transport
            .request::<ActionMsg>(Method::DELETE, &self.path(), &self.provider_query(), None)
            .await?;
        tracing::info!(bucket = %self.bck, object = %self.name, "object deleted");
        Ok(())
    }
}

fn header_value(response: &reqwest::Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Byte stream of one object read
#[derive(Debug)]
pub struct ObjectStream {
    pub content_length: Option<u64>,
    pub checksum: Option<String>,
    pub checksum_type: Option<String>,
    response: reqwest::Response,
}

impl ObjectStream {
    /// Buffer the whole object in memory
    pub async fn read_all(self) -> Result<Bytes> {
        self.response
            .bytes()
            .await
            .map_err(|e| Error::Transport(e.to_string()))
    }

    /// Stream the object into `writer`, returning the byte count
    pub async fn write_to<W>(self, writer: &mut W) -> Result<u64>
    where
        W: AsyncWrite + Unpin,
    {
        let mut stream = self.response.bytes_stream();
        let mut written = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::Transport(e.to_string()))?;
            writer.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        writer.flush().await?;
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ac_core::{ClientConfig, Provider};

    fn object(name: &str) -> Object {
        let transport = Arc::new(Transport::new(&ClientConfig::new("http://127.0.0.1:1")).unwrap());
        Object::new(transport, Bck::new("data", Provider::Ais), name)
    }

    #[test]
    fn test_object_path() {
        let obj = object("shards/shard-000.tar");
        assert_eq!(obj.path(), "objects/data/shards/shard-000.tar");
    }

    #[tokio::test]
    async fn test_put_file_missing_path_is_io_error() {
        let obj = object("missing");
        let result = obj.put_file("/definitely/not/a/real/path").await;
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
