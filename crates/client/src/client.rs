//! Client factory
//!
//! One `Client` is bound to one cluster endpoint and produces the bucket
//! and cluster handles. Clones share a single transport, so connection
//! reuse spans every handle.

use std::sync::Arc;

use ac_core::{Bck, BucketUri, ClientConfig, Provider, Result};

use crate::bucket::Bucket;
use crate::cluster::Cluster;
use crate::transport::Transport;

/// Top-level client bound to one cluster endpoint
#[derive(Debug, Clone)]
pub struct Client {
    transport: Arc<Transport>,
    config: ClientConfig,
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = Arc::new(Transport::new(&config)?);
        Ok(Self { transport, config })
    }

    /// Client configured from the config file and `AIS_ENDPOINT`
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::load()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Handle to a bucket in the cluster's own provider
    pub fn bucket(&self, name: &str) -> Bucket {
        self.bucket_with_provider(name, Provider::Ais)
    }

    pub fn bucket_with_provider(&self, name: &str, provider: Provider) -> Bucket {
        Bucket::new(self.transport.clone(), Bck::new(name, provider))
    }

    pub fn bucket_from_uri(&self, uri: &BucketUri) -> Bucket {
        Bucket::new(self.transport.clone(), uri.bck.clone())
    }

    pub fn cluster(&self) -> Cluster {
        Cluster::new(self.transport.clone(), self.config.poll.clone())
    }
}
