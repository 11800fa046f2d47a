//! Cluster handle
//!
//! Cluster-wide queries: bucket listings (the ground truth for bucket-count
//! assertions), starting named background jobs, and waiting on xactions.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;

use ac_core::types::{ACT_XACT_START, ActionMsg, QPARAM_PROVIDER, QPARAM_WHAT, WHAT_XACT_STATUS};
use ac_core::xaction::XactPhase;
use ac_core::{Bck, Error, PollConfig, Provider, Result, XactReqMsg, XactStatus, XactionHandle};

use crate::transport::Transport;
use crate::xaction::{XactStatusSource, wait_until_finished};

/// Handle for cluster-wide operations
#[derive(Debug, Clone)]
pub struct Cluster {
    transport: Arc<Transport>,
    poll: PollConfig,
}

impl Cluster {
    pub(crate) fn new(transport: Arc<Transport>, poll: PollConfig) -> Self {
        Self { transport, poll }
    }

    /// Buckets currently known to the cluster, optionally filtered by
    /// provider. A point-in-time snapshot; nothing is cached client-side.
    pub async fn list_buckets(&self, provider: Option<Provider>) -> Result<Vec<Bck>> {
        let mut query = Vec::new();
        if let Some(provider) = provider {
            query.push((QPARAM_PROVIDER, provider.to_string()));
        }
        self.transport
            .request_json::<Vec<Bck>, ActionMsg>(Method::GET, "buckets", &query, None)
            .await
    }

    /// Start a named background job (e.g. `lru`), optionally scoped to one
    /// bucket. Returns the accepted xaction's handle.
    pub async fn start_xaction(&self, kind: &str, bck: Option<Bck>) -> Result<XactionHandle> {
        if kind.is_empty() {
            return Err(Error::InvalidArgument(
                "xaction kind must not be empty".to_string(),
            ));
        }
        let value = serde_json::to_value(XactReqMsg::by_kind(kind, bck))
            .map_err(|e| Error::Decode(e.to_string()))?;
        let msg = ActionMsg::with_value(ACT_XACT_START, value);
        let id = self
            .transport
            .request_text(Method::PUT, "cluster", &[], Some(&msg))
            .await?;
        if id.is_empty() {
            return Err(Error::Decode(
                "cluster accepted the xaction but returned no id".to_string(),
            ));
        }
        tracing::info!(kind, xaction = %id, "xaction started");
        Ok(XactionHandle::new(id, kind))
    }

    /// One status query for an xaction id. An id the cluster no longer
    /// recognizes (e.g. expired from its history) maps to `XactionNotFound`.
    pub async fn xaction_status(&self, id: &str) -> Result<XactStatus> {
        let query = [(QPARAM_WHAT, WHAT_XACT_STATUS.to_string())];
        let msg = XactReqMsg::by_id(id);
        let result = self
            .transport
            .request_json::<XactStatus, XactReqMsg>(Method::GET, "cluster", &query, Some(&msg))
            .await;
        match result {
            Err(Error::NotFound(_)) => Err(Error::XactionNotFound(id.to_string())),
            other => other,
        }
    }

    /// Block until the xaction reaches a terminal state, or fail with
    /// `Timeout` once `timeout` (default from `PollConfig`) elapses.
    /// Polling an already-terminal id returns immediately with the same
    /// outcome every time.
    pub async fn wait_for_xaction_finished(
        &self,
        id: &str,
        timeout: Option<Duration>,
    ) -> Result<XactPhase> {
        let deadline = timeout.unwrap_or_else(|| self.poll.default_timeout());
        wait_until_finished(self, id, deadline, &self.poll).await
    }
}

#[async_trait]
impl XactStatusSource for Cluster {
    async fn poll_status(&self, id: &str) -> Result<XactStatus> {
        self.xaction_status(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ac_core::ClientConfig;

    fn cluster() -> Cluster {
        let transport = Arc::new(Transport::new(&ClientConfig::new("http://127.0.0.1:1")).unwrap());
        Cluster::new(transport, PollConfig::default())
    }

    #[tokio::test]
    async fn test_start_xaction_rejects_empty_kind() {
        assert!(matches!(
            cluster().start_xaction("", None).await,
            Err(Error::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_wait_rejects_empty_id() {
        assert!(matches!(
            cluster().wait_for_xaction_finished("", None).await,
            Err(Error::InvalidArgument(_))
        ));
    }
}
