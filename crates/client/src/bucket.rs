//! Bucket handle
//!
//! Identifies one bucket (name + provider) and exposes its lifecycle over
//! the shared transport. Nothing is cached client-side: every call reflects
//! the cluster's state at the time it returns. Rename and copy are
//! asynchronous on the cluster; they hand back an xaction id and the caller
//! waits on it explicitly via `Cluster::wait_for_xaction_finished`.

use std::sync::Arc;

use reqwest::Method;

use ac_core::types::{
    ACT_COPY_BCK, ACT_CREATE_BCK, ACT_DESTROY_BCK, ACT_EVICT_REMOTE_BCK, ACT_LIST, ACT_MOVE_BCK,
    ActionMsg, CopyBckMsg, ListObjectsMsg, QPARAM_BCK_TO, QPARAM_KEEP_MD, QPARAM_PROVIDER,
};
use ac_core::{Bck, Error, ObjectEntry, ObjectPage, PropsSpec, Provider, Result, XactionHandle};

use crate::object::Object;
use crate::transport::Transport;

/// Handle to one bucket identity
#[derive(Debug, Clone)]
pub struct Bucket {
    transport: Arc<Transport>,
    bck: Bck,
}

/// Options for `Bucket::copy`
#[derive(Debug, Clone)]
pub struct CopyOpts {
    /// Copy only objects whose names start with this prefix
    pub prefix: String,
    /// Plan the copy without moving data
    pub dry_run: bool,
    /// Override an existing destination bucket, where cluster policy allows
    pub force: bool,
    /// Provider of the destination bucket
    pub to_provider: Provider,
}

impl Default for CopyOpts {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            dry_run: false,
            force: false,
            to_provider: Provider::Ais,
        }
    }
}

/// Options for object listings
#[derive(Debug, Clone, Default)]
pub struct ListObjectsOpts {
    /// Return only objects whose names start with this prefix
    pub prefix: String,
    /// Properties to populate; the cluster fetches nothing beyond these
    pub props: PropsSpec,
    /// Objects per page; 0 lets the backend pick its maximum
    pub page_size: u32,
}

impl ListObjectsOpts {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_props(mut self, props: PropsSpec) -> Self {
        self.props = props;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}

impl Bucket {
    pub(crate) fn new(transport: Arc<Transport>, bck: Bck) -> Self {
        Self { transport, bck }
    }

    pub fn bck(&self) -> &Bck {
        &self.bck
    }

    pub fn name(&self) -> &str {
        &self.bck.name
    }

    pub fn provider(&self) -> Provider {
        self.bck.provider
    }

    fn path(&self) -> String {
        format!("buckets/{}", self.bck.name)
    }

    fn provider_query(&self) -> Vec<(&'static str, String)> {
        vec![(QPARAM_PROVIDER, self.bck.provider.to_string())]
    }

    fn require_ais(&self, operation: &'static str) -> Result<()> {
        if self.bck.provider.is_remote() {
            return Err(Error::InvalidProvider {
                provider: self.bck.provider,
                operation,
            });
        }
        Ok(())
    }

    fn require_remote(&self, operation: &'static str) -> Result<()> {
        if !self.bck.provider.is_remote() {
            return Err(Error::InvalidProvider {
                provider: self.bck.provider,
                operation,
            });
        }
        Ok(())
    }

    /// Create the bucket. Only the cluster's own provider supports creation;
    /// an existing bucket of the same identity fails with `AlreadyExists`.
    pub async fn create(&self) -> Result<()> {
        self.require_ais("create")?;
        let msg = ActionMsg::new(ACT_CREATE_BCK);
        self.transport
            .request(Method::POST, &self.path(), &self.provider_query(), Some(&msg))
            .await?;
        tracing::info!(bucket = %self.bck, "bucket created");
        Ok(())
    }

    /// Check existence and fetch metadata without transferring content.
    /// Fails with `NotFound` when the bucket is absent.
    pub async fn head(&self) -> Result<()> {
        self.transport
            .request::<ActionMsg>(Method::HEAD, &self.path(), &self.provider_query(), None)
            .await?;
        Ok(())
    }

    /// Destroy the bucket. Repeated deletes after the first keep failing
    /// with `NotFound`.
    pub async fn delete(&self) -> Result<()> {
        self.require_ais("delete")?;
        let msg = ActionMsg::new(ACT_DESTROY_BCK);
        self.transport
            .request(
                Method::DELETE,
                &self.path(),
                &self.provider_query(),
                Some(&msg),
            )
            .await?;
        tracing::info!(bucket = %self.bck, "bucket destroyed");
        Ok(())
    }

    /// Rename the bucket. Returns the xaction id immediately; the old
    /// identity stays visible until the xaction reaches a terminal state,
    /// so callers wait explicitly before using the new name.
    pub async fn rename(&self, to: &str) -> Result<XactionHandle> {
        self.require_ais("rename")?;
        if to.is_empty() {
            return Err(Error::InvalidArgument(
                "rename target must not be empty".to_string(),
            ));
        }
        if to == self.bck.name {
            return Err(Error::InvalidArgument(format!(
                "rename target '{to}' matches the current name"
            )));
        }

        let mut query = self.provider_query();
        query.push((QPARAM_BCK_TO, Bck::ais(to).bck_to_param()));
        let msg = ActionMsg::new(ACT_MOVE_BCK);
        let id = self
            .transport
            .request_text(Method::POST, &self.path(), &query, Some(&msg))
            .await?;
        if id.is_empty() {
            return Err(Error::Decode(
                "cluster accepted the rename but returned no xaction id".to_string(),
            ));
        }
        tracing::info!(from = %self.bck, to = to, xaction = %id, "bucket rename started");
        Ok(XactionHandle::new(id, ACT_MOVE_BCK))
    }

    /// Copy this bucket's objects into `to`. Returns the xaction id
    /// immediately; the source is unaffected. Whether the destination must
    /// pre-exist is cluster policy; `CopyOpts::force` is forwarded as-is.
    pub async fn copy(&self, to: &str, opts: &CopyOpts) -> Result<XactionHandle> {
        if to.is_empty() {
            return Err(Error::InvalidArgument(
                "copy target must not be empty".to_string(),
            ));
        }

        let value = serde_json::to_value(CopyBckMsg {
            prefix: opts.prefix.clone(),
            dry_run: opts.dry_run,
            force: opts.force,
        })
        .map_err(|e| Error::Decode(e.to_string()))?;
        let msg = ActionMsg::with_value(ACT_COPY_BCK, value);

        let mut query = self.provider_query();
        query.push((
            QPARAM_BCK_TO,
            Bck::new(to, opts.to_provider).bck_to_param(),
        ));
        let id = self
            .transport
            .request_text(Method::POST, &self.path(), &query, Some(&msg))
            .await?;
        if id.is_empty() {
            return Err(Error::Decode(
                "cluster accepted the copy but returned no xaction id".to_string(),
            ));
        }
        tracing::info!(from = %self.bck, to = to, xaction = %id, "bucket copy started");
        Ok(XactionHandle::new(id, ACT_COPY_BCK))
    }

    /// Evict the bucket's cached objects. Remote providers only: eviction
    /// drops local residency (subsequent listings report `cached=false`)
    /// without touching the backing remote data. `keep_md` keeps the
    /// bucket's metadata in the cluster.
    pub async fn evict(&self, keep_md: bool) -> Result<()> {
        self.require_remote("evict")?;
        let mut query = self.provider_query();
        if keep_md {
            query.push((QPARAM_KEEP_MD, "true".to_string()));
        }
        let msg = ActionMsg::new(ACT_EVICT_REMOTE_BCK);
        self.transport
            .request(Method::DELETE, &self.path(), &query, Some(&msg))
            .await?;
        tracing::info!(bucket = %self.bck, keep_md, "bucket evicted");
        Ok(())
    }

    async fn list_page(
        &self,
        opts: &ListObjectsOpts,
        uuid: &str,
        continuation_token: &str,
    ) -> Result<ObjectPage> {
        let value = serde_json::to_value(ListObjectsMsg {
            prefix: opts.prefix.clone(),
            pagesize: opts.page_size,
            uuid: uuid.to_string(),
            props: opts.props.to_wire(),
            continuation_token: continuation_token.to_string(),
        })
        .map_err(|e| Error::Decode(e.to_string()))?;
        let msg = ActionMsg::with_value(ACT_LIST, value);
        self.transport
            .request_json(Method::GET, &self.path(), &self.provider_query(), Some(&msg))
            .await
    }

    /// Fetch the first page of the listing. Entries carry only the
    /// properties requested in `opts.props`.
    pub async fn list_objects(&self, opts: &ListObjectsOpts) -> Result<ObjectPage> {
        self.list_page(opts, "", "").await
    }

    /// Lazy page iterator over the full listing
    pub fn pager(&self, opts: ListObjectsOpts) -> ObjectPager {
        ObjectPager {
            bucket: self.clone(),
            opts,
            uuid: String::new(),
            continuation_token: String::new(),
            exhausted: false,
        }
    }

    /// Fetch every page and accumulate the entries
    pub async fn list_all_objects(&self, opts: ListObjectsOpts) -> Result<Vec<ObjectEntry>> {
        let mut pager = self.pager(opts);
        let mut entries = Vec::new();
        while let Some(page) = pager.next_page().await? {
            entries.extend(page.entries);
        }
        Ok(entries)
    }

    /// Object handle factory; no HTTP request is made
    pub fn object(&self, name: &str) -> Object {
        Object::new(self.transport.clone(), self.bck.clone(), name)
    }
}

/// Page-at-a-time listing cursor
#[derive(Debug)]
pub struct ObjectPager {
    bucket: Bucket,
    opts: ListObjectsOpts,
    uuid: String,
    continuation_token: String,
    exhausted: bool,
}

impl ObjectPager {
    /// Fetch the next page, or `None` once the final page has been read
    pub async fn next_page(&mut self) -> Result<Option<ObjectPage>> {
        if self.exhausted {
            return Ok(None);
        }
        let page = self
            .bucket
            .list_page(&self.opts, &self.uuid, &self.continuation_token)
            .await?;
        self.uuid = page.uuid.clone();
        self.continuation_token = page.continuation_token.clone();
        if page.is_last() {
            self.exhausted = true;
        }
        Ok(Some(page))
    }
}
