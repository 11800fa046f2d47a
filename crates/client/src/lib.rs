//! ac-client: HTTP adapter for AIS-compatible clusters
//!
//! Implements the client surface over one cluster endpoint:
//! - `Transport`: reqwest-backed request/response with typed failures
//! - `Client`: factory producing bucket and cluster handles
//! - `Bucket`/`Object`: lifecycle and data operations
//! - `Cluster`: cluster-wide queries and the xaction tracker
//!
//! Handles are cheap to clone and share one connection pool; asynchronous
//! cluster operations return an xaction id immediately, and waiting on them
//! is always an explicit `Cluster::wait_for_xaction_finished` call.

pub mod bucket;
pub mod client;
pub mod cluster;
pub mod object;
pub mod transport;
pub mod xaction;

pub use bucket::{Bucket, CopyOpts, ListObjectsOpts, ObjectPager};
pub use client::Client;
pub use cluster::Cluster;
pub use object::{Object, ObjectHeadInfo, ObjectStream};
pub use transport::Transport;
pub use xaction::XactStatusSource;
