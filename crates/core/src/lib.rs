//! ac-core: Core library for the aisc cluster client
//!
//! This crate provides the transport-independent pieces of the client:
//! - Error taxonomy with kind-based matching
//! - Client configuration (endpoint, retry, polling)
//! - Bucket/object URI parsing
//! - Wire data model (buckets, object listings, xaction status)
//! - Retry with exponential backoff
//! - The xaction completion state machine
//!
//! Nothing in this crate performs I/O against a cluster; the HTTP adapter
//! lives in `ac-client`.

pub mod config;
pub mod error;
pub mod props;
pub mod provider;
pub mod retry;
pub mod types;
pub mod uri;
pub mod xaction;

pub use config::{ClientConfig, ConfigManager, PollConfig, RetryConfig};
pub use error::{Error, Result};
pub use props::{ObjectProp, PropsSpec};
pub use provider::Provider;
pub use types::{
    ActionMsg, Bck, ClusterErrorBody, ObjectEntry, ObjectPage, XactReqMsg, XactStatus,
    XactionHandle,
};
pub use uri::{BucketUri, parse_uri};
pub use xaction::{PollObservation, XactPhase, next_phase};
