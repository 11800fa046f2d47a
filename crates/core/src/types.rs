//! Wire data model for the cluster API
//!
//! JSON request/response bodies exchanged with the cluster: bucket
//! identities, the action-message control envelope, object listing pages,
//! and xaction status reports.

use serde::{Deserialize, Deserializer, Serialize};

use crate::provider::Provider;

// Action names understood by the cluster.
pub const ACT_CREATE_BCK: &str = "create-bck";
pub const ACT_DESTROY_BCK: &str = "destroy-bck";
pub const ACT_MOVE_BCK: &str = "move-bck";
pub const ACT_COPY_BCK: &str = "copy-bck";
pub const ACT_EVICT_REMOTE_BCK: &str = "evict-remote-bck";
pub const ACT_LIST: &str = "list";
pub const ACT_XACT_START: &str = "start";

// Query parameter names.
pub const QPARAM_PROVIDER: &str = "provider";
pub const QPARAM_BCK_TO: &str = "bck_to";
pub const QPARAM_KEEP_MD: &str = "keep_md";
pub const QPARAM_WHAT: &str = "what";

/// `what=` selector for xaction status queries
pub const WHAT_XACT_STATUS: &str = "status";

/// Bucket identity: (name, provider) is unique within a cluster
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bck {
    pub name: String,
    #[serde(default)]
    pub provider: Provider,
}

impl Bck {
    pub fn new(name: impl Into<String>, provider: Provider) -> Self {
        Self {
            name: name.into(),
            provider,
        }
    }

    /// Bucket in the cluster's own provider
    pub fn ais(name: impl Into<String>) -> Self {
        Self::new(name, Provider::Ais)
    }

    /// Encoding used by the `bck_to` query parameter for rename/copy targets
    pub fn bck_to_param(&self) -> String {
        format!("{}/@#/{}/", self.provider, self.name)
    }
}

impl std::fmt::Display for Bck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}://{}", self.provider, self.name)
    }
}

/// Control envelope for bucket and cluster requests
#[derive(Debug, Clone, Serialize)]
pub struct ActionMsg {
    pub action: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

impl ActionMsg {
    pub fn new(action: &str) -> Self {
        Self {
            action: action.to_string(),
            name: String::new(),
            value: None,
        }
    }

    pub fn with_value(action: &str, value: serde_json::Value) -> Self {
        Self {
            action: action.to_string(),
            name: String::new(),
            value: Some(value),
        }
    }
}

/// Value payload of a `list` action
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListObjectsMsg {
    pub prefix: String,
    pub pagesize: u32,
    pub uuid: String,
    pub props: String,
    pub continuation_token: String,
}

/// Value payload of a `copy-bck` action
#[derive(Debug, Clone, Default, Serialize)]
pub struct CopyBckMsg {
    pub prefix: String,
    pub dry_run: bool,
    pub force: bool,
}

/// Request message identifying an xaction by id or kind
#[derive(Debug, Clone, Default, Serialize)]
pub struct XactReqMsg {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bck: Option<Bck>,
}

impl XactReqMsg {
    pub fn by_id(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Self::default()
        }
    }

    pub fn by_kind(kind: &str, bck: Option<Bck>) -> Self {
        Self {
            kind: kind.to_string(),
            bck,
            ..Self::default()
        }
    }
}

/// Accepted asynchronous cluster operation
///
/// The id is opaque and unique per invocation; it stays valid for status
/// queries after the operation reaches a terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XactionHandle {
    pub id: String,
    pub kind: String,
}

impl XactionHandle {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
        }
    }
}

// Low status bits encode entry health; the cached flag sits above them.
const ENTRY_STATUS_MASK: u32 = (1 << 5) - 1;
const ENTRY_FLAG_CACHED: u32 = 1 << 6;

/// One object in a listing page
///
/// Only requested properties are populated; everything else stays at its
/// default. A read-only snapshot taken at list time, not a live view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectEntry {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub checksum: String,
    #[serde(default)]
    pub atime: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub target_url: String,
    #[serde(default)]
    pub copies: u32,
    #[serde(default)]
    pub flags: u32,
}

impl ObjectEntry {
    /// Object resident in the cluster. Always true for `ais` buckets; for
    /// remote providers it flips to false after an evict.
    pub fn is_cached(&self) -> bool {
        self.flags & ENTRY_FLAG_CACHED != 0
    }

    /// Object present and healthy (no status bits set)
    pub fn is_ok(&self) -> bool {
        self.flags & ENTRY_STATUS_MASK == 0
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One page of an object listing
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectPage {
    #[serde(default)]
    pub uuid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub entries: Vec<ObjectEntry>,
    #[serde(default)]
    pub continuation_token: String,
    #[serde(default)]
    pub flags: u32,
}

impl ObjectPage {
    /// Empty continuation token marks the final page
    pub fn is_last(&self) -> bool {
        self.continuation_token.is_empty()
    }
}

/// Cluster-reported status of one xaction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XactStatus {
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub err: String,
    #[serde(default)]
    pub end_time: i64,
    #[serde(default)]
    pub aborted: bool,
}

impl XactStatus {
    /// Terminal iff the cluster recorded an end time
    pub fn finished(&self) -> bool {
        self.end_time != 0
    }

    /// Terminal with an operation-level failure
    pub fn failed(&self) -> bool {
        self.finished() && (self.aborted || !self.err.is_empty())
    }

    /// End time as a timestamp; `end_time` is unix nanoseconds on the wire
    pub fn end_timestamp(&self) -> Option<jiff::Timestamp> {
        if self.end_time == 0 {
            return None;
        }
        jiff::Timestamp::from_nanosecond(i128::from(self.end_time)).ok()
    }
}

/// Structured error body the cluster attaches to non-2xx responses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClusterErrorBody {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub url_path: String,
    #[serde(default)]
    pub caller: String,
    #[serde(default)]
    pub node: String,
}
