//! Object property selectors for listing requests
//!
//! Listings fetch only the properties the caller asked for; the selector
//! serializes to the comma-separated form the cluster expects.

use serde::{Deserialize, Serialize};

/// One requestable object property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectProp {
    Name,
    Size,
    Atime,
    Version,
    Checksum,
    Cached,
    TargetUrl,
    Status,
    Copies,
    Ec,
    Custom,
    Node,
}

impl ObjectProp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectProp::Name => "name",
            ObjectProp::Size => "size",
            ObjectProp::Atime => "atime",
            ObjectProp::Version => "version",
            ObjectProp::Checksum => "checksum",
            ObjectProp::Cached => "cached",
            ObjectProp::TargetUrl => "target_url",
            ObjectProp::Status => "status",
            ObjectProp::Copies => "copies",
            ObjectProp::Ec => "ec",
            ObjectProp::Custom => "custom",
            ObjectProp::Node => "node",
        }
    }
}

impl std::fmt::Display for ObjectProp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ObjectProp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "name" => Ok(ObjectProp::Name),
            "size" => Ok(ObjectProp::Size),
            "atime" => Ok(ObjectProp::Atime),
            "version" => Ok(ObjectProp::Version),
            "checksum" => Ok(ObjectProp::Checksum),
            "cached" => Ok(ObjectProp::Cached),
            "target_url" => Ok(ObjectProp::TargetUrl),
            "status" => Ok(ObjectProp::Status),
            "copies" => Ok(ObjectProp::Copies),
            "ec" => Ok(ObjectProp::Ec),
            "custom" => Ok(ObjectProp::Custom),
            "node" => Ok(ObjectProp::Node),
            other => Err(format!("invalid object property: {other}")),
        }
    }
}

/// Ordered set of requested properties
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropsSpec(Vec<ObjectProp>);

impl PropsSpec {
    pub fn new(props: Vec<ObjectProp>) -> Self {
        Self(props)
    }

    /// The listing default: name and size
    pub fn name_and_size() -> Self {
        Self(vec![ObjectProp::Name, ObjectProp::Size])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, prop: ObjectProp) -> bool {
        self.0.contains(&prop)
    }

    /// Comma-separated wire form, e.g. "name,size,cached"
    pub fn to_wire(&self) -> String {
        self.0
            .iter()
            .map(ObjectProp::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl std::fmt::Display for PropsSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_wire())
    }
}

impl std::str::FromStr for PropsSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Self::default());
        }
        let props = s
            .split(',')
            .map(str::parse)
            .collect::<Result<Vec<ObjectProp>, _>>()?;
        Ok(Self(props))
    }
}
