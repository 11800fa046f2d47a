//! Bucket and object URI parsing
//!
//! CLI arguments and environment selectors name buckets as
//! `<provider>://<bucket>[/<object>]`, e.g. `ais://imagenet` or
//! `aws://training-data/shard-000.tar`. A bare name with no scheme selects
//! a bucket in the cluster's own provider.

use crate::error::{Error, Result};
use crate::provider::Provider;
use crate::types::Bck;

/// Parsed bucket specifier, optionally naming an object inside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketUri {
    pub bck: Bck,
    pub object: Option<String>,
}

impl BucketUri {
    /// The object name, or an error naming the offending input
    pub fn require_object(&self, input: &str) -> Result<&str> {
        self.object
            .as_deref()
            .ok_or_else(|| Error::InvalidArgument(format!("expected an object in '{input}'")))
    }
}

impl std::fmt::Display for BucketUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.object {
            Some(object) => write!(f, "{}/{}", self.bck, object),
            None => write!(f, "{}", self.bck),
        }
    }
}

/// Parse a `<provider>://<bucket>[/<object>]` specifier.
///
/// Object names may contain slashes; everything after the first `/` past the
/// bucket name belongs to the object.
pub fn parse_uri(input: &str) -> Result<BucketUri> {
    let (provider, rest) = match input.split_once("://") {
        Some((scheme, rest)) => {
            let provider = scheme
                .parse::<Provider>()
                .map_err(Error::InvalidArgument)?;
            (provider, rest)
        }
        None => (Provider::Ais, input),
    };

    let (name, object) = match rest.split_once('/') {
        Some((name, object)) if !object.is_empty() => (name, Some(object.to_string())),
        Some((name, _)) => (name, None),
        None => (rest, None),
    };

    if name.is_empty() {
        return Err(Error::InvalidArgument(format!(
            "missing bucket name in '{input}'"
        )));
    }

    Ok(BucketUri {
        bck: Bck::new(name, provider),
        object,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bucket_only() {
        let uri = parse_uri("ais://imagenet").unwrap();
        assert_eq!(uri.bck, Bck::ais("imagenet"));
        assert!(uri.object.is_none());
    }

    #[test]
    fn test_parse_bare_name_defaults_to_ais() {
        let uri = parse_uri("scratch").unwrap();
        assert_eq!(uri.bck.provider, Provider::Ais);
        assert_eq!(uri.bck.name, "scratch");
    }

    #[test]
    fn test_parse_remote_bucket_with_object() {
        let uri = parse_uri("aws://training-data/shards/shard-000.tar").unwrap();
        assert_eq!(uri.bck.provider, Provider::Amazon);
        assert_eq!(uri.bck.name, "training-data");
        assert_eq!(uri.object.as_deref(), Some("shards/shard-000.tar"));
    }

    #[test]
    fn test_parse_trailing_slash() {
        let uri = parse_uri("gcp://models/").unwrap();
        assert_eq!(uri.bck.name, "models");
        assert!(uri.object.is_none());
    }

    #[test]
    fn test_parse_rejects_unknown_provider() {
        assert!(matches!(
            parse_uri("s3://bucket"),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_parse_rejects_empty_bucket() {
        assert!(parse_uri("ais://").is_err());
        assert!(parse_uri("ais:///obj").is_err());
    }

    #[test]
    fn test_require_object() {
        let uri = parse_uri("ais://b/o").unwrap();
        assert_eq!(uri.require_object("ais://b/o").unwrap(), "o");

        let uri = parse_uri("ais://b").unwrap();
        assert!(uri.require_object("ais://b").is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for input in ["ais://imagenet", "aws://data/obj.bin"] {
            assert_eq!(parse_uri(input).unwrap().to_string(), input);
        }
    }
}
