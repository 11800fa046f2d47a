//! Bucket backend providers
//!
//! A bucket identity always carries a provider tag. Behavior differences
//! between local and remote backends (e.g. caching semantics, which lifecycle
//! operations apply) are keyed on this closed enum.

use serde::{Deserialize, Serialize};

/// Backend provider of a bucket
///
/// `Ais` is the cluster's own (local) provider; all others are remote
/// backends the cluster fronts. Objects in `Ais` buckets are always resident,
/// so the "cached" property is only meaningful for remote providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Provider {
    /// Native cluster bucket
    #[default]
    #[serde(rename = "ais")]
    Ais,
    /// Amazon S3
    #[serde(rename = "aws")]
    Amazon,
    /// Google Cloud Storage
    #[serde(rename = "gcp")]
    Google,
    /// Azure Blob Storage
    #[serde(rename = "azure")]
    Azure,
    /// Plain HTTP(S) backend
    #[serde(rename = "ht")]
    Http,
    /// HDFS backend
    #[serde(rename = "hdfs")]
    Hdfs,
}

impl Provider {
    /// Wire tag as the cluster expects it in query parameters and bodies
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Ais => "ais",
            Provider::Amazon => "aws",
            Provider::Google => "gcp",
            Provider::Azure => "azure",
            Provider::Http => "ht",
            Provider::Hdfs => "hdfs",
        }
    }

    /// True for every provider other than the cluster's own
    pub fn is_remote(&self) -> bool {
        !matches!(self, Provider::Ais)
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ais" => Ok(Provider::Ais),
            "aws" => Ok(Provider::Amazon),
            "gcp" => Ok(Provider::Google),
            "azure" => Ok(Provider::Azure),
            "ht" => Ok(Provider::Http),
            "hdfs" => Ok(Provider::Hdfs),
            _ => Err(format!("invalid provider: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_default_is_ais() {
        assert_eq!(Provider::default(), Provider::Ais);
    }

    #[test]
    fn test_provider_round_trip() {
        for tag in ["ais", "aws", "gcp", "azure", "ht", "hdfs"] {
            let provider: Provider = tag.parse().unwrap();
            assert_eq!(provider.to_string(), tag);
        }
    }

    #[test]
    fn test_provider_from_str_case_insensitive() {
        assert_eq!("AWS".parse::<Provider>().unwrap(), Provider::Amazon);
        assert_eq!("Ais".parse::<Provider>().unwrap(), Provider::Ais);
        assert!("s3".parse::<Provider>().is_err());
    }

    #[test]
    fn test_provider_remoteness() {
        assert!(!Provider::Ais.is_remote());
        assert!(Provider::Amazon.is_remote());
        assert!(Provider::Google.is_remote());
        assert!(Provider::Hdfs.is_remote());
    }

    #[test]
    fn test_provider_serde_tags() {
        let json = serde_json::to_string(&Provider::Google).unwrap();
        assert_eq!(json, "\"gcp\"");
        let provider: Provider = serde_json::from_str("\"ht\"").unwrap();
        assert_eq!(provider, Provider::Http);
    }
}
