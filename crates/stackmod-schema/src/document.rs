//! Input documents: cluster name → package entries.

use crate::cluster::{build_cluster, ClusterConfig, ClusterError};
use crate::raw::{PackageSet, RawValue};
use crate::types::{ClusterName, PackageName};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read cluster configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse cluster configuration: {0}")]
    ParseYaml(#[from] serde_yaml::Error),
    #[error("failed to parse cluster configuration: {0}")]
    ParseToml(#[from] toml::de::Error),
    #[error("unsupported configuration format '{0}' (expected .yml, .yaml or .toml)")]
    UnsupportedFormat(String),
    #[error("invalid cluster configuration: {0}")]
    InvalidLayout(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Toml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Result<Self, DocumentError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase();
        match ext.as_str() {
            "yml" | "yaml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            _ => Err(DocumentError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Every cluster of an input document, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterDocument {
    pub clusters: Vec<(ClusterName, PackageSet<RawValue>)>,
}

impl ClusterDocument {
    pub fn from_raw(root: RawValue) -> Result<Self, DocumentError> {
        let top = match root {
            RawValue::Mapping(map) => map,
            // An empty document has no clusters.
            RawValue::Null => return Ok(Self::default()),
            other => {
                return Err(DocumentError::InvalidLayout(format!(
                    "top level must map cluster names to packages, found {}",
                    other.kind()
                )))
            }
        };

        let mut clusters = Vec::with_capacity(top.len());
        for (name, body) in top {
            check_cluster_name(&name)?;
            let packages: PackageSet<RawValue> = match body {
                RawValue::Mapping(map) => map
                    .into_iter()
                    .map(|(pkg, raw)| {
                        check_package_key(&name, &pkg)?;
                        Ok((PackageName::from(pkg), raw))
                    })
                    .collect::<Result<_, DocumentError>>()?,
                RawValue::Null => PackageSet::new(),
                other => {
                    return Err(DocumentError::InvalidLayout(format!(
                        "cluster '{name}' must map package names to entries, found {}",
                        other.kind()
                    )))
                }
            };
            clusters.push((ClusterName::from(name), packages));
        }
        Ok(Self { clusters })
    }

    pub fn names(&self) -> impl Iterator<Item = &ClusterName> {
        self.clusters.iter().map(|(name, _)| name)
    }

    pub fn get(&self, name: &str) -> Option<&PackageSet<RawValue>> {
        self.clusters
            .iter()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, packages)| packages)
    }

    pub fn build(&self, name: &str) -> Option<Result<ClusterConfig, ClusterError>> {
        self.get(name).map(|packages| build_cluster(name, packages))
    }

    /// Build every cluster, stopping at the first one that fails.
    pub fn build_all(&self) -> Result<Vec<ClusterConfig>, ClusterError> {
        self.clusters
            .iter()
            .map(|(name, packages)| build_cluster(name.clone(), packages))
            .collect()
    }

    /// Build every cluster and keep each outcome, so all failures can be
    /// reported together.
    pub fn build_each(&self) -> Vec<Result<ClusterConfig, ClusterError>> {
        self.clusters
            .iter()
            .map(|(name, packages)| build_cluster(name.clone(), packages))
            .collect()
    }
}

/// Cluster names become module file names, so they must be a single path
/// component.
fn check_cluster_name(name: &str) -> Result<(), DocumentError> {
    let bad = name.trim().is_empty()
        || name == "."
        || name == ".."
        || name.chars().any(|c| c == '/' || c == '\\' || c.is_control());
    if bad {
        return Err(DocumentError::InvalidLayout(format!(
            "cluster name {name:?} must be a single file name component"
        )));
    }
    Ok(())
}

/// Package keys become environment variable names.
fn check_package_key(cluster: &str, key: &str) -> Result<(), DocumentError> {
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(DocumentError::InvalidLayout(format!(
            "package key {key:?} in cluster '{cluster}' may only contain letters, digits and '_'"
        )));
    }
    Ok(())
}

pub fn parse_document_str(
    input: &str,
    format: DocumentFormat,
) -> Result<ClusterDocument, DocumentError> {
    let root = match format {
        DocumentFormat::Yaml => RawValue::from(serde_yaml::from_str::<serde_yaml::Value>(input)?),
        DocumentFormat::Toml => {
            RawValue::from(toml::Value::Table(toml::from_str::<toml::Table>(input)?))
        }
    };
    ClusterDocument::from_raw(root)
}

pub fn parse_document_file(path: impl AsRef<Path>) -> Result<ClusterDocument, DocumentError> {
    let path = path.as_ref();
    let format = DocumentFormat::from_path(path)?;
    let content = fs::read_to_string(path)?;
    parse_document_str(&content, format)
}
