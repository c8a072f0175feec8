use crate::raw::{PackageSet, RawEntry, RawValue};
use crate::registry::lookup_default_url;
use crate::types::{Flavor, PackageName, Version};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("unknown package '{flavor}' (no default URL registered)")]
    UnknownPackage { flavor: String },
    #[error("unknown version '{version}' for package '{flavor}'")]
    UnknownVersion { flavor: String, version: String },
    #[error("package '{package}' flavor is missing")]
    MissingFlavor { package: String },
    #[error("package '{package}' version is missing")]
    MissingVersion { package: String },
    #[error("ill-formed entry for package '{package}': expected a string or mapping, found {found}")]
    InvalidFormat {
        package: String,
        found: &'static str,
    },
}

/// Canonical description of one package of a cluster.
///
/// `filename` is always the last path segment of `url`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackageRecord {
    pub flavor: Flavor,
    pub version: Version,
    pub url: String,
    pub filename: String,
}

impl PackageRecord {
    pub fn new(flavor: Flavor, version: Version, url: String) -> Self {
        let filename = url.rsplit('/').next().unwrap_or(&url).to_owned();
        Self {
            flavor,
            version,
            url,
            filename,
        }
    }

    /// `"<flavor>-<version>"`, used as a label and as an install path segment.
    pub fn identity(&self) -> String {
        format!("{}-{}", self.flavor, self.version)
    }

    /// Explicit-shape form of this record; normalizing it yields the record again.
    pub fn to_raw(&self) -> RawValue {
        RawValue::mapping([
            ("flavor", self.flavor.as_str()),
            ("version", self.version.as_str()),
            ("url", self.url.as_str()),
        ])
    }
}

/// Normalize one package entry of unknown shape.
pub fn normalize_entry(pkg: &PackageName, raw: &RawValue) -> Result<PackageRecord, NormalizeError> {
    let entry = RawEntry::classify(pkg, raw)?;
    normalize_raw_entry(pkg, entry)
}

/// Normalize an already-classified entry.
pub fn normalize_raw_entry(
    pkg: &PackageName,
    entry: RawEntry,
) -> Result<PackageRecord, NormalizeError> {
    let (flavor, version, url) = match entry {
        RawEntry::Scalar(s) => {
            let (flavor, version) = split_flavor_version(pkg, &s)?;
            (flavor, version, None)
        }
        RawEntry::NameUrl { name, url } => {
            let (flavor, version) = split_flavor_version(pkg, &name)?;
            (flavor, version, url)
        }
        RawEntry::Explicit {
            flavor,
            version,
            url,
        } => {
            let flavor = match flavor {
                Some(f) => f,
                None if pkg.is_mandatory() => {
                    return Err(NormalizeError::MissingFlavor {
                        package: pkg.to_string(),
                    })
                }
                None => pkg.to_string(),
            };
            (flavor, version, url)
        }
    };

    let flavor = require_flavor(pkg, flavor)?;
    let version = require_version(pkg, version)?;
    let url = match url {
        Some(url) => url,
        None => lookup_default_url(&flavor, Some(version.as_str()))?,
    };

    debug!("normalized {pkg}: {flavor}-{version} from {url}");
    Ok(PackageRecord::new(flavor, version, url))
}

/// Normalize every entry of a package set, stopping at the first failure.
///
/// The input is left untouched and keys keep their order.
pub fn normalize_set(
    entries: &PackageSet<RawValue>,
) -> Result<PackageSet<PackageRecord>, NormalizeError> {
    entries
        .iter()
        .map(|(pkg, raw)| normalize_entry(pkg, raw).map(|record| (pkg.clone(), record)))
        .collect()
}

/// Split `"<flavor>-<version>"` on the first `-`. Without a separator the
/// string is a version and the package key is the flavor, which mandatory
/// packages do not allow.
fn split_flavor_version(pkg: &PackageName, s: &str) -> Result<(String, String), NormalizeError> {
    let s = s.trim();
    if let Some((flavor, version)) = s.split_once('-') {
        return Ok((flavor.to_owned(), version.to_owned()));
    }
    if pkg.is_mandatory() {
        return Err(NormalizeError::MissingFlavor {
            package: pkg.to_string(),
        });
    }
    Ok((pkg.to_string(), s.to_owned()))
}

fn require_flavor(pkg: &PackageName, flavor: String) -> Result<Flavor, NormalizeError> {
    if flavor.trim().is_empty() {
        return Err(NormalizeError::MissingFlavor {
            package: pkg.to_string(),
        });
    }
    Ok(Flavor::from(flavor))
}

fn require_version(pkg: &PackageName, version: String) -> Result<Version, NormalizeError> {
    if version.trim().is_empty() {
        return Err(NormalizeError::MissingVersion {
            package: pkg.to_string(),
        });
    }
    Ok(Version::from(version))
}
