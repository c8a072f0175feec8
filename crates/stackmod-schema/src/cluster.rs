use crate::normalize::{normalize_set, NormalizeError, PackageRecord};
use crate::raw::{PackageSet, RawValue};
use crate::types::{ClusterName, PackageName};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClusterError {
    #[error("cluster '{cluster}': {source}")]
    Normalize {
        cluster: String,
        #[source]
        source: NormalizeError,
    },
    #[error("cluster '{cluster}': mandatory package '{package}' is not configured")]
    MissingPackage { cluster: String, package: String },
}

impl ClusterError {
    pub fn cluster(&self) -> &str {
        match self {
            Self::Normalize { cluster, .. } | Self::MissingPackage { cluster, .. } => cluster,
        }
    }
}

/// A package every cluster gets unless its configuration replaces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultPackage {
    pub package: &'static str,
    pub flavor: &'static str,
    pub version: &'static str,
}

pub const BUILTIN_DEFAULTS: &[DefaultPackage] = &[
    DefaultPackage {
        package: "blas",
        flavor: "openblas",
        version: "0.3.30",
    },
    DefaultPackage {
        package: "hdf5",
        flavor: "hdf5",
        version: "1.14.6",
    },
    DefaultPackage {
        package: "fftw",
        flavor: "fftw",
        version: "3.3.10",
    },
    DefaultPackage {
        package: "gsl",
        flavor: "gsl",
        version: "2.8",
    },
];

impl DefaultPackage {
    pub fn to_raw(&self) -> RawValue {
        RawValue::mapping([("flavor", self.flavor), ("version", self.version)])
    }
}

/// Normalized configuration of one deployment target.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ClusterConfig {
    pub name: ClusterName,
    pub fab_id: String,
    pub mpi_id: String,
    pub packages: PackageSet<PackageRecord>,
}

impl ClusterConfig {
    pub fn help(&self) -> String {
        format!("{} stack: {} + {}", self.name, self.fab_id, self.mpi_id)
    }

    /// Installation root `<prefix>/<fab_id>/<mpi_id>`.
    pub fn install_root(&self, prefix: &Path) -> PathBuf {
        prefix.join(&self.fab_id).join(&self.mpi_id)
    }

    pub fn package(&self, name: &str) -> Option<&PackageRecord> {
        self.packages.get(&PackageName::from(name))
    }
}

/// Overlay `user_cfg` onto the built-in defaults, package by package.
///
/// A user entry replaces the whole default entry; nothing is merged field
/// by field. Replaced defaults keep their position, new keys are appended.
pub fn merge_with_defaults(user_cfg: &PackageSet<RawValue>) -> PackageSet<RawValue> {
    let mut merged: PackageSet<RawValue> = BUILTIN_DEFAULTS
        .iter()
        .map(|d| (PackageName::from(d.package), d.to_raw()))
        .collect();
    for (pkg, raw) in user_cfg {
        if merged.insert(pkg.clone(), raw.clone()).is_some() {
            debug!("user configuration replaces default for {pkg}");
        }
    }
    merged
}

pub fn build_cluster(
    name: impl Into<ClusterName>,
    user_cfg: &PackageSet<RawValue>,
) -> Result<ClusterConfig, ClusterError> {
    let name = name.into();
    let merged = merge_with_defaults(user_cfg);
    let packages = normalize_set(&merged).map_err(|source| ClusterError::Normalize {
        cluster: name.to_string(),
        source,
    })?;

    let identity = |package: &str| {
        packages
            .get(&PackageName::from(package))
            .map(PackageRecord::identity)
            .ok_or_else(|| ClusterError::MissingPackage {
                cluster: name.to_string(),
                package: package.to_owned(),
            })
    };
    let fab_id = identity("fab")?;
    let mpi_id = identity("mpi")?;

    debug!("built cluster {name}: {fab_id} + {mpi_id}");
    Ok(ClusterConfig {
        name,
        fab_id,
        mpi_id,
        packages,
    })
}
