use crate::normalize::NormalizeError;
use serde::Serialize;

/// Location the prebuilt source archives are published under.
pub const DEFAULT_BASE_URL: &str =
    "https://github.com/leowerneck/apptainer_libs/raw/refs/heads/main";

/// A flavor with a published archive and the versions available for it.
///
/// The first entry of `versions` is the default version.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RegisteredPackage {
    pub flavor: &'static str,
    pub versions: &'static [&'static str],
}

pub const BUILTIN_PACKAGES: &[RegisteredPackage] = &[
    RegisteredPackage {
        flavor: "ucx",
        versions: &["1.15.0"],
    },
    RegisteredPackage {
        flavor: "openmpi",
        versions: &["4.1.6"],
    },
    RegisteredPackage {
        flavor: "openblas",
        versions: &["0.3.30"],
    },
    RegisteredPackage {
        flavor: "hdf5",
        versions: &["1.14.6"],
    },
    RegisteredPackage {
        flavor: "fftw",
        versions: &["3.3.10"],
    },
    RegisteredPackage {
        flavor: "gsl",
        versions: &["2.8"],
    },
];

impl RegisteredPackage {
    pub fn default_version(&self) -> &'static str {
        self.versions[0]
    }

    pub fn supports(&self, version: &str) -> bool {
        self.versions.iter().any(|v| *v == version)
    }

    pub fn url_for(&self, version: &str) -> String {
        format!("{DEFAULT_BASE_URL}/{}-{version}.tar.gz", self.flavor)
    }
}

pub fn get_package(flavor: &str) -> Option<&'static RegisteredPackage> {
    BUILTIN_PACKAGES.iter().find(|p| p.flavor == flavor)
}

pub fn list_packages() -> &'static [RegisteredPackage] {
    BUILTIN_PACKAGES
}

/// Default download URL for `flavor` at `version`, or at its default version
/// when `version` is `None`.
///
/// Only interpolates the registry's base location; nothing is fetched.
pub fn lookup_default_url(flavor: &str, version: Option<&str>) -> Result<String, NormalizeError> {
    let package = get_package(flavor).ok_or_else(|| NormalizeError::UnknownPackage {
        flavor: flavor.to_owned(),
    })?;

    let version = match version {
        Some(v) if !package.supports(v) => {
            return Err(NormalizeError::UnknownVersion {
                flavor: flavor.to_owned(),
                version: v.to_owned(),
            });
        }
        Some(v) => v,
        None => package.default_version(),
    };

    Ok(package.url_for(version))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_registered_version_resolves() {
        for package in BUILTIN_PACKAGES {
            for &version in package.versions {
                let url = lookup_default_url(package.flavor, Some(version)).unwrap();
                assert_eq!(
                    url,
                    format!("{DEFAULT_BASE_URL}/{}-{version}.tar.gz", package.flavor)
                );
                assert_eq!(url, lookup_default_url(package.flavor, Some(version)).unwrap());
            }
        }
    }

    #[test]
    fn missing_version_uses_first_registered() {
        assert_eq!(
            lookup_default_url("openmpi", None).unwrap(),
            format!("{DEFAULT_BASE_URL}/openmpi-4.1.6.tar.gz")
        );
        assert_eq!(
            lookup_default_url("hdf5", None).unwrap(),
            lookup_default_url("hdf5", Some("1.14.6")).unwrap()
        );
    }

    #[test]
    fn rejects_unknown_flavor() {
        let err = lookup_default_url("mympi", None).unwrap_err();
        assert!(matches!(err, NormalizeError::UnknownPackage { ref flavor } if flavor == "mympi"));
        assert!(lookup_default_url("mympi", Some("4.1.6")).is_err());
    }

    #[test]
    fn rejects_unknown_version() {
        let err = lookup_default_url("openmpi", Some("myversion")).unwrap_err();
        assert!(matches!(
            err,
            NormalizeError::UnknownVersion { ref flavor, ref version }
                if flavor == "openmpi" && version == "myversion"
        ));
    }

    #[test]
    fn registry_has_unique_flavors_and_versions() {
        let mut flavors: Vec<&str> = BUILTIN_PACKAGES.iter().map(|p| p.flavor).collect();
        flavors.sort_unstable();
        flavors.dedup();
        assert_eq!(flavors.len(), BUILTIN_PACKAGES.len());
        assert!(BUILTIN_PACKAGES.iter().all(|p| !p.versions.is_empty()));
    }

    #[test]
    fn get_package_by_flavor() {
        assert_eq!(get_package("gsl").unwrap().default_version(), "2.8");
        assert!(get_package("nonexistent").is_none());
    }
}
