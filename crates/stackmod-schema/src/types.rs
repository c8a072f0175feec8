//! Newtype wrappers for the string identifiers that flow through normalization.
//!
//! All newtypes serialize/deserialize as plain strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new instance from a string.
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Return the inner string as a slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume self and return the inner `String`.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }
    };
}

string_newtype!(
    /// Key of a package entry in a cluster configuration (`mpi`, `hdf5`, ...).
    PackageName
);

string_newtype!(
    /// Concrete implementation of a package category, e.g. `openmpi` for `mpi`.
    Flavor
);

string_newtype!(
    /// Exact version string of a flavor.
    Version
);

string_newtype!(
    /// Name of a deployment target as written in the input document.
    ClusterName
);

/// Packages whose flavor cannot be inferred from the package key.
pub const MANDATORY_PACKAGES: &[&str] = &["fab", "mpi", "blas"];

impl PackageName {
    /// Whether entries for this package must spell out their flavor.
    pub fn is_mandatory(&self) -> bool {
        MANDATORY_PACKAGES.iter().any(|p| *p == self.as_str())
    }

    /// Uppercased prefix used for the package's environment variables.
    pub fn env_prefix(&self) -> String {
        self.0.to_uppercase()
    }
}

impl ClusterName {
    /// File stem of the module file written for this cluster.
    pub fn file_stem(&self) -> String {
        self.0.to_lowercase()
    }
}
