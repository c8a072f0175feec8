//! Loosely-typed package entries as they arrive from an input document.
//!
//! [`RawValue`] is the format-neutral tree produced from YAML or TOML input.
//! [`RawEntry::classify`] sorts a value into one of the three accepted entry
//! shapes before any flavor/version validation runs.

use crate::normalize::NormalizeError;
use crate::types::PackageName;
use indexmap::IndexMap;

/// Package entries of one cluster, in document order.
pub type PackageSet<T> = IndexMap<PackageName, T>;

/// A nested value from the input document.
///
/// Only string scalars are kept as text. Numbers, booleans and dates lose
/// their source spelling when parsed (`2.80` reads back as `2.8`), so they
/// are carried as `Typed` with just their kind and rejected on use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Null,
    Scalar(String),
    Typed(&'static str),
    Sequence(Vec<RawValue>),
    Mapping(IndexMap<String, RawValue>),
}

impl RawValue {
    pub fn scalar(s: impl Into<String>) -> Self {
        Self::Scalar(s.into())
    }

    /// Build a mapping of scalar fields, mostly useful for fixed defaults.
    pub fn mapping<'a>(fields: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self::Mapping(
            fields
                .into_iter()
                .map(|(k, v)| (k.to_owned(), Self::scalar(v)))
                .collect(),
        )
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Scalar(_) => "scalar",
            Self::Typed(kind) => *kind,
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
        }
    }

    pub fn as_mapping(&self) -> Option<&IndexMap<String, RawValue>> {
        match self {
            Self::Mapping(m) => Some(m),
            _ => None,
        }
    }
}

impl From<serde_yaml::Value> for RawValue {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Typed("unquoted boolean"),
            Value::Number(_) => Self::Typed("unquoted number"),
            Value::String(s) => Self::Scalar(s),
            Value::Sequence(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Mapping(map) => Self::Mapping(
                map.into_iter()
                    .map(|(k, v)| (yaml_key(k), Self::from(v)))
                    .collect(),
            ),
            Value::Tagged(tagged) => Self::from(tagged.value),
        }
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    use serde_yaml::Value;
    match key {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_owned(),
        Value::Tagged(tagged) => yaml_key(tagged.value),
        other => format!("<{}>", RawValue::from(other).kind()),
    }
}

impl From<toml::Value> for RawValue {
    fn from(value: toml::Value) -> Self {
        use toml::Value;
        match value {
            Value::String(s) => Self::Scalar(s),
            Value::Integer(_) | Value::Float(_) => Self::Typed("unquoted number"),
            Value::Boolean(_) => Self::Typed("unquoted boolean"),
            Value::Datetime(_) => Self::Typed("unquoted datetime"),
            Value::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Table(table) => Self::Mapping(
                table
                    .into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect(),
            ),
        }
    }
}

/// The accepted shapes of a package entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEntry {
    /// `"<flavor>-<version>"`, or a bare `"<version>"` for non-mandatory packages.
    Scalar(String),
    /// `{ name: <scalar form>, url: <override>? }`
    NameUrl { name: String, url: Option<String> },
    /// `{ flavor: <flavor>?, version: <version>, url: <override>? }`
    Explicit {
        flavor: Option<String>,
        version: String,
        url: Option<String>,
    },
}

impl RawEntry {
    /// Decide which shape `value` has.
    ///
    /// A `name` key takes priority over `flavor`/`version`. A mapping with
    /// neither `name` nor `version` is rejected here; flavor requirements are
    /// left to the normalizer.
    pub fn classify(pkg: &PackageName, value: &RawValue) -> Result<Self, NormalizeError> {
        let map = match value {
            RawValue::Scalar(s) => return Ok(Self::Scalar(s.clone())),
            RawValue::Mapping(map) => map,
            other => {
                return Err(NormalizeError::InvalidFormat {
                    package: pkg.to_string(),
                    found: other.kind(),
                })
            }
        };

        if let Some(name) = map.get("name") {
            return Ok(Self::NameUrl {
                name: scalar_field(pkg, name)?,
                url: optional_field(pkg, map, "url")?,
            });
        }

        let Some(version) = map.get("version") else {
            return Err(NormalizeError::MissingVersion {
                package: pkg.to_string(),
            });
        };

        Ok(Self::Explicit {
            flavor: optional_field(pkg, map, "flavor")?,
            version: scalar_field(pkg, version)?,
            url: optional_field(pkg, map, "url")?,
        })
    }
}

fn scalar_field(pkg: &PackageName, value: &RawValue) -> Result<String, NormalizeError> {
    match value {
        RawValue::Scalar(s) => Ok(s.clone()),
        other => Err(NormalizeError::InvalidFormat {
            package: pkg.to_string(),
            found: other.kind(),
        }),
    }
}

fn optional_field(
    pkg: &PackageName,
    map: &IndexMap<String, RawValue>,
    key: &str,
) -> Result<Option<String>, NormalizeError> {
    map.get(key).map(|v| scalar_field(pkg, v)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pkg(name: &str) -> PackageName {
        PackageName::from(name)
    }

    #[test]
    fn classifies_scalar() {
        let entry = RawEntry::classify(&pkg("mpi"), &RawValue::scalar("openmpi-4.1.6")).unwrap();
        assert_eq!(entry, RawEntry::Scalar("openmpi-4.1.6".to_owned()));
    }

    #[test]
    fn name_key_wins_over_version() {
        let value = RawValue::mapping([("name", "fftw-3.3.10"), ("version", "9.9")]);
        let entry = RawEntry::classify(&pkg("fftw"), &value).unwrap();
        assert_eq!(
            entry,
            RawEntry::NameUrl {
                name: "fftw-3.3.10".to_owned(),
                url: None
            }
        );
    }

    #[test]
    fn classifies_explicit_mapping() {
        let value = RawValue::mapping([("flavor", "gsl"), ("version", "2.8"), ("extra", "x")]);
        let entry = RawEntry::classify(&pkg("gsl"), &value).unwrap();
        assert_eq!(
            entry,
            RawEntry::Explicit {
                flavor: Some("gsl".to_owned()),
                version: "2.8".to_owned(),
                url: None
            }
        );
    }

    #[test]
    fn mapping_without_name_or_version_is_missing_version() {
        let value = RawValue::mapping([("flavor", "openmpi")]);
        let err = RawEntry::classify(&pkg("mpi"), &value).unwrap_err();
        assert!(matches!(err, NormalizeError::MissingVersion { .. }));
    }

    #[test]
    fn rejects_sequence_and_null() {
        let seq = RawValue::Sequence(vec![RawValue::scalar("1.0")]);
        assert!(matches!(
            RawEntry::classify(&pkg("gsl"), &seq).unwrap_err(),
            NormalizeError::InvalidFormat { found: "sequence", .. }
        ));
        assert!(matches!(
            RawEntry::classify(&pkg("gsl"), &RawValue::Null).unwrap_err(),
            NormalizeError::InvalidFormat { found: "null", .. }
        ));
    }

    #[test]
    fn rejects_nested_field_value() {
        let mut map = IndexMap::new();
        map.insert("version".to_owned(), RawValue::mapping([("a", "b")]));
        let err = RawEntry::classify(&pkg("gsl"), &RawValue::Mapping(map)).unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidFormat { found: "mapping", .. }));
    }

    #[test]
    fn yaml_quoted_scalars_keep_their_text() {
        let value: serde_yaml::Value =
            serde_yaml::from_str("version: \"2.80\"\nname: fftw-3.3.10\n").unwrap();
        let raw = RawValue::from(value);
        let map = raw.as_mapping().unwrap();
        assert_eq!(map["version"], RawValue::scalar("2.80"));
        assert_eq!(map["name"], RawValue::scalar("fftw-3.3.10"));
    }

    #[test]
    fn yaml_numbers_and_booleans_are_not_text() {
        let value: serde_yaml::Value =
            serde_yaml::from_str("version: 2.80\nhex: 0x10\nflag: true\n").unwrap();
        let raw = RawValue::from(value);
        let map = raw.as_mapping().unwrap();
        assert_eq!(map["version"], RawValue::Typed("unquoted number"));
        assert_eq!(map["hex"], RawValue::Typed("unquoted number"));
        assert_eq!(map["flag"], RawValue::Typed("unquoted boolean"));
    }

    #[test]
    fn unquoted_version_is_rejected_not_reformatted() {
        let value: serde_yaml::Value =
            serde_yaml::from_str("version: 2.80\nurl: http://x/gsl.tgz\n").unwrap();
        let err = RawEntry::classify(&pkg("gsl"), &RawValue::from(value)).unwrap_err();
        assert_eq!(
            err,
            NormalizeError::InvalidFormat {
                package: "gsl".to_owned(),
                found: "unquoted number"
            }
        );

        let value: serde_yaml::Value = serde_yaml::from_str("3.10").unwrap();
        assert!(matches!(
            RawEntry::classify(&pkg("fftw"), &RawValue::from(value)).unwrap_err(),
            NormalizeError::InvalidFormat { found: "unquoted number", .. }
        ));
    }

    #[test]
    fn toml_numbers_are_not_text() {
        let value: toml::Value = toml::from_str("version = 2.80\nbuild = 10\n").unwrap();
        let raw = RawValue::from(value);
        let map = raw.as_mapping().unwrap();
        assert_eq!(map["version"], RawValue::Typed("unquoted number"));
        assert_eq!(map["build"], RawValue::Typed("unquoted number"));
    }

    #[test]
    fn numeric_yaml_keys_become_text() {
        let value: serde_yaml::Value = serde_yaml::from_str("2024: x\n").unwrap();
        let raw = RawValue::from(value);
        assert!(raw.as_mapping().unwrap().contains_key("2024"));
    }

    #[test]
    fn toml_tables_become_mappings() {
        let value: toml::Value = toml::from_str("version = \"3.3.10\"\nflavor = \"fftw\"\n").unwrap();
        let raw = RawValue::from(value);
        let map = raw.as_mapping().unwrap();
        assert_eq!(map["version"], RawValue::scalar("3.3.10"));
        assert_eq!(map["flavor"], RawValue::scalar("fftw"));
    }
}
