//! Package configuration normalization and module-file rendering for stackmod.
//!
//! This crate defines the schema layer: the default archive registry
//! (`lookup_default_url`), classification of loosely-shaped package entries
//! (`RawEntry`), entry and set normalization into canonical `PackageRecord`s,
//! per-cluster overlay onto built-in defaults (`build_cluster`), input document
//! parsing (`ClusterDocument`) and Lmod module-file rendering.

pub mod cluster;
pub mod document;
pub mod normalize;
pub mod raw;
pub mod registry;
pub mod render;
pub mod types;

pub use cluster::{
    build_cluster, merge_with_defaults, ClusterConfig, ClusterError, DefaultPackage,
    BUILTIN_DEFAULTS,
};
pub use document::{
    parse_document_file, parse_document_str, ClusterDocument, DocumentError, DocumentFormat,
};
pub use normalize::{normalize_entry, normalize_raw_entry, normalize_set, NormalizeError, PackageRecord};
pub use raw::{PackageSet, RawEntry, RawValue};
pub use registry::{
    get_package, list_packages, lookup_default_url, RegisteredPackage, BUILTIN_PACKAGES,
    DEFAULT_BASE_URL,
};
pub use render::{render_modulefile, RenderOptions, DEFAULT_INSTALL_PREFIX};
pub use types::{ClusterName, Flavor, PackageName, Version, MANDATORY_PACKAGES};
