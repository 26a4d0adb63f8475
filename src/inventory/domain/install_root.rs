use super::{RuntimeBucket, Scope};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A directory to scan, already resolved by site discovery or given by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallRoot {
    path: PathBuf,
    scope: Scope,
    runtime_bucket: RuntimeBucket,
}

impl InstallRoot {
    pub fn new(path: PathBuf, scope: Scope, runtime_bucket: RuntimeBucket) -> Self {
        Self {
            path,
            scope,
            runtime_bucket,
        }
    }

    /// A root whose bucket is derived from its own path.
    pub fn with_derived_bucket(path: PathBuf, scope: Scope) -> Self {
        let runtime_bucket = RuntimeBucket::from_path(&path);
        Self::new(path, scope, runtime_bucket)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn runtime_bucket(&self) -> &RuntimeBucket {
        &self.runtime_bucket
    }
}

/// The two on-disk metadata shapes, plus the flat single-file variant of the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataShape {
    /// `<name>-<version>.dist-info/METADATA` with `Requires-Dist` headers.
    DistInfo,
    /// `<name>-<version>.egg-info/PKG-INFO` with an optional `requires.txt`.
    EggInfoDir,
    /// `<name>-<version>.egg-info` as a single PKG-INFO file.
    EggInfoFile,
}

impl MetadataShape {
    /// The file holding the header block, relative to the record location.
    pub fn header_file(&self) -> Option<&'static str> {
        match self {
            MetadataShape::DistInfo => Some("METADATA"),
            MetadataShape::EggInfoDir => Some("PKG-INFO"),
            MetadataShape::EggInfoFile => None,
        }
    }

    /// Preferred record when one root holds several shapes of the same release.
    pub fn precedence(&self) -> u8 {
        match self {
            MetadataShape::DistInfo => 0,
            MetadataShape::EggInfoDir => 1,
            MetadataShape::EggInfoFile => 2,
        }
    }
}

/// One metadata record found while scanning a root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataLocation {
    pub path: PathBuf,
    pub shape: MetadataShape,
    pub root: PathBuf,
    pub scope: Scope,
    pub runtime_bucket: RuntimeBucket,
}

impl MetadataLocation {
    pub fn new(path: PathBuf, shape: MetadataShape, root: &InstallRoot) -> Self {
        Self {
            path,
            shape,
            root: root.path().to_path_buf(),
            scope: root.scope(),
            runtime_bucket: root.runtime_bucket().clone(),
        }
    }
}
