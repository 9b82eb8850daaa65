//! Location of a manifest inside a repository checkout

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Kind of manifest a package reference was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum PackageReferenceType {
    /// NuGet package manifest (`*.nuspec`)
    Nuspec,
}

impl PackageReferenceType {
    /// Glob patterns of the files holding this kind of manifest
    pub fn file_patterns(&self) -> &'static [&'static str] {
        match self {
            PackageReferenceType::Nuspec => &["*.nuspec"],
        }
    }

    /// File extension (without the dot) of this kind of manifest
    pub fn extension(&self) -> &'static str {
        match self {
            PackageReferenceType::Nuspec => "nuspec",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PackageReferenceType::Nuspec => "nuspec",
        }
    }
}

impl fmt::Display for PackageReferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A manifest file addressed relative to a base directory
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackagePath {
    /// Directory the relative path is resolved against
    pub base_directory: PathBuf,
    /// Path of the manifest below `base_directory`
    pub relative_path: PathBuf,
    /// Kind of manifest
    pub reference_type: PackageReferenceType,
}

impl PackagePath {
    /// Creates a new PackagePath
    pub fn new(
        base_directory: impl Into<PathBuf>,
        relative_path: impl Into<PathBuf>,
        reference_type: PackageReferenceType,
    ) -> Self {
        Self {
            base_directory: base_directory.into(),
            relative_path: relative_path.into(),
            reference_type,
        }
    }

    /// Creates a PackagePath for a nuspec file
    pub fn nuspec(base_directory: impl Into<PathBuf>, relative_path: impl Into<PathBuf>) -> Self {
        Self::new(base_directory, relative_path, PackageReferenceType::Nuspec)
    }

    /// Splits an on-disk file path into base directory and file name
    pub fn from_file(path: &Path, reference_type: PackageReferenceType) -> Self {
        let base_directory = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let relative_path = path
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| path.to_path_buf());
        Self::new(base_directory, relative_path, reference_type)
    }

    /// Base directory joined with the relative path
    pub fn full_path(&self) -> PathBuf {
        self.base_directory.join(&self.relative_path)
    }
}

impl fmt::Display for PackagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_path().display())
    }
}
