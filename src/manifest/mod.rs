//! Nuspec manifest detection, reading and updating
//!
//! This module provides functionality to:
//! - Detect nuspec files in a directory tree
//! - Parse manifests into an editable document with stable node identity
//! - Extract declared dependencies, with or without the schema namespace
//! - Rewrite dependency versions and prepend release-note entries

mod detector;
pub mod document;
mod encoding;
pub mod namespace;
mod nuspec;
mod reader;
mod release_notes;
mod writer;

pub use detector::{detect_manifests, is_manifest_file, ManifestInfo};
pub use document::{ExpandedName, NodeId, XmlDocument};
pub use encoding::{decode_manifest, ManifestEncoding};
pub use namespace::ManifestNamespace;
pub use nuspec::NuspecView;
pub use reader::NuspecFileReader;
pub use release_notes::{Clock, FixedClock, LocalClock, ReleaseNoteEntry};
pub use writer::{read_manifest, write_manifest, UpdateNuspecCommand};

use crate::domain::{NuGetVersion, PackageReference, PackageReferenceType, UpdateResult};
use crate::error::ManifestError;
use std::path::Path;

/// Trait for readers that find package references in one kind of manifest
pub trait PackageReferenceFinder {
    /// Read all package references from `base_directory/relative_path`
    fn read_file(
        &self,
        base_directory: &Path,
        relative_path: &Path,
    ) -> Result<Vec<PackageReference>, ManifestError>;

    /// Glob patterns of the files this reader understands
    fn file_patterns(&self) -> &'static [&'static str];

    /// The kind of manifest this reader handles
    fn reference_type(&self) -> PackageReferenceType;
}

/// Trait for commands that move a package reference to a new version
pub trait UpdateCommand {
    /// Update every declaration of `current_package` in its manifest
    fn invoke(
        &self,
        current_package: &PackageReference,
        new_version: &NuGetVersion,
    ) -> Result<UpdateResult, ManifestError>;
}

/// Get the reference finder for a manifest kind
pub fn get_finder(reference_type: PackageReferenceType) -> Box<dyn PackageReferenceFinder> {
    match reference_type {
        PackageReferenceType::Nuspec => Box::new(NuspecFileReader),
    }
}
