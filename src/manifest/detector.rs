//! Manifest file detection
//!
//! Features:
//! - Accepts a single manifest file or a directory to scan recursively
//! - Matches files against the reader's file patterns (`*.nuspec`)
//! - Skips build output, dependency caches and hidden directories

use crate::domain::{PackagePath, PackageReferenceType};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directory names never descended into
const EXCLUDED_DIRS: &[&str] = &["bin", "obj", "node_modules", "packages"];

/// Information about a detected manifest file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestInfo {
    /// Path to the manifest file
    pub path: PathBuf,
    /// Kind of manifest
    pub reference_type: PackageReferenceType,
}

impl ManifestInfo {
    /// Create a new ManifestInfo
    pub fn new(path: impl Into<PathBuf>, reference_type: PackageReferenceType) -> Self {
        Self {
            path: path.into(),
            reference_type,
        }
    }

    /// The manifest addressed relative to `root`
    ///
    /// Falls back to parent directory + file name when the manifest is not
    /// below `root`.
    pub fn package_path(&self, root: &Path) -> PackagePath {
        match self.path.strip_prefix(root) {
            Ok(relative) if !relative.as_os_str().is_empty() => {
                PackagePath::new(root, relative, self.reference_type)
            }
            _ => PackagePath::from_file(&self.path, self.reference_type),
        }
    }
}

/// Returns true if `path` names a file of the given manifest kind
pub fn is_manifest_file(path: &Path, reference_type: PackageReferenceType) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(reference_type.extension()))
}

fn is_excluded_dir(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.') || EXCLUDED_DIRS.contains(&name))
}

/// Detect all nuspec manifests at `path`
///
/// A file path is returned as-is when it is a manifest. A directory is
/// walked recursively; results are sorted by path.
pub fn detect_manifests(path: &Path) -> Vec<ManifestInfo> {
    let reference_type = PackageReferenceType::Nuspec;

    if path.is_file() {
        return if is_manifest_file(path, reference_type) {
            vec![ManifestInfo::new(path, reference_type)]
        } else {
            Vec::new()
        };
    }

    let mut manifests: Vec<ManifestInfo> = WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !is_excluded_dir(entry))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Skipping unreadable path during scan: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| is_manifest_file(entry.path(), reference_type))
        .map(|entry| ManifestInfo::new(entry.into_path(), reference_type))
        .collect();

    manifests.sort_by(|a, b| a.path.cmp(&b.path));
    manifests
}
