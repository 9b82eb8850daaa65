//! Per-manifest and overall run summaries

use super::{PackageReference, UpdateResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything learned about a single manifest file during a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestUpdateResult {
    /// Path to the manifest file
    pub path: PathBuf,
    /// Package references extracted from the manifest
    pub references: Vec<PackageReference>,
    /// Outcome of the update request, when one was made
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<UpdateResult>,
}

impl ManifestUpdateResult {
    /// Creates a new ManifestUpdateResult
    pub fn new(path: impl Into<PathBuf>, references: Vec<PackageReference>) -> Self {
        Self {
            path: path.into(),
            references,
            update: None,
        }
    }

    /// Records the update outcome
    pub fn with_update(mut self, update: UpdateResult) -> Self {
        self.update = Some(update);
        self
    }

    /// Returns true if any dependency was rewritten
    pub fn has_updates(&self) -> bool {
        self.update.as_ref().is_some_and(UpdateResult::is_update)
    }

    /// Returns true if the file on disk was rewritten
    pub fn modified(&self) -> bool {
        self.update.as_ref().is_some_and(UpdateResult::file_modified)
    }

    /// Returns references with the given package id
    pub fn references_to<'a>(
        &'a self,
        package_id: &'a str,
    ) -> impl Iterator<Item = &'a PackageReference> + 'a {
        self.references.iter().filter(move |r| r.id == package_id)
    }
}

/// Overall summary of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateSummary {
    /// Results for each manifest file processed
    pub manifests: Vec<ManifestUpdateResult>,
    /// Whether this was a dry run
    pub dry_run: bool,
}

impl UpdateSummary {
    /// Creates a new UpdateSummary
    pub fn new(dry_run: bool) -> Self {
        Self {
            manifests: Vec::new(),
            dry_run,
        }
    }

    /// Adds a manifest result
    pub fn add_manifest(&mut self, manifest: ManifestUpdateResult) {
        self.manifests.push(manifest);
    }

    /// Returns the total number of files processed
    pub fn files_processed(&self) -> usize {
        self.manifests.len()
    }

    /// Returns the total number of files modified
    pub fn files_modified(&self) -> usize {
        self.manifests.iter().filter(|m| m.modified()).count()
    }

    /// Returns the total number of package references found
    pub fn total_references(&self) -> usize {
        self.manifests.iter().map(|m| m.references.len()).sum()
    }

    /// Returns the total number of dependency elements rewritten
    pub fn total_updates(&self) -> usize {
        self.manifests
            .iter()
            .filter_map(|m| m.update.as_ref())
            .map(UpdateResult::dependencies_updated)
            .sum()
    }

    /// Returns true if any manifest had a dependency rewritten
    pub fn has_changes(&self) -> bool {
        self.manifests.iter().any(ManifestUpdateResult::has_updates)
    }

    /// Returns all update outcomes across all manifests
    pub fn all_updates(&self) -> impl Iterator<Item = &UpdateResult> {
        self.manifests.iter().filter_map(|m| m.update.as_ref())
    }
}

impl Default for UpdateSummary {
    fn default() -> Self {
        Self::new(false)
    }
}
