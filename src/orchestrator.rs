//! Update orchestrator for coordinating the entire workflow
//!
//! This module provides:
//! - Workflow coordination: detect → extract → update → summarize
//! - Dry-run mode support
//! - Error handling with partial continuation (one bad manifest does not stop the run)

use crate::cli::CliArgs;
use crate::domain::{ManifestUpdateResult, NuGetVersion, UpdateResult, UpdateSummary};
use crate::error::{AppError, ManifestError};
use crate::manifest::{
    detect_manifests, get_finder, Clock, LocalClock, ManifestInfo, UpdateCommand,
    UpdateNuspecCommand,
};
use crate::progress::{Phase, Progress};
use std::path::PathBuf;
use thiserror::Error;

/// Orchestrator for coordinating the scan and update workflow
pub struct Orchestrator<C = LocalClock> {
    /// CLI arguments for configuration
    args: CliArgs,
    /// Date source handed to the update command
    clock: C,
}

/// Result of running the orchestrator
#[derive(Debug)]
pub struct OrchestratorResult {
    /// Update summary with all results
    pub summary: UpdateSummary,
    /// Errors encountered during processing
    pub errors: Vec<OrchestratorError>,
}

impl OrchestratorResult {
    /// Returns true if at least one manifest failed
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Per-manifest failures recorded while the run continues
#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// Manifest could not be read or parsed
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: ManifestError,
    },

    /// Update could not be applied or written
    #[error("Failed to update {package} in {}: {source}", path.display())]
    Update {
        path: PathBuf,
        package: String,
        #[source]
        source: ManifestError,
    },
}

impl OrchestratorError {
    /// Path of the manifest the error belongs to
    pub fn path(&self) -> &PathBuf {
        match self {
            OrchestratorError::Read { path, .. } => path,
            OrchestratorError::Update { path, .. } => path,
        }
    }
}

impl Orchestrator<LocalClock> {
    /// Create a new orchestrator with the given CLI arguments
    pub fn new(args: CliArgs) -> Result<Self, AppError> {
        Self::with_clock(args, LocalClock)
    }
}

impl<C: Clock + Copy> Orchestrator<C> {
    /// Create an orchestrator stamping release notes with a custom clock
    pub fn with_clock(args: CliArgs, clock: C) -> Result<Self, AppError> {
        args.validate()?;
        Ok(Self { args, clock })
    }

    /// Run the workflow
    pub fn run(&self) -> OrchestratorResult {
        self.run_with_progress(self.args.show_progress())
    }

    /// Run the workflow with optional progress display
    pub fn run_with_progress(&self, show_progress: bool) -> OrchestratorResult {
        let mut progress = Progress::new(show_progress);
        let mut summary = UpdateSummary::new(self.args.dry_run);
        let mut errors = Vec::new();

        // Step 1: Detect manifest files
        progress.scanning(&self.args.path);
        let manifests = detect_manifests(&self.args.path);
        progress.clear();
        tracing::info!(
            "Found {} nuspec file(s) under {}",
            manifests.len(),
            self.args.path.display()
        );

        if manifests.is_empty() {
            return OrchestratorResult { summary, errors };
        }

        // Step 2: Extract references, then update when a target was given
        // Failures are collected here and printed by the caller
        let phase = match self.args.target() {
            Some(_) => Phase::Update {
                dry_run: self.args.dry_run,
            },
            None => Phase::Read,
        };
        progress.manifests(manifests.len(), phase);
        for manifest in &manifests {
            match self.process_manifest(manifest) {
                Ok(result) => summary.add_manifest(result),
                Err(e) => errors.push(e),
            }
            progress.manifest_done(&manifest.path);
        }
        progress.clear();

        OrchestratorResult { summary, errors }
    }

    fn process_manifest(
        &self,
        manifest: &ManifestInfo,
    ) -> Result<ManifestUpdateResult, OrchestratorError> {
        let package_path = manifest.package_path(&self.args.path);
        let finder = get_finder(manifest.reference_type);

        let references = finder
            .read_file(&package_path.base_directory, &package_path.relative_path)
            .map_err(|source| OrchestratorError::Read {
                path: manifest.path.clone(),
                source,
            })?;
        tracing::debug!(
            "Read {} dependencies from {}",
            references.len(),
            manifest.path.display()
        );

        let mut result = ManifestUpdateResult::new(&manifest.path, references);

        if let Some((package_id, new_version)) = self.args.target() {
            if let Some(update) = self.update_manifest(&result, package_id, new_version)? {
                result = result.with_update(update);
            }
        }

        Ok(result)
    }

    fn update_manifest(
        &self,
        manifest: &ManifestUpdateResult,
        package_id: &str,
        new_version: &NuGetVersion,
    ) -> Result<Option<UpdateResult>, OrchestratorError> {
        let Some(current_package) = manifest.references_to(package_id).next() else {
            return Ok(None);
        };

        let command = UpdateNuspecCommand::with_clock(self.args.dry_run, self.clock);
        command
            .invoke(current_package, new_version)
            .map(Some)
            .map_err(|source| OrchestratorError::Update {
                path: manifest.path.clone(),
                package: package_id.to_string(),
                source,
            })
    }
}
