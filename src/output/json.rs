//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of scan and update results
//! - Structured file-by-file dependency and update information
//! - The requested update target, when one was given

use crate::domain::{ManifestUpdateResult, UpdateResult, UpdateSummary};
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputConfig, OutputFormatter, UpdateTarget, Verbosity};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    config: OutputConfig,
}

impl JsonFormatter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }
}

/// JSON representation of the full result
#[derive(Serialize)]
struct JsonOutput<'a> {
    /// Whether this was a dry-run
    dry_run: bool,
    /// Package and version to apply
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<&'a UpdateTarget>,
    /// Summary statistics
    summary: JsonSummary,
    /// Per-manifest results
    manifests: Vec<JsonManifest<'a>>,
    /// Errors encountered
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

/// JSON representation of summary statistics
#[derive(Serialize)]
struct JsonSummary {
    /// Number of manifests read
    files: usize,
    /// Number of dependencies extracted
    dependencies: usize,
    /// Number of dependency declarations rewritten
    updates: usize,
    /// Number of files written to disk
    files_modified: usize,
}

/// JSON representation of a manifest result
#[derive(Serialize)]
struct JsonManifest<'a> {
    /// Path to the manifest file
    path: String,
    /// Extracted dependencies
    dependencies: Vec<JsonDependency<'a>>,
    /// Update outcome, when an update was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    update: Option<&'a UpdateResult>,
}

/// JSON representation of a dependency
#[derive(Serialize)]
struct JsonDependency<'a> {
    /// Package id
    id: &'a str,
    /// Normalized version
    version: String,
    /// Attribute value as written in the manifest (verbose mode only)
    #[serde(skip_serializing_if = "Option::is_none")]
    version_text: Option<&'a str>,
}

impl JsonFormatter {
    fn summary_to_json(summary: &UpdateSummary) -> JsonSummary {
        JsonSummary {
            files: summary.files_processed(),
            dependencies: summary.total_references(),
            updates: summary.total_updates(),
            files_modified: summary.files_modified(),
        }
    }

    /// Convert manifest result to JSON representation
    fn manifest_to_json<'a>(&self, manifest: &'a ManifestUpdateResult) -> JsonManifest<'a> {
        let dependencies = manifest
            .references
            .iter()
            .map(|reference| JsonDependency {
                id: &reference.id,
                version: reference.version.to_string(),
                version_text: (self.config.verbosity == Verbosity::Verbose)
                    .then_some(reference.version_text.as_str()),
            })
            .collect();

        JsonManifest {
            path: manifest.path.display().to_string(),
            dependencies,
            update: manifest.update.as_ref(),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let output = JsonOutput {
            dry_run: result.summary.dry_run,
            target: self.config.target.as_ref(),
            summary: Self::summary_to_json(&result.summary),
            manifests: result
                .summary
                .manifests
                .iter()
                .map(|m| self.manifest_to_json(m))
                .collect(),
            errors: result.errors.iter().map(|e| e.to_string()).collect(),
        };

        let json = serde_json::to_string_pretty(&output).map_err(std::io::Error::other)?;
        writeln!(writer, "{}", json)
    }
}
