//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Per-manifest dependency listings with colors
//! - Version change type indication (major/minor/patch) for applied updates
//! - Skipped manifest display with reasons (verbose mode)
//! - Summary line with file and dependency counts
//! - A notice when the requested package is declared nowhere

use crate::domain::{ManifestUpdateResult, NuGetVersion, UpdateResult, UpdateSummary};
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputConfig, OutputFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;

/// Minimum width of the package id column
const MIN_ID_WIDTH: usize = 20;

/// Kind of change between the declared and the new version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionChangeType {
    /// Major version change (breaking)
    Major,
    /// Minor version change (features)
    Minor,
    /// Patch version change (fixes)
    Patch,
    /// Only the fourth component changed
    Revision,
    /// Same numbers, different prerelease label
    Prerelease,
    /// Same version, at most build metadata differs
    Unchanged,
    /// Previous version could not be parsed
    Unknown,
}

impl VersionChangeType {
    /// Determine the change type from a raw attribute value to a new version
    pub fn from_versions(old: &str, new: &NuGetVersion) -> Self {
        let Ok(old) = NuGetVersion::parse(old) else {
            return VersionChangeType::Unknown;
        };

        if old.major() != new.major() {
            VersionChangeType::Major
        } else if old.minor() != new.minor() {
            VersionChangeType::Minor
        } else if old.patch() != new.patch() {
            VersionChangeType::Patch
        } else if old.revision() != new.revision() {
            VersionChangeType::Revision
        } else if old.as_semver().pre != new.as_semver().pre {
            VersionChangeType::Prerelease
        } else {
            VersionChangeType::Unchanged
        }
    }

    /// Get the display label with color
    pub fn colored_label(&self) -> String {
        match self {
            VersionChangeType::Major => self.label().red().bold().to_string(),
            VersionChangeType::Minor => self.label().yellow().to_string(),
            VersionChangeType::Patch | VersionChangeType::Revision => {
                self.label().green().to_string()
            }
            VersionChangeType::Prerelease => self.label().cyan().to_string(),
            VersionChangeType::Unchanged | VersionChangeType::Unknown => {
                self.label().dimmed().to_string()
            }
        }
    }

    /// Get the plain label
    pub fn label(&self) -> &'static str {
        match self {
            VersionChangeType::Major => "major",
            VersionChangeType::Minor => "minor",
            VersionChangeType::Patch => "patch",
            VersionChangeType::Revision => "revision",
            VersionChangeType::Prerelease => "prerelease",
            VersionChangeType::Unchanged => "unchanged",
            VersionChangeType::Unknown => "?",
        }
    }
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    config: OutputConfig,
}

impl TextFormatter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    fn dry_run_prefix(&self) -> String {
        match (self.config.dry_run, self.config.color) {
            (false, _) => String::new(),
            (true, true) => format!("{} ", "(dry-run)".cyan()),
            (true, false) => "(dry-run) ".to_string(),
        }
    }

    fn id_width(manifest: &ManifestUpdateResult) -> usize {
        manifest
            .references
            .iter()
            .map(|r| r.id.len())
            .chain(manifest.update.iter().map(|u| u.package_id().len()))
            .max()
            .unwrap_or(0)
            .max(MIN_ID_WIDTH)
    }

    fn write_header(
        &self,
        manifest: &ManifestUpdateResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let count = manifest.references.len();
        let noun = if count == 1 {
            "dependency"
        } else {
            "dependencies"
        };
        let path_display = manifest.path.display().to_string();

        if self.config.color {
            writeln!(
                writer,
                "{}{} {}",
                self.dry_run_prefix(),
                path_display.bold(),
                format!("({} {})", count, noun).dimmed()
            )
        } else {
            writeln!(
                writer,
                "{}{} ({} {})",
                self.dry_run_prefix(),
                path_display,
                count,
                noun
            )
        }
    }

    fn write_references(
        &self,
        manifest: &ManifestUpdateResult,
        width: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        for reference in &manifest.references {
            if self.config.color {
                writeln!(
                    writer,
                    "  {:width$} {}",
                    reference.id,
                    reference.version_text.dimmed(),
                    width = width
                )?;
            } else {
                writeln!(
                    writer,
                    "  {:width$} {}",
                    reference.id,
                    reference.version_text,
                    width = width
                )?;
            }
        }
        Ok(())
    }

    fn write_update(
        &self,
        update: &UpdateResult,
        width: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        match update {
            UpdateResult::Update {
                package_id,
                previous_versions,
                new_version,
                release_notes_updated,
                ..
            } => {
                let new_text = new_version.to_string();
                for previous in previous_versions {
                    let change = VersionChangeType::from_versions(previous, new_version);
                    if self.config.color {
                        writeln!(
                            writer,
                            "  {:width$} {} {} {} [{}]",
                            package_id,
                            previous.dimmed(),
                            "→".dimmed(),
                            new_text.bright_white().bold(),
                            change.colored_label(),
                            width = width
                        )?;
                    } else {
                        writeln!(
                            writer,
                            "  {:width$} {} -> {} [{}]",
                            package_id,
                            previous,
                            new_text,
                            change.label(),
                            width = width
                        )?;
                    }
                }
                if *release_notes_updated {
                    let note = format!("release notes: added entry for v{}", new_text);
                    if self.config.color {
                        writeln!(writer, "  {}", note.dimmed())?;
                    } else {
                        writeln!(writer, "  {}", note)?;
                    }
                }
                Ok(())
            }
            UpdateResult::Skip { package_id, reason } => {
                let line = format!("{:width$} ({})", package_id, reason, width = width);
                if self.config.color {
                    writeln!(writer, "  {}", line.dimmed())
                } else {
                    writeln!(writer, "  {}", line)
                }
            }
        }
    }

    /// Notice for a target package that no manifest declares
    fn write_target_notice(
        &self,
        summary: &UpdateSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let Some(target) = &self.config.target else {
            return Ok(());
        };
        if summary.files_processed() == 0 || summary.all_updates().next().is_some() {
            return Ok(());
        }

        let line = format!(
            "{} is not declared in any manifest, nothing to update to {}.",
            target.package_id, target.version
        );
        if self.config.color {
            writeln!(writer, "{}", line.yellow())
        } else {
            writeln!(writer, "{}", line)
        }
    }

    /// Summary lines: files scanned and declarations rewritten
    pub fn format_summary(
        &self,
        summary: &UpdateSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let files = summary.files_processed();
        let references = summary.total_references();

        if files == 0 {
            return writeln!(writer, "No nuspec files found.");
        }

        let scanned = format!(
            "Scanned {} nuspec file(s), {} dependencies.",
            files, references
        );
        if self.config.color {
            writeln!(writer, "{}", scanned.bold())?;
        } else {
            writeln!(writer, "{}", scanned)?;
        }

        let updates = summary.total_updates();
        if summary.all_updates().next().is_none() {
            return Ok(());
        }

        let changed_files = summary
            .manifests
            .iter()
            .filter(|m| m.has_updates())
            .count();
        let line = if updates == 0 {
            "No dependencies updated.".to_string()
        } else if summary.dry_run {
            format!(
                "Would update {} dependency declaration(s) in {} file(s).",
                updates, changed_files
            )
        } else {
            format!(
                "Updated {} dependency declaration(s) in {} file(s).",
                updates,
                summary.files_modified()
            )
        };

        if self.config.color && updates > 0 {
            writeln!(writer, "{}", line.green())
        } else {
            writeln!(writer, "{}", line)
        }
    }

    /// One manifest: its update outcome, or its dependency listing
    ///
    /// With an update target, manifests that do not declare the package and
    /// skipped updates are only shown in verbose mode.
    pub fn format_manifest(
        &self,
        manifest: &ManifestUpdateResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let width = Self::id_width(manifest);
        let verbose = self.config.verbosity == Verbosity::Verbose;

        match &manifest.update {
            Some(update) => {
                if update.is_skip() && !verbose {
                    return Ok(());
                }
                self.write_header(manifest, writer)?;
                self.write_update(update, width, writer)?;
            }
            None if self.config.target.is_some() && !verbose => return Ok(()),
            None => {
                self.write_header(manifest, writer)?;
                self.write_references(manifest, width, writer)?;
            }
        }

        writeln!(writer)
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.config.verbosity != Verbosity::Quiet {
            for manifest in &result.summary.manifests {
                self.format_manifest(manifest, writer)?;
            }
        }

        self.format_summary(&result.summary, writer)?;
        self.write_target_notice(&result.summary, writer)?;

        if !result.errors.is_empty() && self.config.verbosity != Verbosity::Quiet {
            let label = format!("{} manifest(s) could not be processed", result.errors.len());
            if self.config.color {
                writeln!(writer, "{}", label.red())?;
            } else {
                writeln!(writer, "{}", label)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PackagePath, PackageReference, SkipReason};

    fn formatter(verbosity: Verbosity, dry_run: bool) -> TextFormatter {
        TextFormatter::new(OutputConfig::text(verbosity, dry_run))
    }

    fn reference(id: &str, version: &str) -> PackageReference {
        PackageReference::read(
            Some(id),
            Some(version),
            &PackagePath::nuspec("/repo", "Lib.nuspec"),
        )
        .unwrap()
    }

    fn manifest() -> ManifestUpdateResult {
        ManifestUpdateResult::new(
            "/repo/Lib.nuspec",
            vec![reference("foo", "5.2.31"), reference("bar", "[1.0.0]")],
        )
    }

    fn update(file_modified: bool) -> UpdateResult {
        UpdateResult::Update {
            package_id: "foo".to_string(),
            previous_versions: vec!["5.2.31".to_string()],
            new_version: NuGetVersion::new(5, 3, 4),
            release_notes_updated: true,
            file_modified,
        }
    }

    fn render(formatter: &TextFormatter, result: &OrchestratorResult) -> String {
        let mut out = Vec::new();
        formatter.format(result, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn result_with(manifests: Vec<ManifestUpdateResult>, dry_run: bool) -> OrchestratorResult {
        let mut summary = UpdateSummary::new(dry_run);
        for manifest in manifests {
            summary.add_manifest(manifest);
        }
        OrchestratorResult {
            summary,
            errors: Vec::new(),
        }
    }

    #[test]
    fn test_version_change_type() {
        let new = NuGetVersion::new(5, 3, 4);
        assert_eq!(
            VersionChangeType::from_versions("4.0.0", &new),
            VersionChangeType::Major
        );
        assert_eq!(
            VersionChangeType::from_versions("5.2.31", &new),
            VersionChangeType::Minor
        );
        assert_eq!(
            VersionChangeType::from_versions("5.3.1", &new),
            VersionChangeType::Patch
        );
        assert_eq!(
            VersionChangeType::from_versions("$version$", &new),
            VersionChangeType::Unknown
        );
    }

    #[test]
    fn test_version_change_type_below_patch() {
        let new = NuGetVersion::new(5, 3, 4);
        assert_eq!(
            VersionChangeType::from_versions("5.3.4", &new),
            VersionChangeType::Unchanged
        );
        assert_eq!(
            VersionChangeType::from_versions("v5.3.4", &new),
            VersionChangeType::Unchanged
        );
        assert_eq!(
            VersionChangeType::from_versions("5.3.4-beta.1", &new),
            VersionChangeType::Prerelease
        );
        assert_eq!(
            VersionChangeType::from_versions("5.3.4.1", &new),
            VersionChangeType::Revision
        );
        assert_eq!(
            VersionChangeType::from_versions("5.3.4+build.7", &new),
            VersionChangeType::Unchanged
        );
    }

    #[test]
    fn test_listing() {
        let output = render(
            &formatter(Verbosity::Normal, false),
            &result_with(vec![manifest()], false),
        );
        assert!(output.contains("/repo/Lib.nuspec (2 dependencies)"));
        assert!(output.contains("foo"));
        assert!(output.contains("5.2.31"));
        assert!(output.contains("[1.0.0]"));
        assert!(output.contains("Scanned 1 nuspec file(s), 2 dependencies."));
        assert!(!output.contains("Updated"));
    }

    #[test]
    fn test_update_lines() {
        let output = render(
            &formatter(Verbosity::Normal, false),
            &result_with(vec![manifest().with_update(update(true))], false),
        );
        assert!(output.contains("5.2.31 -> 5.3.4 [minor]"));
        assert!(output.contains("release notes: added entry for v5.3.4"));
        assert!(output.contains("Updated 1 dependency declaration(s) in 1 file(s)."));
    }

    #[test]
    fn test_dry_run_prefix_and_summary() {
        let output = render(
            &formatter(Verbosity::Normal, true),
            &result_with(vec![manifest().with_update(update(false))], true),
        );
        assert!(output.contains("(dry-run) /repo/Lib.nuspec"));
        assert!(output.contains("Would update 1 dependency declaration(s) in 1 file(s)."));
    }

    #[test]
    fn test_skip_hidden_unless_verbose() {
        let skipped =
            manifest().with_update(UpdateResult::skip("foo", SkipReason::PackageNotFound));

        let output = render(
            &formatter(Verbosity::Normal, false),
            &result_with(vec![skipped.clone()], false),
        );
        assert!(!output.contains("/repo/Lib.nuspec"));
        assert!(output.contains("No dependencies updated."));

        let output = render(
            &formatter(Verbosity::Verbose, false),
            &result_with(vec![skipped], false),
        );
        assert!(output.contains("(package not declared)"));
    }

    #[test]
    fn test_quiet_only_summary() {
        let output = render(
            &formatter(Verbosity::Quiet, false),
            &result_with(vec![manifest().with_update(update(true))], false),
        );
        assert!(!output.contains("/repo/Lib.nuspec"));
        assert!(output.contains("Updated 1 dependency declaration(s)"));
    }

    #[test]
    fn test_target_declared_nowhere() {
        let formatter = TextFormatter::new(
            OutputConfig::text(Verbosity::Normal, false)
                .with_target("baz", NuGetVersion::new(2, 0, 0)),
        );
        let output = render(&formatter, &result_with(vec![manifest()], false));

        assert!(!output.contains("/repo/Lib.nuspec"));
        assert!(output.contains("Scanned 1 nuspec file(s), 2 dependencies."));
        assert!(output.contains("baz is not declared in any manifest, nothing to update to 2.0.0."));
    }

    #[test]
    fn test_target_hides_unrelated_manifests_unless_verbose() {
        let other = ManifestUpdateResult::new("/repo/Other.nuspec", vec![reference("bar", "1.0.0")]);
        let result = result_with(vec![manifest().with_update(update(true)), other], false);

        let output = render(
            &TextFormatter::new(
                OutputConfig::text(Verbosity::Normal, false)
                    .with_target("foo", NuGetVersion::new(5, 3, 4)),
            ),
            &result,
        );
        assert!(output.contains("/repo/Lib.nuspec"));
        assert!(!output.contains("/repo/Other.nuspec"));
        assert!(!output.contains("not declared"));

        let output = render(
            &TextFormatter::new(
                OutputConfig::text(Verbosity::Verbose, false)
                    .with_target("foo", NuGetVersion::new(5, 3, 4)),
            ),
            &result,
        );
        assert!(output.contains("/repo/Other.nuspec (1 dependency)"));
    }

    #[test]
    fn test_no_files() {
        let output = render(
            &formatter(Verbosity::Normal, false),
            &result_with(Vec::new(), false),
        );
        assert_eq!(output, "No nuspec files found.\n");
    }
}
