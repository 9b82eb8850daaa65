//! Nuspec dependency and release-notes updates
//!
//! This module provides:
//! - UpdateNuspecCommand for rewriting dependency versions of one package
//! - Release-notes entries prepended for every applied update
//! - Dry-run mode support (no actual file modifications)
//! - Atomic replacement of the manifest on disk
//!
//! The manifest is read fully and edited in memory; the file is only
//! replaced when a dependency actually changed. A manifest with no
//! `metadata`, no `dependencies` or no matching dependency is left
//! untouched.

use super::document::XmlDocument;
use super::encoding::{decode_manifest, ManifestEncoding};
use super::nuspec::{NuspecView, VERSION_ATTRIBUTE};
use super::release_notes::{Clock, LocalClock, ReleaseNoteEntry};
use super::UpdateCommand;
use crate::domain::{NuGetVersion, PackageReference, SkipReason, UpdateResult};
use crate::error::ManifestError;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Rewrites the dependency versions of one package inside a nuspec file
pub struct UpdateNuspecCommand<C = LocalClock> {
    /// Whether to run in dry-run mode (no file modifications)
    dry_run: bool,
    /// Date source for release-note entries
    clock: C,
}

impl UpdateNuspecCommand<LocalClock> {
    /// Create a new command stamping entries with the local date
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            clock: LocalClock,
        }
    }

    /// Create a command in dry-run mode
    pub fn dry_run() -> Self {
        Self::new(true)
    }
}

impl<C: Clock> UpdateNuspecCommand<C> {
    /// Create a command with a custom clock
    pub fn with_clock(dry_run: bool, clock: C) -> Self {
        Self { dry_run, clock }
    }

    /// Check if this command is in dry-run mode
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Applies the update to a parsed manifest in memory
    ///
    /// Every dependency element (direct or grouped) whose `id` equals the
    /// package id exactly gets `new_version`. When at least one matched and
    /// the manifest has `releaseNotes`, a dated entry is prepended to them.
    /// The returned result always has `file_modified == false`.
    pub fn apply(
        &self,
        doc: &mut XmlDocument,
        current_package: &PackageReference,
        new_version: &NuGetVersion,
    ) -> UpdateResult {
        let package_id = current_package.id.as_str();

        let (matches, release_notes) = {
            let view = NuspecView::new(doc);
            let Some(metadata) = view.metadata() else {
                return UpdateResult::skip(package_id, SkipReason::NoMetadata);
            };
            let Some(dependencies) = view.dependencies(metadata) else {
                return UpdateResult::skip(package_id, SkipReason::NoDependencies);
            };
            (
                view.matching_dependencies(dependencies, package_id),
                view.release_notes(metadata),
            )
        };

        if matches.is_empty() {
            return UpdateResult::skip(package_id, SkipReason::PackageNotFound);
        }

        let version_text = new_version.to_string();
        let previous_versions = matches
            .into_iter()
            .map(|dependency| {
                tracing::debug!(
                    "Updating nuspec dependencies: {} in path {}",
                    package_id,
                    current_package.path
                );
                let previous = doc.attribute(dependency, VERSION_ATTRIBUTE).unwrap_or_default();
                doc.set_attribute(dependency, VERSION_ATTRIBUTE, &version_text);
                previous
            })
            .collect();

        let release_notes_updated = match release_notes {
            Some(notes) => {
                let entry = ReleaseNoteEntry::new(self.clock.today(), package_id, new_version);
                let current = doc.text(notes);
                doc.set_text(notes, &entry.prepend_to(&current))
            }
            None => false,
        };

        UpdateResult::Update {
            package_id: package_id.to_string(),
            previous_versions,
            new_version: new_version.clone(),
            release_notes_updated,
            file_modified: false,
        }
    }
}

impl<C: Clock> UpdateCommand for UpdateNuspecCommand<C> {
    fn invoke(
        &self,
        current_package: &PackageReference,
        new_version: &NuGetVersion,
    ) -> Result<UpdateResult, ManifestError> {
        if current_package.id.trim().is_empty() {
            return Err(ManifestError::invalid_argument(
                "current_package",
                "package id is empty",
            ));
        }

        let path = current_package.path.full_path();
        let (content, encoding) = read_manifest(&path)?;
        let mut doc = XmlDocument::parse(&content)?;

        let mut result = self.apply(&mut doc, current_package, new_version);

        if let UpdateResult::Update { file_modified, .. } = &mut result {
            if !self.dry_run {
                write_manifest(&path, &doc.to_xml_string(), encoding)?;
                *file_modified = true;
            }
        }

        Ok(result)
    }
}

/// Read and decode a manifest file, keeping track of its encoding
pub fn read_manifest(path: &Path) -> Result<(String, ManifestEncoding), ManifestError> {
    let bytes = fs::read(path).map_err(|e| ManifestError::read_error(path, e))?;
    decode_manifest(&bytes)
}

/// Replace a manifest file with new content in the given encoding
///
/// The content goes to a temporary file in the same directory which is then
/// renamed over `path`, so readers never observe a partially written file.
pub fn write_manifest(
    path: &Path,
    content: &str,
    encoding: ManifestEncoding,
) -> Result<(), ManifestError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| ManifestError::write_error(path, e))?;
    temp.write_all(&encoding.encode(content))
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| ManifestError::write_error(path, e))?;

    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(temp.path(), metadata.permissions())
            .map_err(|e| ManifestError::write_error(path, e))?;
    }

    temp.persist(path)
        .map_err(|e| ManifestError::write_error(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PackagePath;
    use crate::manifest::release_notes::FixedClock;
    use crate::manifest::{NuspecFileReader, PackageReferenceFinder};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    const NUSPEC: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<package xmlns="http://schemas.microsoft.com/packaging/2011/08/nuspec.xsd">
    <metadata>
        <releaseNotes>
          [Date][v1.0.0]
                Added new version
        </releaseNotes>
        <dependencies>
            <dependency id="bar" version="1.0.0" />
            <group targetFramework="net6.0">
                <dependency id="foo" version="5.2.31" />
                <dependency id="bar" version="1.0.0" />
            </group>
            <group targetFramework="net48">
                <dependency id="foo" version="5.2.30" />
            </group>
        </dependencies>
    </metadata>
</package>
"#;

    fn clock() -> FixedClock {
        FixedClock(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
    }

    fn command(dry_run: bool) -> UpdateNuspecCommand<FixedClock> {
        UpdateNuspecCommand::with_clock(dry_run, clock())
    }

    fn write_nuspec(dir: &TempDir, content: &str) -> PackagePath {
        fs::write(dir.path().join("Lib.nuspec"), content).unwrap();
        PackagePath::nuspec(dir.path(), "Lib.nuspec")
    }

    fn package(id: &str, path: PackagePath) -> PackageReference {
        PackageReference::new(id, NuGetVersion::new(5, 2, 31), path)
    }

    fn v(text: &str) -> NuGetVersion {
        NuGetVersion::parse(text).unwrap()
    }

    #[test]
    fn test_command_new() {
        assert!(!UpdateNuspecCommand::new(false).is_dry_run());
        assert!(UpdateNuspecCommand::new(true).is_dry_run());
        assert!(UpdateNuspecCommand::dry_run().is_dry_run());
    }

    #[test]
    fn test_apply_updates_every_match() {
        let mut doc = XmlDocument::parse(NUSPEC).unwrap();
        let current = package("foo", PackagePath::nuspec("/repo", "Lib.nuspec"));
        let result = command(false).apply(&mut doc, &current, &v("5.3.4"));

        match &result {
            UpdateResult::Update {
                previous_versions,
                release_notes_updated,
                file_modified,
                ..
            } => {
                assert_eq!(previous_versions, &vec!["5.2.31".to_string(), "5.2.30".to_string()]);
                assert!(release_notes_updated);
                assert!(!file_modified);
            }
            other => panic!("expected update, got {other:?}"),
        }

        let xml = doc.to_xml_string();
        assert_eq!(xml.matches(r#"<dependency id="foo" version="5.3.4" />"#).count(), 2);
        assert_eq!(xml.matches(r#"<dependency id="bar" version="1.0.0" />"#).count(), 2);
        assert!(!xml.contains("5.2.31"));
        assert!(!xml.contains("5.2.30"));
    }

    #[test]
    fn test_apply_prepends_release_notes() {
        let mut doc = XmlDocument::parse(NUSPEC).unwrap();
        let current = package("foo", PackagePath::nuspec("/repo", "Lib.nuspec"));
        command(false).apply(&mut doc, &current, &v("5.3.4"));

        let view = NuspecView::new(&doc);
        let notes = view.release_notes(view.metadata().unwrap()).unwrap();
        let text = doc.text(notes);
        let expected_entry =
            "\n      [2024-03-01][v5.3.4]\n          Updated dependencies for foo to version 5.3.4";
        assert!(text.starts_with(expected_entry));
        assert!(text[expected_entry.len()..].starts_with("\n          [Date][v1.0.0]"));
        assert!(text.contains("Added new version"));
    }

    #[test]
    fn test_apply_without_release_notes() {
        let mut doc = XmlDocument::parse(
            r#"<package><metadata><dependencies><dependency id="foo" version="1.0.0"/></dependencies></metadata></package>"#,
        )
        .unwrap();
        let current = package("foo", PackagePath::nuspec("/repo", "Lib.nuspec"));
        let result = command(false).apply(&mut doc, &current, &v("2.0.0"));
        assert!(matches!(
            result,
            UpdateResult::Update {
                release_notes_updated: false,
                ..
            }
        ));
        assert!(doc.to_xml_string().contains(r#"version="2.0.0""#));
    }

    #[test]
    fn test_apply_adds_missing_version_attribute() {
        let mut doc = XmlDocument::parse(
            r#"<package><metadata><dependencies><dependency id="foo"/></dependencies></metadata></package>"#,
        )
        .unwrap();
        let current = package("foo", PackagePath::nuspec("/repo", "Lib.nuspec"));
        let result = command(false).apply(&mut doc, &current, &v("2.0.0"));

        match &result {
            UpdateResult::Update {
                previous_versions, ..
            } => assert_eq!(previous_versions, &vec![String::new()]),
            other => panic!("expected update, got {other:?}"),
        }
        assert!(doc
            .to_xml_string()
            .contains(r#"<dependency id="foo" version="2.0.0" />"#));
    }

    #[test]
    fn test_invoke_matches_padded_id_like_reader() {
        let dir = TempDir::new().unwrap();
        let path = write_nuspec(
            &dir,
            r#"<package><metadata><dependencies><dependency id=" foo" version="1.0.0" /></dependencies></metadata></package>"#,
        );
        let current = NuspecFileReader
            .read_file(dir.path(), Path::new("Lib.nuspec"))
            .unwrap()
            .remove(0);
        assert_eq!(current.id, "foo");

        let result = command(false).invoke(&current, &v("2.0.0")).unwrap();
        assert_eq!(result.dependencies_updated(), 1);
        assert!(fs::read_to_string(path.full_path())
            .unwrap()
            .contains(r#"<dependency id=" foo" version="2.0.0" />"#));
    }

    #[test]
    fn test_apply_skip_reasons() {
        let current = package("foo", PackagePath::nuspec("/repo", "Lib.nuspec"));
        let cases = [
            ("<package><id>x</id></package>", SkipReason::NoMetadata),
            (
                "<package><metadata></metadata></package>",
                SkipReason::NoDependencies,
            ),
            (
                r#"<package><metadata><dependencies><dependency id="Foo" version="1.0.0" /></dependencies></metadata></package>"#,
                SkipReason::PackageNotFound,
            ),
        ];
        for (content, reason) in cases {
            let mut doc = XmlDocument::parse(content).unwrap();
            let result = command(false).apply(&mut doc, &current, &v("2.0.0"));
            assert_eq!(result.skip_reason(), Some(reason));
            assert_eq!(doc.to_xml_string(), content);
        }
    }

    #[test]
    fn test_invoke_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = write_nuspec(&dir, NUSPEC);
        let result = command(false)
            .invoke(&package("foo", path.clone()), &v("5.3.4"))
            .unwrap();

        assert!(result.file_modified());
        assert_eq!(result.dependencies_updated(), 2);

        let contents = fs::read_to_string(path.full_path()).unwrap();
        assert!(contents.contains(r#"<dependency id="foo" version="5.3.4" />"#));
        assert!(!contents.contains(r#"<dependency id="foo" version="5.2.31" />"#));
        assert!(contents.contains("Updated dependencies for foo to version 5.3.4"));
        assert!(contents.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(contents.contains(
            r#"<package xmlns="http://schemas.microsoft.com/packaging/2011/08/nuspec.xsd">"#
        ));
    }

    #[test]
    fn test_invoke_dry_run_leaves_file() {
        let dir = TempDir::new().unwrap();
        let path = write_nuspec(&dir, NUSPEC);
        let result = command(true)
            .invoke(&package("foo", path.clone()), &v("5.3.4"))
            .unwrap();

        assert!(result.is_update());
        assert!(!result.file_modified());
        assert_eq!(fs::read_to_string(path.full_path()).unwrap(), NUSPEC);
    }

    #[test]
    fn test_invoke_unknown_package_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let path = write_nuspec(&dir, NUSPEC);
        let result = command(false)
            .invoke(&package("missing", path.clone()), &v("9.9.9"))
            .unwrap();

        assert_eq!(result.skip_reason(), Some(SkipReason::PackageNotFound));
        assert_eq!(fs::read_to_string(path.full_path()).unwrap(), NUSPEC);
    }

    #[test]
    fn test_invoke_without_dependencies_does_not_truncate() {
        let dir = TempDir::new().unwrap();
        let content = "<package><metadata><id>Lib</id></metadata></package>";
        let path = write_nuspec(&dir, content);
        let result = command(false)
            .invoke(&package("foo", path.clone()), &v("1.0.0"))
            .unwrap();

        assert_eq!(result.skip_reason(), Some(SkipReason::NoDependencies));
        assert_eq!(fs::read_to_string(path.full_path()).unwrap(), content);
    }

    #[test]
    fn test_invoke_rejects_empty_id_before_io() {
        let path = PackagePath::nuspec("/nonexistent", "Lib.nuspec");
        let err = command(false)
            .invoke(&package("", path), &v("1.0.0"))
            .unwrap_err();
        assert!(matches!(err, ManifestError::InvalidArgument { .. }));
    }

    #[test]
    fn test_invoke_missing_file() {
        let path = PackagePath::nuspec("/nonexistent/dir", "Lib.nuspec");
        let err = command(false)
            .invoke(&package("foo", path), &v("1.0.0"))
            .unwrap_err();
        assert!(matches!(err, ManifestError::ReadError { .. }));
    }

    #[test]
    fn test_invoke_malformed_file_is_untouched() {
        let dir = TempDir::new().unwrap();
        let content = "<package><metadata></package>";
        let path = write_nuspec(&dir, content);
        let err = command(false)
            .invoke(&package("foo", path.clone()), &v("1.0.0"))
            .unwrap_err();
        assert!(matches!(err, ManifestError::Xml(_)));
        assert_eq!(fs::read_to_string(path.full_path()).unwrap(), content);
    }

    #[test]
    fn test_read_manifest_not_found() {
        assert!(read_manifest(Path::new("/nonexistent/path/Lib.nuspec")).is_err());
    }

    #[test]
    fn test_write_manifest_replaces_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Lib.nuspec");
        fs::write(&path, "old content that is longer").unwrap();

        write_manifest(&path, "<package />", ManifestEncoding::utf8()).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "<package />");
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_invoke_keeps_utf16_encoding() {
        let dir = TempDir::new().unwrap();
        let source = NUSPEC.replace(r#"encoding="utf-8""#, r#"encoding="utf-16""#);
        let mut bytes = vec![0xFF, 0xFE];
        source
            .encode_utf16()
            .for_each(|unit| bytes.extend_from_slice(&unit.to_le_bytes()));
        fs::write(dir.path().join("Lib.nuspec"), &bytes).unwrap();
        let path = PackagePath::nuspec(dir.path(), "Lib.nuspec");

        let result = command(false)
            .invoke(&package("foo", path.clone()), &v("5.3.4"))
            .unwrap();
        assert!(result.file_modified());

        let written = fs::read(path.full_path()).unwrap();
        assert_eq!(&written[..2], &[0xFF, 0xFE]);
        let units: Vec<u16> = written[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        let text = String::from_utf16(&units).unwrap();
        assert!(text.starts_with(r#"<?xml version="1.0" encoding="utf-16"?>"#));
        assert!(text.contains(r#"<dependency id="foo" version="5.3.4" />"#));
    }

    #[test]
    fn test_invoke_keeps_latin1_encoding() {
        fn latin1(version: &str) -> Vec<u8> {
            let mut bytes =
                b"<?xml version=\"1.0\" encoding=\"iso-8859-1\"?>\n<package><metadata><authors>Ren"
                    .to_vec();
            bytes.push(0xE9);
            bytes.extend_from_slice(b"</authors><dependencies><dependency id=\"foo\" version=\"");
            bytes.extend_from_slice(version.as_bytes());
            bytes.extend_from_slice(b"\" /></dependencies></metadata></package>");
            bytes
        }

        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Lib.nuspec"), latin1("1.0.0")).unwrap();
        let path = PackagePath::nuspec(dir.path(), "Lib.nuspec");

        let result = command(false)
            .invoke(&package("foo", path.clone()), &v("2.0.0"))
            .unwrap();
        assert!(result.file_modified());
        assert_eq!(fs::read(path.full_path()).unwrap(), latin1("2.0.0"));
    }
}
