//! Dependency extraction from nuspec manifests

use super::document::XmlDocument;
use super::encoding::decode_manifest;
use super::nuspec::{NuspecView, ID_ATTRIBUTE, VERSION_ATTRIBUTE};
use super::PackageReferenceFinder;
use crate::domain::{PackagePath, PackageReference, PackageReferenceType};
use crate::error::ManifestError;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Reads package references from `*.nuspec` files
#[derive(Debug, Default, Clone, Copy)]
pub struct NuspecFileReader;

impl NuspecFileReader {
    pub fn new() -> Self {
        Self
    }

    /// Extracts every dependency declared under `package/metadata/dependencies`
    ///
    /// Direct `dependency` children come first, then the dependencies of each
    /// `group` in document order. Group attributes (target framework) are not
    /// kept. A manifest without a `dependencies` element yields an empty list.
    /// Input bytes are decoded per their byte order mark or XML declaration.
    pub fn read(
        &self,
        mut input: impl Read,
        path: &PackagePath,
    ) -> Result<Vec<PackageReference>, ManifestError> {
        let mut bytes = Vec::new();
        input
            .read_to_end(&mut bytes)
            .map_err(|e| ManifestError::read_error(path.full_path(), e))?;
        let (content, _) = decode_manifest(&bytes)?;
        self.read_str(&content, path)
    }

    /// Same as [`NuspecFileReader::read`] for in-memory content
    pub fn read_str(
        &self,
        content: &str,
        path: &PackagePath,
    ) -> Result<Vec<PackageReference>, ManifestError> {
        let doc = XmlDocument::parse(content)?;
        let view = NuspecView::new(&doc);
        if let Some(uri) = view.namespace().uri() {
            if !view.namespace().is_nuspec_schema() {
                tracing::debug!("{} uses unrecognized namespace {}", path, uri);
            }
        }

        let Some(dependencies) = view.metadata().and_then(|m| view.dependencies(m)) else {
            return Ok(Vec::new());
        };

        Ok(view
            .dependency_elements(dependencies)
            .into_iter()
            .filter_map(|el| {
                let id = doc.attribute(el, ID_ATTRIBUTE);
                let version = doc.attribute(el, VERSION_ATTRIBUTE);
                PackageReference::read(id.as_deref(), version.as_deref(), path)
            })
            .collect())
    }
}

impl PackageReferenceFinder for NuspecFileReader {
    fn read_file(
        &self,
        base_directory: &Path,
        relative_path: &Path,
    ) -> Result<Vec<PackageReference>, ManifestError> {
        let path = PackagePath::new(base_directory, relative_path, self.reference_type());
        let full_path = path.full_path();
        let file = File::open(&full_path).map_err(|e| ManifestError::read_error(&full_path, e))?;
        self.read(file, &path)
    }

    fn file_patterns(&self) -> &'static [&'static str] {
        self.reference_type().file_patterns()
    }

    fn reference_type(&self) -> PackageReferenceType {
        PackageReferenceType::Nuspec
    }
}
