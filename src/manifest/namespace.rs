//! Default-namespace detection for nuspec manifests
//!
//! Nuspec files are written both with and without the schema namespace
//! (`<package xmlns="http://schemas.microsoft.com/packaging/...">`). All
//! element lookups go through [`ManifestNamespace::qualify`] so reading and
//! writing share one traversal for both shapes.

use super::document::{ExpandedName, XmlDocument};

/// Schema namespaces used by published nuspec files
pub const NUSPEC_NAMESPACES: &[&str] = &[
    "http://schemas.microsoft.com/packaging/2010/07/nuspec.xsd",
    "http://schemas.microsoft.com/packaging/2011/08/nuspec.xsd",
    "http://schemas.microsoft.com/packaging/2012/06/nuspec.xsd",
    "http://schemas.microsoft.com/packaging/2013/01/nuspec.xsd",
    "http://schemas.microsoft.com/packaging/2013/05/nuspec.xsd",
];

/// Default namespace declared on the document element
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ManifestNamespace {
    uri: Option<String>,
}

impl ManifestNamespace {
    /// Reads the `xmlns` attribute of the document element
    pub fn detect(doc: &XmlDocument) -> Self {
        let uri = doc
            .attribute(doc.root(), "xmlns")
            .filter(|uri| !uri.is_empty());
        Self { uri }
    }

    /// A manifest without a default namespace
    pub fn none() -> Self {
        Self::default()
    }

    /// A manifest with the given default namespace
    pub fn with_uri(uri: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
        }
    }

    /// The declared namespace URI
    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// Returns true if the namespace is one of the published nuspec schemas
    pub fn is_nuspec_schema(&self) -> bool {
        self.uri().is_some_and(|uri| NUSPEC_NAMESPACES.contains(&uri))
    }

    /// Qualifies a local element name with the default namespace
    pub fn qualify<'a>(&'a self, local_name: &'a str) -> ExpandedName<'a> {
        ExpandedName {
            namespace: self.uri(),
            local_name,
        }
    }
}
