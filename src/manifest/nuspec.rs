//! Element layout of a nuspec manifest
//!
//! ```text
//! package/metadata/dependencies/dependency
//! package/metadata/dependencies/group/dependency
//! package/metadata/releaseNotes
//! ```

use super::document::{NodeId, XmlDocument};
use super::namespace::ManifestNamespace;

pub const PACKAGE: &str = "package";
pub const METADATA: &str = "metadata";
pub const DEPENDENCIES: &str = "dependencies";
pub const GROUP: &str = "group";
pub const DEPENDENCY: &str = "dependency";
pub const RELEASE_NOTES: &str = "releaseNotes";
pub const ID_ATTRIBUTE: &str = "id";
pub const VERSION_ATTRIBUTE: &str = "version";

/// A parsed manifest paired with its namespace qualification
pub struct NuspecView<'a> {
    doc: &'a XmlDocument,
    ns: ManifestNamespace,
}

impl<'a> NuspecView<'a> {
    pub fn new(doc: &'a XmlDocument) -> Self {
        Self {
            doc,
            ns: ManifestNamespace::detect(doc),
        }
    }

    pub fn namespace(&self) -> &ManifestNamespace {
        &self.ns
    }

    /// `package/metadata`
    pub fn metadata(&self) -> Option<NodeId> {
        let package = self.doc.root_named(self.ns.qualify(PACKAGE))?;
        self.doc.first_element(package, self.ns.qualify(METADATA))
    }

    /// `metadata/dependencies`
    pub fn dependencies(&self, metadata: NodeId) -> Option<NodeId> {
        self.doc.first_element(metadata, self.ns.qualify(DEPENDENCIES))
    }

    /// `metadata/releaseNotes`
    pub fn release_notes(&self, metadata: NodeId) -> Option<NodeId> {
        self.doc.first_element(metadata, self.ns.qualify(RELEASE_NOTES))
    }

    /// Direct `dependency` children followed by those of every `group`
    pub fn dependency_elements(&self, dependencies: NodeId) -> Vec<NodeId> {
        let direct = self
            .doc
            .elements(dependencies, self.ns.qualify(DEPENDENCY));
        let grouped = self
            .doc
            .elements(dependencies, self.ns.qualify(GROUP))
            .flat_map(|group| self.doc.elements(group, self.ns.qualify(DEPENDENCY)));
        direct.chain(grouped).collect()
    }

    /// Dependency elements whose `id` equals `package_id` exactly
    ///
    /// Surrounding whitespace in the attribute is ignored, the same way
    /// extraction trims it.
    pub fn matching_dependencies(&self, dependencies: NodeId, package_id: &str) -> Vec<NodeId> {
        self.dependency_elements(dependencies)
            .into_iter()
            .filter(|&el| {
                self.doc
                    .attribute(el, ID_ATTRIBUTE)
                    .is_some_and(|id| id.trim() == package_id)
            })
            .collect()
    }
}
