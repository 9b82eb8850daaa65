//! Package references declared by a manifest

use super::{NuGetVersion, PackagePath};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A package feed a reference can be resolved from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSource {
    /// Feed name as configured in NuGet.config
    pub name: String,
    /// Feed URL
    pub url: String,
}

impl PackageSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// A dependency declared in a manifest file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageReference {
    /// Package id
    pub id: String,
    /// Version text exactly as written in the manifest
    pub version_text: String,
    /// Parsed version
    pub version: NuGetVersion,
    /// Manifest the reference was read from
    pub path: PackagePath,
    /// Feeds the package is known to come from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<PackageSource>>,
}

impl PackageReference {
    /// Creates a new package reference
    pub fn new(id: impl Into<String>, version: NuGetVersion, path: PackagePath) -> Self {
        Self {
            id: id.into(),
            version_text: version.to_string(),
            version,
            path,
            sources: None,
        }
    }

    /// Sets the feeds for this reference (builder pattern)
    pub fn with_sources(mut self, sources: Vec<PackageSource>) -> Self {
        self.sources = Some(sources);
        self
    }

    /// Normalizes raw manifest attribute values into a reference
    ///
    /// Every manifest reader goes through this routine. Returns `None`, after
    /// logging why, when the id is blank or the version is missing or not a
    /// single NuGet version.
    pub fn read(id: Option<&str>, version: Option<&str>, path: &PackagePath) -> Option<Self> {
        let id = match id.map(str::trim) {
            Some(id) if !id.is_empty() => id,
            _ => {
                tracing::warn!("Could not read package id in file {}", path);
                return None;
            }
        };

        let version_text = match version.map(str::trim) {
            Some(v) if !v.is_empty() => v,
            _ => {
                tracing::warn!("Could not read version of package {} in file {}", id, path);
                return None;
            }
        };

        match NuGetVersion::parse(version_text) {
            Ok(version) => Some(Self {
                id: id.to_string(),
                version_text: version_text.to_string(),
                version,
                path: path.clone(),
                sources: None,
            }),
            Err(e) => {
                tracing::warn!(
                    "Could not parse version {} for package {} in file {}: {}",
                    version_text,
                    id,
                    path,
                    e
                );
                None
            }
        }
    }
}

impl fmt::Display for PackageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} [{}]", self.id, self.version, self.path)
    }
}
