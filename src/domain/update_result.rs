//! Outcome of updating one package in one manifest

use super::NuGetVersion;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reason why a manifest was left untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No `package/metadata` element
    NoMetadata,
    /// No `metadata/dependencies` element
    NoDependencies,
    /// No dependency element with the requested id
    PackageNotFound,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoMetadata => write!(f, "no metadata element"),
            SkipReason::NoDependencies => write!(f, "no dependencies element"),
            SkipReason::PackageNotFound => write!(f, "package not declared"),
        }
    }
}

/// Result of an update request against a single manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UpdateResult {
    /// At least one dependency element was rewritten
    Update {
        /// Package id that was updated
        package_id: String,
        /// Version attribute values replaced, one per matched element
        previous_versions: Vec<String>,
        /// Version written to every matched element
        new_version: NuGetVersion,
        /// Whether a release-notes entry was prepended
        release_notes_updated: bool,
        /// Whether the file on disk was rewritten (false in dry-run mode)
        file_modified: bool,
    },
    /// Nothing to change; the file was not touched
    Skip {
        /// Package id that was requested
        package_id: String,
        /// Why nothing changed
        reason: SkipReason,
    },
}

impl UpdateResult {
    /// Creates a Skip result
    pub fn skip(package_id: impl Into<String>, reason: SkipReason) -> Self {
        UpdateResult::Skip {
            package_id: package_id.into(),
            reason,
        }
    }

    /// Returns true if this is an update result
    pub fn is_update(&self) -> bool {
        matches!(self, UpdateResult::Update { .. })
    }

    /// Returns true if this is a skip result
    pub fn is_skip(&self) -> bool {
        matches!(self, UpdateResult::Skip { .. })
    }

    /// Returns the package id
    pub fn package_id(&self) -> &str {
        match self {
            UpdateResult::Update { package_id, .. } => package_id,
            UpdateResult::Skip { package_id, .. } => package_id,
        }
    }

    /// Number of dependency elements rewritten
    pub fn dependencies_updated(&self) -> usize {
        match self {
            UpdateResult::Update {
                previous_versions, ..
            } => previous_versions.len(),
            UpdateResult::Skip { .. } => 0,
        }
    }

    /// Returns true if the manifest on disk was rewritten
    pub fn file_modified(&self) -> bool {
        matches!(
            self,
            UpdateResult::Update {
                file_modified: true,
                ..
            }
        )
    }

    /// Returns the skip reason, if any
    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            UpdateResult::Update { .. } => None,
            UpdateResult::Skip { reason, .. } => Some(*reason),
        }
    }
}

impl fmt::Display for UpdateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateResult::Update {
                package_id,
                previous_versions,
                new_version,
                ..
            } => {
                let from = previous_versions
                    .first()
                    .map(String::as_str)
                    .unwrap_or("?");
                write!(f, "{}: {} -> {}", package_id, from, new_version)
            }
            UpdateResult::Skip { package_id, reason } => {
                write!(f, "{}: skipped ({})", package_id, reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_update(file_modified: bool) -> UpdateResult {
        UpdateResult::Update {
            package_id: "foo".to_string(),
            previous_versions: vec!["5.2.31".to_string(), "5.2.30".to_string()],
            new_version: NuGetVersion::new(5, 3, 4),
            release_notes_updated: true,
            file_modified,
        }
    }

    #[test]
    fn test_update_accessors() {
        let result = sample_update(true);
        assert!(result.is_update());
        assert!(!result.is_skip());
        assert_eq!(result.package_id(), "foo");
        assert_eq!(result.dependencies_updated(), 2);
        assert!(result.file_modified());
        assert_eq!(result.skip_reason(), None);
    }

    #[test]
    fn test_update_dry_run_not_modified() {
        assert!(!sample_update(false).file_modified());
    }

    #[test]
    fn test_skip_accessors() {
        let result = UpdateResult::skip("bar", SkipReason::PackageNotFound);
        assert!(result.is_skip());
        assert_eq!(result.package_id(), "bar");
        assert_eq!(result.dependencies_updated(), 0);
        assert!(!result.file_modified());
        assert_eq!(result.skip_reason(), Some(SkipReason::PackageNotFound));
    }

    #[test]
    fn test_display() {
        assert_eq!(sample_update(true).to_string(), "foo: 5.2.31 -> 5.3.4");
        assert_eq!(
            UpdateResult::skip("bar", SkipReason::NoDependencies).to_string(),
            "bar: skipped (no dependencies element)"
        );
    }

    #[test]
    fn test_serde_tagged() {
        let json = serde_json::to_string(&UpdateResult::skip("bar", SkipReason::NoMetadata)).unwrap();
        assert!(json.contains("\"type\":\"skip\""));
        assert!(json.contains("\"reason\":\"no_metadata\""));

        let update = sample_update(true);
        let parsed: UpdateResult =
            serde_json::from_str(&serde_json::to_string(&update).unwrap()).unwrap();
        assert_eq!(parsed, update);
    }
}
