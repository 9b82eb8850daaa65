//! NuGet version values
//!
//! NuGet versions extend semantic versions with an optional fourth
//! `revision` component and allow the minor and patch components to be
//! omitted:
//! - `1.2.3`, `1.2.3-beta.1`, `1.2.3+sha.abc`
//! - `1.2` (read as `1.2.0`), `4.0.0.1` (revision 1)
//! - `[1.2.3]` (exact pin, read as `1.2.3`)

use crate::error::VersionError;
use regex::Regex;
use semver::{BuildMetadata, Prerelease, Version};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^v?(\d+)(?:\.(\d+))?(?:\.(\d+))?(?:\.(\d+))?(?:-([0-9A-Za-z.-]+))?(?:\+([0-9A-Za-z.-]+))?$",
    )
    .expect("version pattern is valid")
});

/// A parsed NuGet version
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NuGetVersion {
    version: Version,
    revision: u64,
}

impl NuGetVersion {
    /// Creates a release version from its numeric components
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            version: Version::new(major, minor, patch),
            revision: 0,
        }
    }

    /// Parses version text, including an exact-pin range such as `[1.2.3]`
    ///
    /// Open or bounded ranges (`[1.0,2.0)`, `(,1.0]`) are rejected: they
    /// do not name a single version.
    pub fn parse(text: &str) -> Result<Self, VersionError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(VersionError::Empty);
        }

        if let Some(inner) = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        {
            if inner.contains(',') {
                return Err(VersionError::invalid(text, "version ranges are not supported"));
            }
            return Self::parse_plain(inner.trim(), text);
        }

        if trimmed.starts_with(['[', '(']) || trimmed.ends_with([']', ')']) {
            return Err(VersionError::invalid(text, "version ranges are not supported"));
        }

        Self::parse_plain(trimmed, text)
    }

    fn parse_plain(candidate: &str, original: &str) -> Result<Self, VersionError> {
        let caps = VERSION_PATTERN
            .captures(candidate)
            .ok_or_else(|| VersionError::invalid(original, "expected major[.minor[.patch[.revision]]]"))?;

        let component = |idx: usize| -> Result<u64, VersionError> {
            match caps.get(idx) {
                Some(m) => m
                    .as_str()
                    .parse()
                    .map_err(|_| VersionError::invalid(original, "numeric component out of range")),
                None => Ok(0),
            }
        };

        let mut version = Version::new(component(1)?, component(2)?, component(3)?);
        let revision = component(4)?;

        if let Some(pre) = caps.get(5) {
            version.pre = Prerelease::new(pre.as_str())
                .map_err(|e| VersionError::invalid(original, e.to_string()))?;
        }
        if let Some(build) = caps.get(6) {
            version.build = BuildMetadata::new(build.as_str())
                .map_err(|e| VersionError::invalid(original, e.to_string()))?;
        }

        Ok(Self { version, revision })
    }

    pub fn major(&self) -> u64 {
        self.version.major
    }

    pub fn minor(&self) -> u64 {
        self.version.minor
    }

    pub fn patch(&self) -> u64 {
        self.version.patch
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns true for versions with a prerelease label
    pub fn is_prerelease(&self) -> bool {
        !self.version.pre.is_empty()
    }

    /// The underlying semantic version (revision dropped)
    pub fn as_semver(&self) -> &Version {
        &self.version
    }
}

impl fmt::Display for NuGetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}",
            self.version.major, self.version.minor, self.version.patch
        )?;
        if self.revision > 0 {
            write!(f, ".{}", self.revision)?;
        }
        if !self.version.pre.is_empty() {
            write!(f, "-{}", self.version.pre)?;
        }
        if !self.version.build.is_empty() {
            write!(f, "+{}", self.version.build)?;
        }
        Ok(())
    }
}

impl FromStr for NuGetVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Ord for NuGetVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = &self.version;
        let rhs = &other.version;
        (lhs.major, lhs.minor, lhs.patch, self.revision)
            .cmp(&(rhs.major, rhs.minor, rhs.patch, other.revision))
            .then_with(|| lhs.pre.cmp(&rhs.pre))
            .then_with(|| lhs.build.cmp(&rhs.build))
    }
}

impl PartialOrd for NuGetVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for NuGetVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NuGetVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
