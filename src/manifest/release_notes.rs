//! Changelog entries prepended to `metadata/releaseNotes`

use crate::domain::NuGetVersion;
use chrono::{Local, NaiveDate};
use std::fmt;

/// Source of the date stamped on release-note entries
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always returns the same date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// One dated, versioned changelog entry
///
/// Renders as:
///
/// ```text
///
///       [2024-03-01][v5.3.4]
///           Updated dependencies for foo to version 5.3.4
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseNoteEntry<'a> {
    pub date: NaiveDate,
    pub package_id: &'a str,
    pub version: &'a NuGetVersion,
}

impl<'a> ReleaseNoteEntry<'a> {
    pub fn new(date: NaiveDate, package_id: &'a str, version: &'a NuGetVersion) -> Self {
        Self {
            date,
            package_id,
            version,
        }
    }

    /// New notes text: this entry followed by the existing notes
    pub fn prepend_to(&self, existing: &str) -> String {
        format!("{}{}", self, existing)
    }
}

impl fmt::Display for ReleaseNoteEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\n      [{}][v{}]\n          Updated dependencies for {} to version {}",
            self.date.format("%Y-%m-%d"),
            self.version,
            self.package_id,
            self.version
        )
    }
}
