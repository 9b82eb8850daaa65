//! Core domain models
//!
//! This module contains the fundamental types used throughout the crate:
//! - Manifest locations and reference kinds
//! - NuGet version values
//! - Package references extracted from manifests
//! - Update outcomes and run summaries

mod package_path;
mod package_reference;
mod summary;
mod update_result;
mod version;

pub use package_path::{PackagePath, PackageReferenceType};
pub use package_reference::{PackageReference, PackageSource};
pub use summary::{ManifestUpdateResult, UpdateSummary};
pub use update_result::{SkipReason, UpdateResult};
pub use version::NuGetVersion;
