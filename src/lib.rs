//! nuspec-update - Dependency and release-notes updater for NuGet manifests
//!
//! This library provides the core functionality for working with `.nuspec`
//! package manifests:
//! - Extracting declared dependencies (flat or grouped by target framework)
//! - Rewriting the version of every declaration of a package
//! - Prepending a dated entry to the manifest's release notes

pub mod cli;
pub mod domain;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod progress;
