//! CLI argument parsing module for nuspec-update

use crate::domain::NuGetVersion;
use crate::error::ConfigError;
use clap::Parser;
use std::path::PathBuf;

/// Dependency and release-notes updater for NuGet .nuspec manifests
#[derive(Parser, Debug, Clone)]
#[command(
    name = "nuspec-update",
    version,
    about = "Dependency and release-notes updater for NuGet .nuspec manifests"
)]
pub struct CliArgs {
    /// Manifest file or directory to scan (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    // Update target
    /// Package id whose dependency declarations are rewritten
    #[arg(long, value_name = "ID")]
    pub package: Option<String>,

    /// Version written to every declaration of --package
    #[arg(long, value_name = "VERSION", value_parser = NuGetVersion::parse)]
    pub to: Option<NuGetVersion>,

    // General options
    /// Dry run mode - show what would be updated without making changes
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    // Output options
    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,
}

impl CliArgs {
    /// Check that the option combination is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        match (&self.package, &self.to) {
            (Some(_), None) => {
                return Err(ConfigError::ConflictingOptions {
                    message: "--package requires --to".to_string(),
                })
            }
            (None, Some(_)) => {
                return Err(ConfigError::ConflictingOptions {
                    message: "--to requires --package".to_string(),
                })
            }
            (Some(id), Some(_)) if id.trim().is_empty() => {
                return Err(ConfigError::ConflictingOptions {
                    message: "--package must not be empty".to_string(),
                })
            }
            _ => {}
        }

        if !self.path.exists() {
            return Err(ConfigError::InvalidPath {
                path: self.path.clone(),
                message: "no such file or directory".to_string(),
            });
        }

        Ok(())
    }

    /// The requested package id and version, when an update was asked for
    pub fn target(&self) -> Option<(&str, &NuGetVersion)> {
        match (&self.package, &self.to) {
            (Some(id), Some(version)) => Some((id.as_str(), version)),
            _ => None,
        }
    }

    /// Whether progress spinners should be drawn
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.json
    }
}
