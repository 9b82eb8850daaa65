//! Report rendering for scan and update runs
//!
//! The report is written to stdout as colored text or as a single JSON
//! document. Both carry the requested update target, when there is one.

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::{TextFormatter, VersionChangeType};

use crate::cli::CliArgs;
use crate::domain::NuGetVersion;
use crate::orchestrator::OrchestratorResult;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Summary lines only
    Quiet,
    Normal,
    /// Every manifest, including those the update skipped
    Verbose,
}

/// Package and version the run was asked to apply
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateTarget {
    pub package_id: String,
    pub version: NuGetVersion,
}

/// How the report is rendered
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub verbosity: Verbosity,
    pub dry_run: bool,
    /// Whether ANSI colors are written (text only)
    pub color: bool,
    /// `--package`/`--to` when both were given
    pub target: Option<UpdateTarget>,
}

impl OutputConfig {
    /// Plain text report without colors or update target
    pub fn text(verbosity: Verbosity, dry_run: bool) -> Self {
        Self {
            format: OutputFormat::Text,
            verbosity,
            dry_run,
            color: false,
            target: None,
        }
    }

    /// Report settings for a parsed command line
    ///
    /// Colors follow `colored`'s terminal and `NO_COLOR`/`CLICOLOR` detection.
    pub fn from_args(args: &CliArgs) -> Self {
        let verbosity = match (args.quiet, args.verbose) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Verbose,
            (false, false) => Verbosity::Normal,
        };

        Self {
            format: if args.json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
            verbosity,
            dry_run: args.dry_run,
            color: colored::control::SHOULD_COLORIZE.should_colorize(),
            target: args.target().map(|(package_id, version)| UpdateTarget {
                package_id: package_id.to_string(),
                version: version.clone(),
            }),
        }
    }

    pub fn with_target(mut self, package_id: &str, version: NuGetVersion) -> Self {
        self.target = Some(UpdateTarget {
            package_id: package_id.to_string(),
            version,
        });
        self
    }
}

/// Renders an orchestrator result
pub trait OutputFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()>;
}

pub fn create_formatter(config: OutputConfig) -> Box<dyn OutputFormatter> {
    match config.format {
        OutputFormat::Text => Box::new(TextFormatter::new(config)),
        OutputFormat::Json => Box::new(JsonFormatter::new(config)),
    }
}
