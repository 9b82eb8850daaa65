//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: Issues with reading, parsing or writing a nuspec manifest
//! - VersionError: Version text that cannot be normalized
//! - ConfigError: Issues with CLI configuration

use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop the run before any manifest is touched
///
/// Per-manifest failures are collected by the orchestrator instead.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to manifest file operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Failed to open or read manifest file
    #[error("unable to parse file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write manifest file
    #[error("failed to write manifest file {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed XML reported by the parser
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),

    /// Well-formed tokens that do not nest into a single document tree
    #[error("malformed XML document: {message}")]
    XmlStructure { message: String },

    /// Caller supplied an unusable argument
    #[error("invalid argument '{name}': {message}")]
    InvalidArgument { name: &'static str, message: String },
}

/// Errors related to NuGet version text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// Version text is empty or whitespace
    #[error("version string is empty")]
    Empty,

    /// Version text does not follow the NuGet version grammar
    #[error("invalid version '{value}': {message}")]
    Invalid { value: String, message: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Path does not exist or cannot be scanned
    #[error("invalid path '{path}': {message}")]
    InvalidPath { path: PathBuf, message: String },

    /// Conflicting options
    #[error("conflicting options: {message}")]
    ConflictingOptions { message: String },
}

impl ManifestError {
    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::WriteError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new XmlStructure error
    pub fn xml_structure(message: impl Into<String>) -> Self {
        ManifestError::XmlStructure {
            message: message.into(),
        }
    }

    /// Creates a new InvalidArgument error
    pub fn invalid_argument(name: &'static str, message: impl Into<String>) -> Self {
        ManifestError::InvalidArgument {
            name,
            message: message.into(),
        }
    }
}

impl VersionError {
    /// Creates a new Invalid error
    pub fn invalid(value: impl Into<String>, message: impl Into<String>) -> Self {
        VersionError::Invalid {
            value: value.into(),
            message: message.into(),
        }
    }
}
