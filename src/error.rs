use crate::backends::BackendKind;
use crate::platform::System;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PkmanError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error at '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    StdIoError(#[from] std::io::Error),

    #[error("KDL parse error: {0}")]
    KdlError(#[from] kdl::KdlError),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    YamlError(#[from] serde_yml::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The kernel identification command could not be run at all.
    #[error("Cannot detect operating system ('{command}'): {reason}")]
    DetectionFailed { command: String, reason: String },

    #[error("Cannot parse output of uname: {output:?}")]
    UnameParse { output: String },

    #[error("Cannot read release file '{path}': {source}")]
    ReleaseFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No identification pattern matched the operating system name.
    #[error("Unknown operating system: {name:?}")]
    UnknownOs { name: String },

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(System),

    #[error("System command '{command}' failed: {reason}")]
    SystemCommandFailed { command: String, reason: String },

    #[error("System command '{command}' timed out after {seconds} seconds")]
    CommandTimedOut { command: String, seconds: u64 },

    #[error("Operation interrupted by user")]
    Interrupted,

    /// Operation exists on the interface but has no implementation for this
    /// backend. Permanent for this version.
    #[error("{operation} is not implemented for {backend}")]
    NotImplemented {
        backend: BackendKind,
        operation: &'static str,
    },

    #[error("{0}")]
    Other(String),
}

impl PkmanError {
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented { .. })
    }

    pub fn is_unknown_os(&self) -> bool {
        matches!(self, Self::UnknownOs { .. })
    }

    /// Nonzero status recorded in the event history for a failed operation.
    pub fn status_code(&self) -> i64 {
        match self {
            Self::NotImplemented { .. } => 38,
            Self::Interrupted => 130,
            Self::CommandTimedOut { .. } => 124,
            Self::SystemCommandFailed { .. } => 126,
            Self::UnknownOs { .. } | Self::UnsupportedPlatform(_) => 95,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, PkmanError>;
