use crate::backends::BackendKind;
use crate::error::{PkmanError, Result};
use crate::history::History;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A package entry recovered from a package manager's output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Package {
    pub name: String,
    pub version: Option<String>,
    pub description: Option<String>,
    /// The tool marked this package as installed.
    pub installed: bool,
}

impl Package {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

pub(crate) fn not_implemented(backend: BackendKind, operation: &'static str) -> PkmanError {
    PkmanError::NotImplemented { backend, operation }
}

/// Uniform interface to a system package manager.
///
/// Only [`search`](PkgManager::search) does real work. Every other operation
/// fails with [`PkmanError::NotImplemented`] unless a backend overrides it.
pub trait PkgManager {
    fn kind(&self) -> BackendKind;

    /// Event store this backend records its operations in.
    fn history(&self) -> &History;

    fn search(&self, query: &str) -> Result<Vec<Package>>;

    fn install(&self, _packages: &[String]) -> Result<()> {
        Err(not_implemented(self.kind(), "install"))
    }

    fn remove(&self, _packages: &[String]) -> Result<()> {
        Err(not_implemented(self.kind(), "remove"))
    }

    /// Refresh the package index.
    fn update(&self) -> Result<()> {
        Err(not_implemented(self.kind(), "update"))
    }

    fn upgrade(&self) -> Result<()> {
        Err(not_implemented(self.kind(), "upgrade"))
    }

    fn list_installed(&self) -> Result<Vec<Package>> {
        Err(not_implemented(self.kind(), "list"))
    }

    fn clean(&self) -> Result<()> {
        Err(not_implemented(self.kind(), "clean"))
    }

    /// Time of the last index refresh. Callers fall back to
    /// `DateTime::UNIX_EPOCH` when this fails.
    fn last_update(&self) -> Result<DateTime<Utc>> {
        Err(not_implemented(self.kind(), "last update"))
    }
}
