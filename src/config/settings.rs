//! Settings Module
//!
//! Loads `settings.kdl`. Every key is optional and falls back to a default:
//!
//! ```kdl
//! settings {
//!     timeout 300
//!     max-output 8388608
//!     database "~/.local/share/pkman/pkman.db"
//!     log-level "info"
//!     log-file "~/.local/state/pkman/pkman.log"
//!     color "auto"
//! }
//! ```

use crate::error::{PkmanError, Result};
use crate::logging;
use crate::project_identity;
use crate::utils::paths;
use kdl::{KdlDocument, KdlNode};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default timeout for package manager commands (5 minutes)
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default cap on captured output per stream (8 MiB)
pub const DEFAULT_MAX_OUTPUT: usize = 8 * 1024 * 1024;

const VALID_KEYS: &[&str] = &[
    "timeout",
    "max-output",
    "database",
    "log-level",
    "log-file",
    "color",
];

const COLOR_MODES: &[&str] = &["auto", "always", "never"];

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub timeout: Duration,
    pub max_output: usize,
    pub database: PathBuf,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub color: String,
}

impl Settings {
    /// Defaults with the database placed in the user's data directory.
    pub fn defaults() -> Result<Self> {
        Ok(Self::with_database(paths::default_database()?))
    }

    pub fn with_database(database: PathBuf) -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_output: DEFAULT_MAX_OUTPUT,
            database,
            log_level: "warn".to_string(),
            log_file: None,
            color: "auto".to_string(),
        }
    }

    /// Load settings from `explicit`, `$PKMAN_CONFIG`, or the config directory,
    /// in that order. A missing file yields the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => paths::expand_home(p)?,
            None => match std::env::var_os(project_identity::env_key("CONFIG")) {
                Some(p) => PathBuf::from(p),
                None => paths::settings_file()?,
            },
        };

        let mut settings = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| PkmanError::IoError {
                path: path.clone(),
                source: e,
            })?;
            let mut settings = Self::defaults()?;
            settings.apply_kdl(&content)?;
            settings
        } else {
            Self::defaults()?
        };

        if let Some(db) = std::env::var_os(project_identity::env_key("DB")) {
            settings.database = PathBuf::from(db);
        }

        Ok(settings)
    }

    /// Overlay the values found in a KDL document.
    pub fn apply_kdl(&mut self, content: &str) -> Result<()> {
        let doc: KdlDocument = content.parse()?;

        for node in doc.nodes() {
            if node.name().value() == "settings" {
                if let Some(children) = node.children() {
                    for child in children.nodes() {
                        self.apply_node(child)?;
                    }
                }
            } else {
                self.apply_node(node)?;
            }
        }

        Ok(())
    }

    fn apply_node(&mut self, node: &KdlNode) -> Result<()> {
        let key = node.name().value();

        if !VALID_KEYS.contains(&key) {
            return Err(PkmanError::ConfigError(format!(
                "Unknown setting: '{}'. Valid settings: {}",
                key,
                VALID_KEYS.join(", ")
            )));
        }

        match key {
            "timeout" => self.timeout = Duration::from_secs(positive_integer(node)?),
            "max-output" => {
                self.max_output = usize::try_from(positive_integer(node)?).map_err(|_| {
                    PkmanError::ConfigError("max-output is too large".to_string())
                })?
            }
            "database" => self.database = paths::expand_home(Path::new(&string_value(node)?))?,
            "log-level" => {
                let level = string_value(node)?;
                logging::parse_level(&level)?;
                self.log_level = level;
            }
            "log-file" => {
                self.log_file = Some(paths::expand_home(Path::new(&string_value(node)?))?)
            }
            "color" => {
                let mode = string_value(node)?;
                if !COLOR_MODES.contains(&mode.as_str()) {
                    return Err(PkmanError::ConfigError(format!(
                        "Invalid value for 'color': '{}'. Valid: {}",
                        mode,
                        COLOR_MODES.join(", ")
                    )));
                }
                self.color = mode;
            }
            _ => {}
        }

        Ok(())
    }
}

fn string_value(node: &KdlNode) -> Result<String> {
    node.entries()
        .first()
        .and_then(|e| e.value().as_string())
        .map(str::to_string)
        .ok_or_else(|| {
            PkmanError::ConfigError(format!(
                "Setting '{}' expects a string value",
                node.name().value()
            ))
        })
}

fn positive_integer(node: &KdlNode) -> Result<u64> {
    node.entries()
        .first()
        .and_then(|e| e.value().as_integer())
        .and_then(|v| u64::try_from(v).ok())
        .filter(|v| *v > 0)
        .ok_or_else(|| {
            PkmanError::ConfigError(format!(
                "Setting '{}' expects a positive integer",
                node.name().value()
            ))
        })
}
