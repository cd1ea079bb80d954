//! Log setup and per-component log targets.

use crate::config::settings::Settings;
use crate::error::{PkmanError, Result};
use env_logger::{Builder, Target};
use log::LevelFilter;
use std::fs::OpenOptions;

/// The parts of the application that log under their own target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDomain {
    Common,
    Cli,
    PkgManager,
    Database,
    Platform,
}

impl LogDomain {
    pub const fn target(self) -> &'static str {
        match self {
            LogDomain::Common => "pkman::common",
            LogDomain::Cli => "pkman::cli",
            LogDomain::PkgManager => "pkman::pkg_manager",
            LogDomain::Database => "pkman::database",
            LogDomain::Platform => "pkman::platform",
        }
    }

    pub fn all() -> &'static [LogDomain] {
        &[
            LogDomain::Common,
            LogDomain::Cli,
            LogDomain::PkgManager,
            LogDomain::Database,
            LogDomain::Platform,
        ]
    }
}

pub fn parse_level(level: &str) -> Result<LevelFilter> {
    level
        .parse::<LevelFilter>()
        .map_err(|_| PkmanError::ConfigError(format!("Invalid log level: '{}'", level)))
}

/// Install the global logger. `RUST_LOG` wins over the configured level.
pub fn init(settings: &Settings, verbose: bool) -> Result<()> {
    let mut builder = Builder::new();

    let level = if verbose {
        LevelFilter::Debug
    } else {
        parse_level(&settings.log_level)?
    };
    builder.filter_level(level);

    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    if let Some(path) = &settings.log_file {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PkmanError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| PkmanError::IoError {
                path: path.clone(),
                source: e,
            })?;
        builder.target(Target::Pipe(Box::new(file)));
        builder.write_style(env_logger::WriteStyle::Never);
    }

    builder
        .try_init()
        .map_err(|e| PkmanError::Other(format!("Failed to initialize logger: {}", e)))?;

    log::debug!(
        target: LogDomain::Common.target(),
        "Logging at {} (database {})",
        level,
        settings.database.display()
    );
    Ok(())
}
