//! System information command
//!
//! Shows what detection found and which backend would be used.

use crate::backends::command_exec::ExecLimits;
use crate::backends::{self, BackendKind};
use crate::config::settings::Settings;
use crate::error::Result;
use crate::platform::{self, System};
use crate::ui as output;
use crate::utils::machine_output::{self, OutputFormat};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
pub struct InfoReport {
    pub os_name: Option<String>,
    pub os_version: Option<String>,
    pub family: Option<String>,
    pub backend: Option<BackendKind>,
    pub backend_available: bool,
    pub last_update: DateTime<Utc>,
    pub database: PathBuf,
}

/// Collect the report. Detection problems become warnings, not errors.
pub fn gather(explicit: Option<BackendKind>, settings: &Settings) -> (InfoReport, Vec<String>) {
    let mut warnings = Vec::new();

    let (os_name, os_version) = match platform::detect::detect_os_within(ExecLimits::from(settings)) {
        Ok((name, version)) => (Some(name), Some(version)),
        Err(e) => {
            warnings.push(e.to_string());
            (None, None)
        }
    };

    let system: Option<System> = os_name
        .as_deref()
        .and_then(|name| match platform::parse_system(name) {
            Ok(system) => Some(system),
            Err(e) => {
                warnings.push(e.to_string());
                None
            }
        });

    let backend = explicit.or_else(|| {
        system.and_then(|s| match backends::select::backend_kind_for(s) {
            Ok(kind) => Some(kind),
            Err(e) => {
                warnings.push(e.to_string());
                None
            }
        })
    });

    let last_update = match backend.map(|kind| backends::create_backend(kind, settings)) {
        Some(Ok(manager)) => manager.last_update().unwrap_or(DateTime::UNIX_EPOCH),
        Some(Err(e)) => {
            warnings.push(e.to_string());
            DateTime::UNIX_EPOCH
        }
        None => DateTime::UNIX_EPOCH,
    };

    let report = InfoReport {
        os_name,
        os_version,
        family: system.map(|s| s.display_name().to_string()),
        backend_available: backend.is_some_and(|k| k.is_available()),
        backend,
        last_update,
        database: settings.database.clone(),
    };

    (report, warnings)
}

pub fn run(explicit: Option<BackendKind>, settings: &Settings, format: OutputFormat) -> Result<()> {
    let (report, warnings) = gather(explicit, settings);

    if format.is_machine() {
        return machine_output::emit_v1("info", report, warnings, vec![], format);
    }

    let unknown = || "unknown".to_string();

    output::header("System");
    output::keyval("OS", report.os_name.as_deref().unwrap_or("unknown"));
    output::keyval("Version", report.os_version.as_deref().unwrap_or("unknown"));
    output::keyval("Family", report.family.as_deref().unwrap_or("unknown"));

    output::header("Package manager");
    output::keyval(
        "Backend",
        &report.backend.map(|k| k.to_string()).unwrap_or_else(unknown),
    );
    if let Some(kind) = report.backend {
        let status = if report.backend_available {
            "found"
        } else {
            "not found"
        };
        output::keyval("Binary", &format!("{} ({})", kind.binary(), status));
    }
    let last = if report.last_update == DateTime::UNIX_EPOCH {
        "never".to_string()
    } else {
        report.last_update.format("%Y-%m-%d %H:%M:%S UTC").to_string()
    };
    output::keyval("Last update", &last);
    output::keyval("History", &report.database.display().to_string());

    for warning in &warnings {
        output::warning(warning);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_backend_wins() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::with_database(dir.path().join("pkman.db"));

        let (report, _) = gather(Some(BackendKind::PkgInfo), &settings);
        assert_eq!(report.backend, Some(BackendKind::PkgInfo));
        assert_eq!(report.last_update, DateTime::UNIX_EPOCH);
        assert_eq!(report.database, settings.database);
    }

    #[test]
    fn test_report_serializes() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::with_database(dir.path().join("pkman.db"));

        let (report, _) = gather(Some(BackendKind::Apt), &settings);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["backend"], "apt");
        assert!(json.get("last_update").is_some());
    }
}
