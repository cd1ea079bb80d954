//! State-changing package operations.
//!
//! Every attempt is recorded in the history with status 0 on success or the
//! error's status code on failure, then the outcome is reported.

use crate::backends::{Package, PkgManager};
use crate::commands::search::print_packages;
use crate::error::Result;
use crate::history::EventKind;
use crate::logging::LogDomain;
use crate::ui as output;
use crate::utils::machine_output::{self, OutputFormat};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Install(Vec<String>),
    Remove(Vec<String>),
    Update,
    Upgrade,
    Clean,
}

impl Operation {
    pub fn event_kind(&self) -> EventKind {
        match self {
            Operation::Install(_) => EventKind::Install,
            Operation::Remove(_) => EventKind::Remove,
            Operation::Update => EventKind::Refresh,
            Operation::Upgrade => EventKind::Upgrade,
            Operation::Clean => EventKind::Clean,
        }
    }

    fn describe(&self) -> String {
        match self {
            Operation::Install(p) => format!("Installed {}", p.join(", ")),
            Operation::Remove(p) => format!("Removed {}", p.join(", ")),
            Operation::Update => "Package index refreshed".to_string(),
            Operation::Upgrade => "System upgraded".to_string(),
            Operation::Clean => "Package cache cleaned".to_string(),
        }
    }
}

pub fn run(manager: &dyn PkgManager, op: Operation) -> Result<()> {
    log::info!(target: LogDomain::Cli.target(), "{}: {:?}", manager.kind(), op);

    let outcome = match &op {
        Operation::Install(packages) => manager.install(packages),
        Operation::Remove(packages) => manager.remove(packages),
        Operation::Update => manager.update(),
        Operation::Upgrade => manager.upgrade(),
        Operation::Clean => manager.clean(),
    };

    match manager.history().record(op.event_kind(), &outcome) {
        Ok(event) => log::debug!(
            target: LogDomain::Database.target(),
            "Recorded {} event {} with status {}",
            event.kind,
            event.id,
            event.status
        ),
        Err(e) => output::warning(&format!("Could not record {} in history: {}", op.event_kind(), e)),
    }

    outcome?;
    output::success(&op.describe());
    Ok(())
}

pub fn list(manager: &dyn PkgManager, format: OutputFormat) -> Result<()> {
    let packages: Vec<Package> = manager.list_installed()?;

    if format.is_machine() {
        return machine_output::emit_v1("list", &packages, vec![], vec![], format);
    }

    output::header(&format!("Installed packages ({})", manager.kind()));
    print_packages(&packages);
    Ok(())
}
