//! Package search command
//!
//! Runs the backend's search and prints the scraped packages.

mod render;

pub(crate) use render::print_packages;

use crate::backends::{Package, PkgManager};
use crate::error::Result;
use crate::logging::LogDomain;
use crate::ui as output;
use crate::utils::machine_output::{self, OutputFormat};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct SearchReportOut<'a> {
    query: &'a str,
    backend: String,
    total_matches: usize,
    shown_results: usize,
    results: &'a [Package],
}

/// Apply `limit`, returning the kept packages and the total found.
pub fn apply_limit(mut packages: Vec<Package>, limit: Option<usize>) -> (Vec<Package>, usize) {
    let total = packages.len();
    if let Some(limit) = limit {
        packages.truncate(limit);
    }
    (packages, total)
}

pub fn run(
    manager: &dyn PkgManager,
    query: &str,
    format: OutputFormat,
    limit: Option<usize>,
) -> Result<()> {
    let backend = manager.kind();
    log::info!(target: LogDomain::Cli.target(), "Searching {} for {:?}", backend, query);

    let packages = match manager.search(query) {
        Ok(packages) => packages,
        Err(e) => {
            if format.is_machine() {
                machine_output::emit_v1(
                    "search",
                    Vec::<Package>::new(),
                    vec![],
                    vec![e.to_string()],
                    format,
                )?;
            }
            return Err(e);
        }
    };

    let (shown, total) = apply_limit(packages, limit);

    if format.is_machine() {
        let mut warnings = Vec::new();
        if shown.len() < total {
            warnings.push(format!("Showing {} of {} matches", shown.len(), total));
        }
        let report = SearchReportOut {
            query,
            backend: backend.to_string(),
            total_matches: total,
            shown_results: shown.len(),
            results: &shown,
        };
        return machine_output::emit_v1("search", report, warnings, vec![], format);
    }

    if shown.is_empty() {
        output::info(&format!("No packages found for '{}'", query));
        return Ok(());
    }

    output::header(&format!("{} results for '{}'", backend, query));
    print_packages(&shown);

    if shown.len() < total {
        output::info(&format!("Showing {} of {} matches", shown.len(), total));
    }

    Ok(())
}
