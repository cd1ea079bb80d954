//! Command dispatcher
//!
//! Routes CLI commands to their appropriate handlers.

use crate::backends::{self, PkgManager};
use crate::cli::args::{Cli, Command};
use crate::commands;
use crate::commands::ops::Operation;
use crate::config::settings::Settings;
use crate::error::Result;
use crate::logging::LogDomain;

/// Dispatch the parsed CLI command to the appropriate handler
pub fn dispatch(args: &Cli, settings: &Settings) -> Result<()> {
    log::debug!(target: LogDomain::Cli.target(), "Dispatching {:?}", args.command);

    match &args.command {
        Command::Search {
            query,
            format,
            limit,
        } => {
            let manager = backend(args, settings)?;
            commands::search::run(manager.as_ref(), query, *format, *limit)
        }

        Command::Install { packages } => run_op(args, settings, Operation::Install(packages.clone())),
        Command::Remove { packages } => run_op(args, settings, Operation::Remove(packages.clone())),
        Command::Update => run_op(args, settings, Operation::Update),
        Command::Upgrade => run_op(args, settings, Operation::Upgrade),
        Command::Clean => run_op(args, settings, Operation::Clean),

        Command::List { format } => {
            let manager = backend(args, settings)?;
            commands::ops::list(manager.as_ref(), *format)
        }

        Command::Info { format } => commands::info::run(args.global.backend, settings, *format),

        Command::History {
            limit,
            errors,
            kind,
            format,
        } => commands::history::run(
            settings,
            commands::history::HistoryQuery {
                limit: *limit,
                errors: *errors,
                kind: *kind,
            },
            *format,
        ),

        Command::Completions { shell } => commands::completions::run(*shell),
    }
}

fn backend(args: &Cli, settings: &Settings) -> Result<Box<dyn PkgManager>> {
    backends::resolve(args.global.backend, settings)
}

fn run_op(args: &Cli, settings: &Settings, op: Operation) -> Result<()> {
    let manager = backend(args, settings)?;
    commands::ops::run(manager.as_ref(), op)
}
