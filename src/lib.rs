pub mod backends;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod history;
pub mod logging;
pub mod platform;
pub mod project_identity;
pub mod ui;
pub mod utils;

pub use backends::{Package, PkgManager};
pub use error::{PkmanError, Result};
pub use platform::detect::detect_os;

use clap::Parser;
use config::settings::Settings;
use std::process::exit;

/// Run pkman CLI entrypoint.
pub fn run_cli() {
    // 1. Parse
    let args = cli::args::Cli::parse();
    ui::set_quiet(args.global.quiet);
    ui::set_verbose(args.global.verbose);

    // 2. Settings, colors and logging
    let settings = match Settings::load(args.global.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            ui::error(&format!("{}", e));
            exit(1);
        }
    };
    ui::init_colors(&settings.color);

    if let Err(e) = logging::init(&settings, args.global.verbose) {
        ui::warning(&format!("{}", e));
    }

    // 3. Signal handling (running commands notice the flag and stop)
    if let Err(e) = ctrlc::set_handler(move || {
        eprintln!();
        ui::mark_interrupted();
        ui::warning("Operation cancelled by user.");
    }) {
        log::warn!(target: logging::LogDomain::Cli.target(), "Cannot install Ctrl-C handler: {}", e);
    }

    // 4. Run
    if let Err(e) = cli::dispatcher::dispatch(&args, &settings) {
        ui::error(&format!("{}", e));
        exit(1);
    }
}
