use crate::backends::BackendKind;
use crate::history::EventKind;
use crate::utils::machine_output::OutputFormat;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pkman",
    about = "One front-end for the system package manager",
    long_about = "Detects the operating system and drives its native package manager \
                  (apt, dnf, pacman, zypper, pkg, pkg_info) through a single interface",
    version,
    next_line_help = false,
    term_width = 80
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalFlags,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Parser, Debug)]
pub struct GlobalFlags {
    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Quiet mode
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Use this backend instead of detecting one
    #[arg(long, global = true, value_name = "BACKEND", value_parser = parse_backend)]
    pub backend: Option<BackendKind>,

    /// Settings file to load
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search available packages
    Search {
        /// Text to search for
        query: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Show at most this many results
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
    },

    /// Install packages
    Install {
        #[arg(required = true, value_name = "PACKAGE")]
        packages: Vec<String>,
    },

    /// Remove packages
    Remove {
        #[arg(required = true, value_name = "PACKAGE")]
        packages: Vec<String>,
    },

    /// Refresh the package index
    Update,

    /// Upgrade installed packages
    Upgrade,

    /// List installed packages
    List {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Clean the package cache
    Clean,

    /// Show detected system, backend and settings
    Info {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Show recorded operations
    History {
        /// Number of events to show
        #[arg(long, default_value_t = 20)]
        limit: usize,

        /// Only failed operations
        #[arg(long, conflicts_with = "kind")]
        errors: bool,

        /// Only operations of this kind
        #[arg(long, value_parser = parse_event_kind)]
        kind: Option<EventKind>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_backend(value: &str) -> Result<BackendKind, String> {
    value.parse()
}

fn parse_event_kind(value: &str) -> Result<EventKind, String> {
    value.parse()
}
