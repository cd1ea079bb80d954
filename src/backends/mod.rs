//! # Package Manager Backends
//!
//! One module per supported tool. Each backend shells out to its tool's
//! search command and scrapes the human-readable output with a regular
//! expression.
//!
//! ## Module Structure
//!
//! ### [`kind`] - Backend identifiers
//!
//! [`BackendKind`] names a tool and knows its binary path and search arguments.
//!
//! ### [`traits`] - The facade
//!
//! [`PkgManager`] is the uniform interface. Only `search` does real work; the
//! remaining operations fail with a typed "not implemented" error.
//!
//! ### [`select`] - Picking a backend
//!
//! Maps an operating system name to a backend through
//! [`parse_system`](crate::platform::parse_system).
//!
//! ### [`command_exec`] - Running tools
//!
//! Bounded, non-interactive execution with a timeout.
//!
//! ## Backends
//!
//! | Backend    | Tool                 | Systems               |
//! |------------|----------------------|-----------------------|
//! | `apt`      | `apt-cache search`   | Debian, Ubuntu        |
//! | `dnf`      | `dnf search`         | Fedora, Rocky         |
//! | `pacman`   | `pacman -Ss`         | Arch, Manjaro         |
//! | `zypper`   | `zypper se`          | openSUSE              |
//! | `pkg`      | `pkg search`         | FreeBSD (explicit)    |
//! | `pkg_info` | `pkg_info -Q`        | OpenBSD (explicit)    |

pub mod apt;
pub mod command_exec;
pub mod dnf;
pub mod kind;
pub mod pacman;
pub mod pkg;
pub mod pkg_info;
pub mod select;
pub mod traits;
pub mod zypper;

pub use kind::BackendKind;
pub use select::{create_backend, detect_pkg_manager, get_pkg_manager, resolve};
pub use traits::{Package, PkgManager};

use crate::config::settings::Settings;
use crate::error::Result;
use crate::history::History;
use crate::logging::LogDomain;
use command_exec::{ExecLimits, run_command};
use std::process::Command;

/// State every backend owns: its own history handle and execution limits.
pub struct BackendContext {
    history: History,
    limits: ExecLimits,
}

impl BackendContext {
    pub fn new(history: History, limits: ExecLimits) -> Self {
        Self { history, limits }
    }

    /// Open the history database named in `settings`.
    pub fn open(settings: &Settings) -> Result<Self> {
        let history = History::open(&settings.database).map_err(|e| {
            log::error!(
                target: LogDomain::PkgManager.target(),
                "Cannot open database at {}: {}",
                settings.database.display(),
                e
            );
            e
        })?;
        Ok(Self::new(history, ExecLimits::from(settings)))
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Run `kind`'s search command for `query` and return its standard output.
    pub fn search_output(&self, kind: BackendKind, query: &str) -> Result<String> {
        let mut cmd = Command::new(kind.binary());
        cmd.args(kind.search_args()).arg(query);
        self.run_tool(kind, &mut cmd)
    }

    /// Run a tool to completion. A nonzero exit is logged, not raised: search
    /// tools exit nonzero when nothing matches.
    pub fn run_tool(&self, kind: BackendKind, cmd: &mut Command) -> Result<String> {
        log::debug!(target: LogDomain::PkgManager.target(), "{}: running {:?}", kind, cmd);

        let output = run_command(cmd, self.limits).map_err(|e| {
            log::error!(target: LogDomain::PkgManager.target(), "{}: {}", kind, e);
            e
        })?;

        if !output.status.success() {
            log::warn!(
                target: LogDomain::PkgManager.target(),
                "{} exited with {}: {}",
                kind,
                output.status,
                output.stderr_lossy().trim()
            );
        }

        if output.stdout_truncated {
            log::warn!(
                target: LogDomain::PkgManager.target(),
                "{} output exceeded {} bytes, remainder discarded",
                kind,
                self.limits.max_output
            );
        }

        Ok(output.stdout_lossy())
    }
}

/// Trimmed capture text, or `None` when it is empty.
pub(crate) fn non_empty(text: &str) -> Option<String> {
    let text = text.trim_end_matches([' ', '\t', '\r']);
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
