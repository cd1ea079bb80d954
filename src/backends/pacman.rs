//! Arch family backend.

use super::{BackendContext, BackendKind, Package, PkgManager, non_empty};
use crate::config::settings::Settings;
use crate::error::Result;
use crate::history::History;
use regex::Regex;
use std::sync::LazyLock;

// extra/emacs 28.2-2 [installed]
//     The extensible, customizable, self-documenting real-time display editor
static SEARCH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[^/\s]+/(\S+) (\S+)([^\n]*)\n[ \t]+(.+)$").expect("Invalid regex pattern")
});

pub struct PacmanManager {
    ctx: BackendContext,
}

impl PacmanManager {
    pub fn new(ctx: BackendContext) -> Self {
        Self { ctx }
    }

    pub fn open(settings: &Settings) -> Result<Self> {
        Ok(Self::new(BackendContext::open(settings)?))
    }
}

impl PkgManager for PacmanManager {
    fn kind(&self) -> BackendKind {
        BackendKind::Pacman
    }

    fn history(&self) -> &History {
        self.ctx.history()
    }

    fn search(&self, query: &str) -> Result<Vec<Package>> {
        let output = self.ctx.search_output(self.kind(), query)?;
        Ok(parse_search(&output))
    }
}

/// Extract packages from `pacman -Ss` output.
///
/// Each record spans two lines: `repo/name version [flags]`, then the
/// indented description. The repository prefix is dropped and so is the
/// version. Any bracketed flag, whatever the locale, marks the package as
/// installed.
pub fn parse_search(output: &str) -> Vec<Package> {
    SEARCH_PATTERN
        .captures_iter(output)
        .map(|caps| Package {
            name: caps[1].to_string(),
            version: None,
            description: non_empty(&caps[4]),
            installed: caps[3].contains('['),
        })
        .collect()
}
