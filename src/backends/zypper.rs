//! openSUSE backend.

use super::{BackendContext, BackendKind, Package, PkgManager, non_empty};
use crate::config::settings::Settings;
use crate::error::Result;
use crate::history::History;
use regex::Regex;
use std::sync::LazyLock;

// i+ | emacs | GNU Emacs Base Package | package
static SEARCH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(i\+?)?[ \t]*\|[ \t]*(\S+)[ \t]*\|[ \t]*(.*?)[ \t]*\|[ \t]*(\S+)[ \t\r]*$")
        .expect("Invalid regex pattern")
});

pub struct ZypperManager {
    ctx: BackendContext,
}

impl ZypperManager {
    pub fn new(ctx: BackendContext) -> Self {
        Self { ctx }
    }

    pub fn open(settings: &Settings) -> Result<Self> {
        Ok(Self::new(BackendContext::open(settings)?))
    }
}

impl PkgManager for ZypperManager {
    fn kind(&self) -> BackendKind {
        BackendKind::Zypper
    }

    fn history(&self) -> &History {
        self.ctx.history()
    }

    fn search(&self, query: &str) -> Result<Vec<Package>> {
        let output = self.ctx.search_output(self.kind(), query)?;
        Ok(parse_search(&output))
    }
}

/// Extract packages from the table printed by `zypper se`.
///
/// Columns are status, name, summary and type. A status of `i` or `i+` marks
/// the package as installed. The header row and the separator do not match.
pub fn parse_search(output: &str) -> Vec<Package> {
    SEARCH_PATTERN
        .captures_iter(output)
        .map(|caps| Package {
            name: caps[2].to_string(),
            version: None,
            description: non_empty(&caps[3]),
            installed: caps.get(1).is_some(),
        })
        .collect()
}

#[cfg(test)]
mod tests;
