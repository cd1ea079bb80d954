//! FreeBSD backend.

use super::{BackendContext, BackendKind, Package, PkgManager, non_empty};
use crate::config::settings::Settings;
use crate::error::Result;
use crate::history::History;
use regex::Regex;
use std::sync::LazyLock;

// emacs-28.2_4,3                 GNU editing macros
static SEARCH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(\S+)-(\d\S*)[ \t]+(.+)$").expect("Invalid regex pattern")
});

pub struct FreeBsdPkgManager {
    ctx: BackendContext,
}

impl FreeBsdPkgManager {
    pub fn new(ctx: BackendContext) -> Self {
        Self { ctx }
    }

    pub fn open(settings: &Settings) -> Result<Self> {
        Ok(Self::new(BackendContext::open(settings)?))
    }
}

impl PkgManager for FreeBsdPkgManager {
    fn kind(&self) -> BackendKind {
        BackendKind::Pkg
    }

    fn history(&self) -> &History {
        self.ctx.history()
    }

    fn search(&self, query: &str) -> Result<Vec<Package>> {
        let output = self.ctx.search_output(self.kind(), query)?;
        Ok(parse_search(&output))
    }
}

/// Extract packages from `pkg search` output.
///
/// The first column is `name-version`. The name may itself contain dashes
/// followed by digits, so the split happens at the last `-` that precedes a
/// digit.
pub fn parse_search(output: &str) -> Vec<Package> {
    SEARCH_PATTERN
        .captures_iter(output)
        .map(|caps| Package {
            name: caps[1].to_string(),
            version: Some(caps[2].to_string()),
            description: non_empty(&caps[3]),
            installed: false,
        })
        .collect()
}
