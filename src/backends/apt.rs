//! Debian family backend, searching through `apt-cache`.

use super::{BackendContext, BackendKind, Package, PkgManager, non_empty};
use crate::config::settings::Settings;
use crate::error::Result;
use crate::history::History;
use regex::Regex;
use std::sync::LazyLock;

// bbdb - The Insidious Big Brother Database (email rolodex) for Emacs
static SEARCH_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(\S+) - (.+)$").expect("Invalid regex pattern"));

pub struct AptManager {
    ctx: BackendContext,
}

impl AptManager {
    pub fn new(ctx: BackendContext) -> Self {
        Self { ctx }
    }

    pub fn open(settings: &Settings) -> Result<Self> {
        Ok(Self::new(BackendContext::open(settings)?))
    }
}

impl PkgManager for AptManager {
    fn kind(&self) -> BackendKind {
        BackendKind::Apt
    }

    fn history(&self) -> &History {
        self.ctx.history()
    }

    fn search(&self, query: &str) -> Result<Vec<Package>> {
        let output = self.ctx.search_output(self.kind(), query)?;
        Ok(parse_search(&output))
    }
}

/// Extract packages from `apt-cache search` output. No version is reported.
pub fn parse_search(output: &str) -> Vec<Package> {
    SEARCH_PATTERN
        .captures_iter(output)
        .map(|caps| Package {
            name: caps[1].to_string(),
            description: non_empty(&caps[2]),
            ..Package::default()
        })
        .collect()
}
