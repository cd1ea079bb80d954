//! Red Hat family backend.

use super::{BackendContext, BackendKind, Package, PkgManager, non_empty};
use crate::config::settings::Settings;
use crate::error::Result;
use crate::history::History;
use regex::Regex;
use std::sync::LazyLock;

// emacs.x86_64 : GNU Emacs text editor
static SEARCH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^(\S+)[ \t]+:[ \t]+(.+)$").expect("Invalid regex pattern")
});

pub struct DnfManager {
    ctx: BackendContext,
}

impl DnfManager {
    pub fn new(ctx: BackendContext) -> Self {
        Self { ctx }
    }

    pub fn open(settings: &Settings) -> Result<Self> {
        Ok(Self::new(BackendContext::open(settings)?))
    }
}

impl PkgManager for DnfManager {
    fn kind(&self) -> BackendKind {
        BackendKind::Dnf
    }

    fn history(&self) -> &History {
        self.ctx.history()
    }

    fn search(&self, query: &str) -> Result<Vec<Package>> {
        let output = self.ctx.search_output(self.kind(), query)?;
        Ok(parse_search(&output))
    }
}

/// Extract packages from `dnf search` output.
///
/// The name keeps its architecture suffix. Banner and separator lines do not
/// match.
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

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Last metadata expiration check: 0:00:14 ago on Thu May 25 14:59:46 2023.
======================== Name & Summary Matched: emacs =========================
emacs.x86_64 : GNU Emacs text editor
emacs-auctex.noarch : Enhanced TeX modes for Emacs
emacs-common.x86_64 : Emacs common files
emacs-filesystem.noarch : Emacs filesystem layout
emacs-lucid.x86_64 : GNU Emacs text editor with LUCID toolkit X support
emacs-notmuch.noarch : Not much support for Emacs
emacs-nox.x86_64 : GNU Emacs text editor without X support
poke-emacs.noarch : Emacs support for poke
============================ Summary Matched: emacs ============================
mg.x86_64 : Tiny Emacs-like editor
";

    #[test]
    fn test_parse_sample() {
        let packages = parse_search(SAMPLE);
        assert_eq!(packages.len(), 9);
        assert_eq!(packages[0].name, "emacs.x86_64");
        assert_eq!(packages[0].description.as_deref(), Some("GNU Emacs text editor"));
        assert_eq!(packages[0].version, None);
        assert_eq!(packages[8].name, "mg.x86_64");
        assert!(packages.iter().all(|p| !p.installed));
    }

    #[test]
    fn test_banner_lines_are_ignored() {
        let packages = parse_search(SAMPLE);
        assert!(packages.iter().all(|p| !p.name.starts_with('=')));
        assert!(packages.iter().all(|p| p.name != "Last"));
    }

    #[test]
    fn test_padded_columns() {
        let packages = parse_search("vim-enhanced.x86_64    :   A version of the VIM editor\n");
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].name, "vim-enhanced.x86_64");
        assert_eq!(
            packages[0].description.as_deref(),
            Some("A version of the VIM editor")
        );
    }

    #[test]
    fn test_empty_output() {
        assert!(parse_search("").is_empty());
        assert!(parse_search("No matches found.\n").is_empty());
    }

    #[test]
    fn test_parse_is_repeatable() {
        assert_eq!(parse_search(SAMPLE), parse_search(SAMPLE));
    }
}
