//! OpenBSD backend, querying through `pkg_info -Q`.

use super::{BackendContext, BackendKind, Package, PkgManager};
use crate::config::settings::Settings;
use crate::error::Result;
use crate::history::History;
use regex::Regex;
use std::sync::LazyLock;

// emacs-28.2p2-no_x11 (installed)
static SEARCH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^(\S+?)-(\d\S*)(?:[ \t]+(\(installed\)))?[ \t\r]*$")
        .expect("Invalid regex pattern")
});

pub struct OpenBsdPkgManager {
    ctx: BackendContext,
}

impl OpenBsdPkgManager {
    pub fn new(ctx: BackendContext) -> Self {
        Self { ctx }
    }

    pub fn open(settings: &Settings) -> Result<Self> {
        Ok(Self::new(BackendContext::open(settings)?))
    }
}

impl PkgManager for OpenBsdPkgManager {
    fn kind(&self) -> BackendKind {
        BackendKind::PkgInfo
    }

    fn history(&self) -> &History {
        self.ctx.history()
    }

    fn search(&self, query: &str) -> Result<Vec<Package>> {
        let output = self.ctx.search_output(self.kind(), query)?;
        Ok(parse_search(&output))
    }
}

/// Extract packages from `pkg_info -Q` output.
///
/// One `name-version[-flavor]` stem per line, with no description. Versions
/// carry flavor suffixes after further dashes, so the split happens at the
/// first `-` that precedes a digit.
pub fn parse_search(output: &str) -> Vec<Package> {
    SEARCH_PATTERN
        .captures_iter(output)
        .map(|caps| Package {
            name: caps[1].to_string(),
            version: Some(caps[2].to_string()),
            description: None,
            installed: caps.get(3).is_some(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
debug-emacs-28.2p2-gtk2
debug-emacs-28.2p2-gtk3
debug-emacs-28.2p2-no_x11
emacs-28.2p2-gtk2
emacs-28.2p2-gtk3
emacs-28.2p2-no_x11 (installed)
";

    #[test]
    fn test_parse_sample() {
        let packages = parse_search(SAMPLE);
        assert_eq!(packages.len(), 6);
        assert_eq!(packages[0].name, "debug-emacs");
        assert_eq!(packages[0].version.as_deref(), Some("28.2p2-gtk2"));
        assert_eq!(packages[3].name, "emacs");
        assert_eq!(packages[3].version.as_deref(), Some("28.2p2-gtk2"));
        assert!(packages.iter().all(|p| p.description.is_none()));
    }

    #[test]
    fn test_installed_marker() {
        let packages = parse_search(SAMPLE);
        assert!(packages[5].installed);
        assert_eq!(packages[5].version.as_deref(), Some("28.2p2-no_x11"));
        assert_eq!(packages.iter().filter(|p| p.installed).count(), 1);
    }

    #[test]
    fn test_unversioned_lines_are_skipped() {
        assert!(parse_search("").is_empty());
        assert!(parse_search("quirks\nCan't find emacs\n").is_empty());
    }
}
