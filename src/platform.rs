//! Operating system families.
//!
//! Many concrete distributions share a package manager, so they collapse into a
//! single [`System`] value (Ubuntu, Raspbian and Debian are all `Debian`).

pub mod detect;

use crate::error::{PkmanError, Result};
use crate::logging::LogDomain;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum System {
    FreeBSD,
    OpenBSD,
    NetBSD,
    OpenSuse,
    Debian,
    Arch,
    RedHat,
}

impl System {
    pub fn all() -> &'static [System] {
        &[
            System::FreeBSD,
            System::OpenBSD,
            System::NetBSD,
            System::OpenSuse,
            System::Debian,
            System::Arch,
            System::RedHat,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            System::FreeBSD => "FreeBSD",
            System::OpenBSD => "OpenBSD",
            System::NetBSD => "NetBSD",
            System::OpenSuse => "openSUSE",
            System::Debian => "Debian",
            System::Arch => "Arch",
            System::RedHat => "RedHat",
        }
    }
}

impl fmt::Display for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Identification patterns, tried in this order. The first match wins.
static SYSTEM_PATTERNS: LazyLock<Vec<(Regex, System)>> = LazyLock::new(|| {
    [
        (r"(?i)FreeBSD", System::FreeBSD),
        (r"(?i)OpenBSD", System::OpenBSD),
        (r"(?i)NetBSD", System::NetBSD),
        (r"(?i)openSuse", System::OpenSuse),
        (r"(?i)Debian|Ubuntu|Raspbian", System::Debian),
        (r"(?i)Arch|Manjaro", System::Arch),
        (r"(?i)Rocky|Fedora|OpenMandriva", System::RedHat),
    ]
    .into_iter()
    .map(|(pat, sys)| (Regex::new(pat).expect("Invalid regex pattern"), sys))
    .collect()
});

/// Map a free-text OS or distribution name to its family.
pub fn parse_system(name: &str) -> Result<System> {
    for (pattern, system) in SYSTEM_PATTERNS.iter() {
        if pattern.is_match(name) {
            log::debug!(target: LogDomain::Platform.target(), "{:?} identified as {}", name, system);
            return Ok(*system);
        }
    }

    log::warn!(target: LogDomain::Platform.target(), "No platform pattern matches {:?}", name);
    Err(PkmanError::UnknownOs {
        name: name.to_string(),
    })
}

/// Number of identification patterns matching `name`. Real names hit exactly one.
pub(crate) fn count_matches(name: &str) -> usize {
    SYSTEM_PATTERNS
        .iter()
        .filter(|(pattern, _)| pattern.is_match(name))
        .count()
}
