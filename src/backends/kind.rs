use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// The external tools pkman knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Apt,
    Dnf,
    Pacman,
    Zypper,
    Pkg,
    PkgInfo,
}

impl BackendKind {
    pub fn all() -> &'static [BackendKind] {
        &[
            BackendKind::Apt,
            BackendKind::Dnf,
            BackendKind::Pacman,
            BackendKind::Zypper,
            BackendKind::Pkg,
            BackendKind::PkgInfo,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            BackendKind::Apt => "apt",
            BackendKind::Dnf => "dnf",
            BackendKind::Pacman => "pacman",
            BackendKind::Zypper => "zypper",
            BackendKind::Pkg => "pkg",
            BackendKind::PkgInfo => "pkg_info",
        }
    }

    /// Absolute path of the tool used for searching.
    pub fn binary(&self) -> &'static str {
        match self {
            BackendKind::Apt => "/usr/bin/apt-cache",
            BackendKind::Dnf => "/usr/bin/dnf",
            BackendKind::Pacman => "/usr/bin/pacman",
            BackendKind::Zypper => "/usr/bin/zypper",
            BackendKind::Pkg => "/usr/sbin/pkg",
            BackendKind::PkgInfo => "/usr/sbin/pkg_info",
        }
    }

    /// Arguments placed before the query string.
    pub fn search_args(&self) -> &'static [&'static str] {
        match self {
            BackendKind::Apt | BackendKind::Dnf | BackendKind::Pkg => &["search"],
            BackendKind::Pacman => &["-Ss"],
            BackendKind::Zypper => &["se"],
            BackendKind::PkgInfo => &["-Q"],
        }
    }

    pub fn is_available(&self) -> bool {
        which::which(Path::new(self.binary())).is_ok()
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "apt" | "apt-cache" => Ok(BackendKind::Apt),
            "dnf" => Ok(BackendKind::Dnf),
            "pacman" => Ok(BackendKind::Pacman),
            "zypper" => Ok(BackendKind::Zypper),
            "pkg" => Ok(BackendKind::Pkg),
            "pkg_info" | "pkg-info" => Ok(BackendKind::PkgInfo),
            other => Err(format!(
                "Unknown backend '{}'. Valid backends: {}",
                other,
                BackendKind::all()
                    .iter()
                    .map(|k| k.name())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}
