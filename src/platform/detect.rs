//! Host identification via `uname` and the os-release file.

use crate::backends::command_exec::{ExecLimits, run_command};
use crate::error::{PkmanError, Result};
use crate::logging::LogDomain;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::Command;
use std::sync::LazyLock;

pub const UNAME_PATH: &str = "/usr/bin/uname";
pub const OS_RELEASE_PATH: &str = "/etc/os-release";

// Quoted values may carry escaped quotes and anything after the closing quote.
static RELEASE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(\w+)=(?:"((?:[^"\\]|\\.)*)"|'([^']*)'|([^"'\s]*)\s*$)"#)
        .expect("Invalid regex pattern")
});

static ESCAPED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\\(.)"#).expect("Invalid regex pattern"));

/// Return `(name, version)` of the running system.
///
/// On Linux kernels this is the distribution name and version taken from the
/// release file, elsewhere the kernel name and release.
pub fn detect_os() -> Result<(String, String)> {
    detect_os_within(ExecLimits::default())
}

/// [`detect_os`] with explicit bounds on running `uname`.
pub fn detect_os_within(limits: ExecLimits) -> Result<(String, String)> {
    detect_os_with(Path::new(UNAME_PATH), Path::new(OS_RELEASE_PATH), limits)
}

pub fn detect_os_with(
    uname: &Path,
    release_file: &Path,
    limits: ExecLimits,
) -> Result<(String, String)> {
    let command = format!("{} -sr", uname.display());
    let mut cmd = Command::new(uname);
    cmd.arg("-sr");

    let output = run_command(&mut cmd, limits).map_err(|e| {
        log::error!(target: LogDomain::Platform.target(), "Cannot run {}: {}", command, e);
        match e {
            PkmanError::SystemCommandFailed { reason, .. } => PkmanError::DetectionFailed {
                command: command.clone(),
                reason,
            },
            other => other,
        }
    })?;

    if !output.status.success() {
        return Err(PkmanError::DetectionFailed {
            command,
            reason: format!("exited with {}", output.status),
        });
    }

    let (kernel, release) = split_uname(&output.stdout_lossy())?;

    if kernel.eq_ignore_ascii_case("linux") {
        log::debug!(target: LogDomain::Platform.target(), "Linux kernel {}, reading {}", release, release_file.display());
        parse_release_file(release_file)
    } else {
        Ok((kernel, release))
    }
}

/// Split `uname -sr` output into kernel name and release.
pub fn split_uname(output: &str) -> Result<(String, String)> {
    let fields: Vec<&str> = output.split_whitespace().collect();
    match fields.as_slice() {
        [name, release] => Ok((name.to_string(), release.to_string())),
        _ => Err(PkmanError::UnameParse {
            output: output.trim_end().to_string(),
        }),
    }
}

/// Parse a `KEY="VALUE"` release file into `(name, version)`.
pub fn parse_release_file(path: &Path) -> Result<(String, String)> {
    let file = File::open(path).map_err(|e| PkmanError::ReleaseFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_release_lines(BufReader::new(file)).map_err(|e| PkmanError::ReleaseFile {
        path: path.to_path_buf(),
        source: e,
    })
}

pub fn parse_release_str(content: &str) -> (String, String) {
    // Reading from a byte slice cannot fail.
    parse_release_lines(content.as_bytes()).unwrap_or_default()
}

fn parse_release_lines<R: BufRead>(reader: R) -> std::io::Result<(String, String)> {
    let mut name = String::new();
    let mut version = String::new();

    for line in reader.lines() {
        let line = line?;
        let Some(caps) = RELEASE_LINE.captures(line.trim()) else {
            continue;
        };

        let value = match caps.get(2) {
            Some(quoted) => ESCAPED.replace_all(quoted.as_str(), "$1").into_owned(),
            None => caps
                .get(3)
                .or_else(|| caps.get(4))
                .map_or(String::new(), |m| m.as_str().to_string()),
        };

        match caps[1].to_lowercase().as_str() {
            "name" => name = value,
            "version_id" if version.is_empty() => version = value,
            "version" => version = value,
            _ => {}
        }
    }

    Ok((name, version))
}
