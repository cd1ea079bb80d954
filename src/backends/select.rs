use super::apt::AptManager;
use super::command_exec::ExecLimits;
use super::dnf::DnfManager;
use super::pacman::PacmanManager;
use super::pkg::FreeBsdPkgManager;
use super::pkg_info::OpenBsdPkgManager;
use super::zypper::ZypperManager;
use super::{BackendKind, PkgManager};
use crate::config::settings::Settings;
use crate::error::{PkmanError, Result};
use crate::logging::LogDomain;
use crate::platform::{self, System};

/// The backend automatic selection uses for `system`.
///
/// The BSD families have backends, but they are only reachable by naming
/// them explicitly.
pub fn backend_kind_for(system: System) -> Result<BackendKind> {
    match system {
        System::OpenSuse => Ok(BackendKind::Zypper),
        System::Debian => Ok(BackendKind::Apt),
        System::RedHat => Ok(BackendKind::Dnf),
        System::Arch => Ok(BackendKind::Pacman),
        System::FreeBSD | System::OpenBSD | System::NetBSD => {
            Err(PkmanError::UnsupportedPlatform(system))
        }
    }
}

/// Construct the backend named by `kind`. Each backend opens its own
/// history handle.
pub fn create_backend(kind: BackendKind, settings: &Settings) -> Result<Box<dyn PkgManager>> {
    log::debug!(target: LogDomain::PkgManager.target(), "Creating {} backend", kind);

    Ok(match kind {
        BackendKind::Apt => Box::new(AptManager::open(settings)?),
        BackendKind::Dnf => Box::new(DnfManager::open(settings)?),
        BackendKind::Pacman => Box::new(PacmanManager::open(settings)?),
        BackendKind::Zypper => Box::new(ZypperManager::open(settings)?),
        BackendKind::Pkg => Box::new(FreeBsdPkgManager::open(settings)?),
        BackendKind::PkgInfo => Box::new(OpenBsdPkgManager::open(settings)?),
    })
}

pub fn backend_for_system(system: System, settings: &Settings) -> Result<Box<dyn PkgManager>> {
    let kind = backend_kind_for(system).inspect_err(|e| {
        log::warn!(target: LogDomain::PkgManager.target(), "{}", e);
    })?;
    create_backend(kind, settings)
}

/// Pick and construct the backend for an operating system name.
pub fn get_pkg_manager(os_name: &str, settings: &Settings) -> Result<Box<dyn PkgManager>> {
    backend_for_system(platform::parse_system(os_name)?, settings)
}

/// Detect the running system and construct its backend.
pub fn detect_pkg_manager(settings: &Settings) -> Result<Box<dyn PkgManager>> {
    let (name, version) = platform::detect::detect_os_within(ExecLimits::from(settings))?;
    log::info!(target: LogDomain::PkgManager.target(), "Detected {} {}", name, version);
    get_pkg_manager(&name, settings)
}

/// An explicit backend if one was requested, otherwise detection.
pub fn resolve(explicit: Option<BackendKind>, settings: &Settings) -> Result<Box<dyn PkgManager>> {
    match explicit {
        Some(kind) => create_backend(kind, settings),
        None => detect_pkg_manager(settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn settings(dir: &TempDir) -> Settings {
        Settings::with_database(dir.path().join("pkman.db"))
    }

    #[test]
    fn test_linux_families_map_to_backends() {
        let dir = TempDir::new().unwrap();
        let settings = settings(&dir);

        for (name, kind) in [
            ("Debian GNU/Linux", BackendKind::Apt),
            ("Ubuntu", BackendKind::Apt),
            ("Raspbian GNU/Linux", BackendKind::Apt),
            ("Fedora Linux", BackendKind::Dnf),
            ("Rocky Linux", BackendKind::Dnf),
            ("Arch Linux", BackendKind::Pacman),
            ("Manjaro Linux", BackendKind::Pacman),
            ("openSUSE Tumbleweed", BackendKind::Zypper),
        ] {
            let manager = get_pkg_manager(name, &settings).unwrap();
            assert_eq!(manager.kind(), kind, "{name}");
        }
    }

    #[test]
    fn test_bsd_is_unsupported_by_name() {
        let dir = TempDir::new().unwrap();
        let settings = settings(&dir);

        for (name, display) in [
            ("FreeBSD", "FreeBSD"),
            ("OpenBSD", "OpenBSD"),
            ("NetBSD", "NetBSD"),
        ] {
            let err = get_pkg_manager(name, &settings).err().unwrap();
            assert!(matches!(err, PkmanError::UnsupportedPlatform(_)));
            assert!(err.to_string().contains(display), "{err}");
        }
    }

    #[test]
    fn test_family_level_selection() {
        let dir = TempDir::new().unwrap();
        let settings = settings(&dir);

        let manager = backend_for_system(System::RedHat, &settings).unwrap();
        assert_eq!(manager.kind(), BackendKind::Dnf);
        assert!(backend_for_system(System::FreeBSD, &settings).is_err());
    }

    #[test]
    fn test_unknown_os() {
        let dir = TempDir::new().unwrap();
        let err = get_pkg_manager("Haiku", &settings(&dir)).err().unwrap();
        assert!(err.is_unknown_os());
    }

    #[test]
    fn test_explicit_backend_reaches_bsd_tools() {
        let dir = TempDir::new().unwrap();
        let settings = settings(&dir);

        let pkg = resolve(Some(BackendKind::Pkg), &settings).unwrap();
        assert_eq!(pkg.kind(), BackendKind::Pkg);
        let pkg_info = resolve(Some(BackendKind::PkgInfo), &settings).unwrap();
        assert_eq!(pkg_info.kind(), BackendKind::PkgInfo);
    }

    #[test]
    fn test_stub_operations_name_their_backend() {
        let dir = TempDir::new().unwrap();
        let manager = create_backend(BackendKind::Zypper, &settings(&dir)).unwrap();

        for err in [
            manager.update().unwrap_err(),
            manager.upgrade().unwrap_err(),
            manager.clean().unwrap_err(),
            manager.remove(&[]).unwrap_err(),
            manager.list_installed().unwrap_err(),
            manager.last_update().unwrap_err(),
        ] {
            assert!(err.is_not_implemented());
            assert!(err.to_string().ends_with("for zypper"), "{err}");
        }
    }
}
