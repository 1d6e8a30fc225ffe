//! Platform identity and search-path resolution

pub mod exe_path;
pub mod identity;
pub mod paths;

use crate::data::PlatformInfo;

/// Resolve the full platform snapshot once, at process start
pub fn detect() -> PlatformInfo {
    let pwd = identity::passwd_record();
    let uts = identity::uname_info();

    let home_dir = identity::home_dir(pwd.as_ref());
    let host_name = identity::host_name(&uts);

    PlatformInfo {
        cache_dir: paths::cache_dir(&home_dir),
        config_dirs: paths::config_dirs(&home_dir),
        data_dirs: paths::data_dirs(&home_dir),
        user_name: identity::user_name(pwd.as_ref()),
        domain_name: identity::domain_name(&host_name),
        user_shell: identity::user_shell(pwd.as_ref()),
        system_name: uts.sysname,
        system_release: uts.release,
        system_version: uts.version,
        system_architecture: uts.machine,
        host_name,
        home_dir,
    }
}
