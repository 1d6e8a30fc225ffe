//! Search-path resolution for config, data and cache directories
//!
//! Each list walks a fixed precedence chain, most specific first:
//! environment-supplied directories, then home-relative conventions, then
//! system-wide fallbacks. Order encodes override precedence for anything
//! that scans these paths; duplicates are left in place and callers must
//! tolerate probing a directory twice.

use std::env;

use super::exe_path;
use crate::utils::parsing::{split_list, with_trailing_slash};

fn add_absolute(dirs: &mut Vec<String>, path: &str) {
    if path.starts_with('/') {
        dirs.push(with_trailing_slash(path));
    }
}

fn add_home(dirs: &mut Vec<String>, home: &str, subdir: &str) {
    dirs.push(format!("{}{}", home, subdir));
}

/// Append every non-empty absolute segment of a `:`-separated list
pub fn add_list(dirs: &mut Vec<String>, value: &str) {
    for segment in split_list(value, ':') {
        add_absolute(dirs, &segment);
    }
}

fn add_env_list(dirs: &mut Vec<String>, var: &str) {
    if let Ok(value) = env::var(var) {
        add_list(dirs, &value);
    }
}

pub fn cache_dir(home: &str) -> String {
    match env::var("XDG_CACHE_HOME") {
        Ok(dir) if !dir.trim().is_empty() => with_trailing_slash(&dir),
        _ => format!("{}.cache/", home),
    }
}

pub fn config_dirs(home: &str) -> Vec<String> {
    let mut dirs = Vec::new();

    add_env_list(&mut dirs, "XDG_CONFIG_HOME");
    add_home(&mut dirs, home, ".config/");

    #[cfg(target_os = "macos")]
    {
        add_home(&mut dirs, home, "Library/Preferences/");
        add_home(&mut dirs, home, "Library/Application Support/");
    }

    add_home(&mut dirs, home, "");
    add_env_list(&mut dirs, "XDG_CONFIG_DIRS");

    #[cfg(not(target_os = "macos"))]
    add_absolute(&mut dirs, "/etc/xdg/");

    add_absolute(&mut dirs, "/etc/");
    add_absolute(&mut dirs, "/usr/local/etc/");
    dirs
}

pub fn data_dirs(home: &str) -> Vec<String> {
    let mut dirs = Vec::new();

    add_env_list(&mut dirs, "XDG_DATA_HOME");
    add_home(&mut dirs, home, ".local/share/");

    if let Some(share) = exe_share_dir() {
        add_absolute(&mut dirs, &share);
    }

    #[cfg(target_os = "macos")]
    add_home(&mut dirs, home, "Library/Application Support/");

    add_home(&mut dirs, home, "");
    add_env_list(&mut dirs, "XDG_DATA_DIRS");
    add_absolute(&mut dirs, "/usr/local/share/");
    add_absolute(&mut dirs, "/usr/share/");
    dirs
}

/// Directory two levels above the running executable, plus `share`
///
/// `None` when the executable path cannot be resolved; the caller skips
/// the entry rather than treating that as an error.
fn exe_share_dir() -> Option<String> {
    let exe = exe_path::current_exe_path()?;
    let prefix = exe.parent()?.parent()?;
    Some(format!("{}/share", prefix.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_list_keeps_order_and_skips_empty_segments() {
        let mut dirs = Vec::new();
        add_list(&mut dirs, "/a::/b");
        assert_eq!(dirs, vec!["/a/", "/b/"]);
    }

    #[test]
    fn add_list_skips_relative_segments() {
        let mut dirs = Vec::new();
        add_list(&mut dirs, "/abs:relative/path:/other");
        assert_eq!(dirs, vec!["/abs/", "/other/"]);
    }

    #[test]
    fn config_dirs_rank_home_before_system_fallbacks() {
        let dirs = config_dirs("/home/test/");
        let home_config = dirs
            .iter()
            .position(|d| d == "/home/test/.config/")
            .expect("home config dir present");
        let etc = dirs
            .iter()
            .position(|d| d == "/etc/")
            .expect("system fallback present");
        assert!(home_config < etc);
    }

    #[test]
    fn data_dirs_always_contain_builtin_fallbacks() {
        let dirs = data_dirs("/home/test/");
        assert!(dirs.contains(&"/home/test/.local/share/".to_string()));
        assert!(dirs.contains(&"/usr/local/share/".to_string()));
        assert!(dirs.contains(&"/usr/share/".to_string()));
    }

    #[test]
    fn every_entry_is_slash_terminated() {
        for dir in config_dirs("/home/test/")
            .into_iter()
            .chain(data_dirs("/home/test/"))
        {
            assert!(dir.ends_with('/'), "{} lacks trailing slash", dir);
        }
    }
}
