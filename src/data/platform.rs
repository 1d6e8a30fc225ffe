//! Platform identity and search-path aggregate

/// Everything resolved about the machine and user at startup.
///
/// Built once by `platform::detect()` and passed around by reference;
/// nothing mutates it afterwards. `home_dir` and every entry of the
/// path lists end with exactly one `/`.
#[derive(Debug, Clone)]
pub struct PlatformInfo {
    pub home_dir: String,
    pub cache_dir: String,
    /// Config search paths, most specific first
    pub config_dirs: Vec<String>,
    /// Data search paths, most specific first
    pub data_dirs: Vec<String>,
    pub user_name: String,
    pub host_name: String,
    /// Canonical DNS name of the host; empty when resolution yields nothing
    pub domain_name: String,
    pub user_shell: String,
    pub system_name: String,
    pub system_release: String,
    pub system_version: String,
    pub system_architecture: String,
}
