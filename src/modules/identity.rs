//! Fact lines read straight off the startup PlatformInfo snapshot

use crate::data::PlatformInfo;

use super::FactLine;

/// Resolve an identity item name, or `None` for an unknown selector
pub fn render(item: &str, platform: &PlatformInfo) -> Option<FactLine> {
    let line = match item {
        "title" => FactLine {
            key: String::new(),
            value: format!("{}@{}", platform.user_name, platform.host_name),
        },
        "os" => FactLine {
            key: "OS".to_string(),
            value: platform.system_name.clone(),
        },
        "kernel" => FactLine {
            key: "Kernel".to_string(),
            value: platform.system_release.clone(),
        },
        "version" => FactLine {
            key: "Version".to_string(),
            value: platform.system_version.clone(),
        },
        "arch" => FactLine {
            key: "Arch".to_string(),
            value: platform.system_architecture.clone(),
        },
        "hostname" => FactLine {
            key: "Host".to_string(),
            value: platform.host_name.clone(),
        },
        "domain" => FactLine {
            key: "Domain".to_string(),
            value: platform.domain_name.clone(),
        },
        "shell" => FactLine {
            key: "Shell".to_string(),
            value: platform.user_shell.clone(),
        },
        _ => return None,
    };
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn platform() -> PlatformInfo {
        PlatformInfo {
            home_dir: "/home/test/".to_string(),
            cache_dir: "/home/test/.cache/".to_string(),
            config_dirs: vec!["/home/test/.config/".to_string()],
            data_dirs: vec!["/usr/share/".to_string()],
            user_name: "test".to_string(),
            host_name: "box".to_string(),
            domain_name: String::new(),
            user_shell: "/bin/zsh".to_string(),
            system_name: "Linux".to_string(),
            system_release: "6.8.0".to_string(),
            system_version: "#1 SMP".to_string(),
            system_architecture: "x86_64".to_string(),
        }
    }

    #[test]
    fn title_is_user_at_host_with_no_key() {
        let line = render("title", &platform()).unwrap();
        assert!(line.key.is_empty());
        assert_eq!(line.value, "test@box");
    }

    #[test]
    fn fields_copy_verbatim() {
        let platform = platform();
        assert_eq!(render("os", &platform).unwrap().value, "Linux");
        assert_eq!(render("kernel", &platform).unwrap().value, "6.8.0");
        assert_eq!(render("arch", &platform).unwrap().value, "x86_64");
        assert_eq!(render("shell", &platform).unwrap().value, "/bin/zsh");
    }

    #[test]
    fn empty_domain_renders_empty_not_missing() {
        let line = render("domain", &platform()).unwrap();
        assert_eq!(line.key, "Domain");
        assert_eq!(line.value, "");
    }

    #[test]
    fn unknown_selector_is_none() {
        assert!(render("wallpaper", &platform()).is_none());
    }
}
