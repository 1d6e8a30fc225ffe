//! CPU usage line
//!
//! The backend only exposes cumulative tick counters, so this module
//! takes two samples separated by a short interval and renders the busy
//! fraction between them.

use std::thread;
use std::time::Duration;

use crate::collectors::cpu_usage::{self, usage_percent};
use crate::config::CpuConfig;
use crate::error::Result;
use crate::format::{parse_format_string, FormatArg};

use super::FactLine;

fn key(config: &CpuConfig) -> String {
    if config.key.is_empty() {
        "CPU Usage".to_string()
    } else {
        config.key.clone()
    }
}

fn value(config: &CpuConfig, percent: u8) -> String {
    if config.format.is_empty() {
        format!("{}%", percent)
    } else {
        parse_format_string(&config.format, &[FormatArg::Uint8(percent)])
    }
}

fn sample_percent(sample_ms: u64) -> Result<u8> {
    let first = cpu_usage::collect()?;
    thread::sleep(Duration::from_millis(sample_ms));
    let second = cpu_usage::collect()?;
    Ok(usage_percent(&first, &second).unwrap_or(0))
}

pub fn render(config: &CpuConfig) -> FactLine {
    FactLine {
        key: key(config),
        value: match sample_percent(config.sample_ms) {
            Ok(percent) => value(config, percent),
            Err(err) => err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_is_a_percentage() {
        assert_eq!(value(&CpuConfig::default(), 42), "42%");
    }

    #[test]
    fn template_binds_the_percentage() {
        let config = CpuConfig {
            format: "busy %1 of 100".to_string(),
            ..CpuConfig::default()
        };
        assert_eq!(value(&config, 42), "busy 42 of 100");
    }

    #[test]
    fn key_override_wins() {
        let config = CpuConfig {
            key: "Load".to_string(),
            ..CpuConfig::default()
        };
        assert_eq!(key(&config), "Load");
        assert_eq!(key(&CpuConfig::default()), "CPU Usage");
    }
}
