//! GPU lines, cached across runs
//!
//! Name resolution through the PCI library is the most expensive
//! detection in the program, so rendered values are replayed from the
//! ValueCache under stable `GPU<n>` keys before the library is probed
//! at all.

use crate::cache::ValueCache;
use crate::collectors::gpu;
use crate::config::GpuConfig;
use crate::format::{parse_format_string, FormatArg};

use super::FactLine;

fn key(config: &GpuConfig, counter: u8, show_counter: bool) -> String {
    if config.key.is_empty() {
        if show_counter {
            format!("GPU {}", counter)
        } else {
            "GPU".to_string()
        }
    } else {
        parse_format_string(&config.key, &[FormatArg::Uint8(counter)])
    }
}

fn cache_key(counter: u8) -> String {
    format!("GPU{}", counter)
}

fn value(config: &GpuConfig, vendor: &str, name: &str) -> String {
    if config.format.is_empty() {
        format!("{} {}", vendor, name)
    } else {
        parse_format_string(
            &config.format,
            &[FormatArg::Str(vendor), FormatArg::Str(name)],
        )
    }
}

/// One line per adapter; a library or enumeration failure is one line
pub fn render(config: &GpuConfig, cache: &mut ValueCache) -> Vec<FactLine> {
    let mut cached = Vec::new();
    for counter in 1..=u8::MAX {
        match cache.get(&cache_key(counter)) {
            Some(value) => cached.push(FactLine {
                key: key(config, counter, true),
                value,
            }),
            None => break,
        }
    }
    if !cached.is_empty() {
        return cached;
    }

    match gpu::collect(Some(config.library.as_str())) {
        Ok(devices) => devices
            .iter()
            .map(|device| {
                let value = value(config, &device.vendor, &device.name);
                cache.put(&cache_key(device.index), &value);
                FactLine {
                    key: key(config, device.index, true),
                    value,
                }
            })
            .collect(),
        Err(err) => vec![FactLine {
            key: key(config, 1, false),
            value: err.to_string(),
        }],
    }
}
