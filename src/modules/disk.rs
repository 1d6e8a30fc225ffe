//! Disk usage lines

use crate::collectors::disk::{self, usage_percent};
use crate::config::DiskConfig;
use crate::data::DiskUsage;
use crate::format::{parse_format_string, FormatArg};

use super::FactLine;

const GIB: u64 = 1024 * 1024 * 1024;

fn key(config: &DiskConfig, folder: &str, show_folder: bool) -> String {
    if config.key.is_empty() {
        if show_folder {
            format!("Disk ({})", folder)
        } else {
            "Disk".to_string()
        }
    } else {
        parse_format_string(&config.key, &[FormatArg::Str(folder)])
    }
}

fn value(config: &DiskConfig, fs: &DiskUsage) -> String {
    let used = fs.used_bytes / GIB;
    let total = fs.total_bytes / GIB;
    let percentage = usage_percent(fs.used_bytes, fs.total_bytes);

    if config.format.is_empty() {
        format!("{}GB / {}GB ({}%)", used, total, percentage)
    } else {
        parse_format_string(
            &config.format,
            &[
                FormatArg::Uint(used),
                FormatArg::Uint(total),
                FormatArg::Uint(fs.used_inodes),
                FormatArg::Uint8(percentage),
            ],
        )
    }
}

/// One line per reported filesystem, or a single error line
pub fn render(config: &DiskConfig) -> Vec<FactLine> {
    if config.folders.is_empty() {
        match disk::collect_default() {
            Ok(reports) => reports
                .iter()
                .map(|fs| FactLine {
                    key: key(config, &fs.folder, true),
                    value: value(config, fs),
                })
                .collect(),
            Err(err) => vec![FactLine {
                key: key(config, "/", false),
                value: err.to_string(),
            }],
        }
    } else {
        disk::collect_for_list(&config.folders)
            .into_iter()
            .map(|(folder, result)| FactLine {
                key: key(config, &folder, true),
                value: match result {
                    Ok(fs) => value(config, &fs),
                    Err(err) => err.to_string(),
                },
            })
            .collect()
    }
}
