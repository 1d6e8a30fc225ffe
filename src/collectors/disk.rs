//! Filesystem usage collection via statvfs

use std::ffi::CString;

use tracing::debug;

use crate::data::DiskUsage;
use crate::error::{FetchError, Result};
use crate::utils::parsing::split_list;

/// Query filesystem statistics for one mount path
pub fn collect_for_path(folder: &str) -> Result<DiskUsage> {
    let path = CString::new(folder)
        .map_err(|_| FetchError::Parse(format!("invalid folder path: {}", folder)))?;

    let mut stat: libc::statvfs = unsafe { std::mem::zeroed() };
    if unsafe { libc::statvfs(path.as_ptr(), &mut stat) } != 0 {
        return Err(FetchError::Detection(format!(
            "statvfs(\"{}\") failed",
            folder
        )));
    }

    let frsize = stat.f_frsize as u64;
    let total_bytes = (stat.f_blocks as u64).wrapping_mul(frsize);
    let available_bytes = (stat.f_bfree as u64).wrapping_mul(frsize);

    Ok(DiskUsage {
        folder: folder.to_string(),
        total_bytes,
        available_bytes,
        used_bytes: total_bytes.saturating_sub(available_bytes),
        total_inodes: stat.f_files as u64,
        used_inodes: (stat.f_files as u64).saturating_sub(stat.f_ffree as u64),
        filesystem_id: stat.f_fsid as u64,
    })
}

/// Default selection policy: probe `/` and `/home`
///
/// Both failing collapses into one combined error; `/home` is reported
/// separately only when it sits on a different filesystem than `/`.
pub fn collect_default() -> Result<Vec<DiskUsage>> {
    let root = collect_for_path("/");
    let home = collect_for_path("/home");

    if root.is_err() && home.is_err() {
        return Err(FetchError::Detection(
            "statvfs failed for both / and /home".to_string(),
        ));
    }
    Ok(dedup_default(root.ok(), home.ok()))
}

/// Keep `/` first and drop `/home` when it shares the root filesystem id
pub fn dedup_default(root: Option<DiskUsage>, home: Option<DiskUsage>) -> Vec<DiskUsage> {
    let root_fsid = root.as_ref().map(|fs| fs.filesystem_id);
    let mut reports = Vec::new();
    if let Some(fs) = root {
        reports.push(fs);
    }
    if let Some(fs) = home {
        if root_fsid != Some(fs.filesystem_id) {
            reports.push(fs);
        }
    }
    reports
}

/// Resolve each folder of a `:`-delimited list independently, in order
///
/// One folder failing does not abort the rest; each result is reported
/// under the folder string the user configured.
pub fn collect_for_list(folders: &str) -> Vec<(String, Result<DiskUsage>)> {
    split_list(folders, ':')
        .into_iter()
        .map(|folder| {
            let expanded = shellexpand::tilde(&folder).to_string();
            let result = collect_for_path(&expanded);
            if result.is_err() {
                debug!("disk probe failed for {}", expanded);
            }
            (folder, result)
        })
        .collect()
}

/// Used-space percentage, rounded; a zero total reports 0% instead of dividing
pub fn usage_percent(used_bytes: u64, total_bytes: u64) -> u8 {
    if total_bytes == 0 {
        return 0;
    }
    ((used_bytes as f64 / total_bytes as f64) * 100.0)
        .round()
        .min(100.0) as u8
}
