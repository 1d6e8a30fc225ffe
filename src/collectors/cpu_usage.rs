//! Per-core CPU tick counter collection
//!
//! Counters are cumulative since boot; turning them into a percentage
//! takes two samples over an interval and belongs to the caller.

use crate::data::CoreTimes;
use crate::error::Result;

#[cfg(target_os = "linux")]
use crate::error::FetchError;

/// Counter slots per core: user, nice, sys, intr, idle
pub const CPU_STATES: usize = 5;

const CP_USER: usize = 0;
const CP_NICE: usize = 1;
const CP_SYS: usize = 2;
const CP_INTR: usize = 3;
const CP_IDLE: usize = 4;

/// Number of cores described by a raw counter buffer of `len` bytes
pub fn core_count_from_len(len: usize) -> usize {
    len / (CPU_STATES * std::mem::size_of::<u64>())
}

/// Partition a flat per-core state array into busy/baseline buckets
pub fn partition_states(states: &[u64]) -> Vec<CoreTimes> {
    states
        .chunks_exact(CPU_STATES)
        .map(|cp| CoreTimes {
            in_use: cp[CP_USER] + cp[CP_NICE] + cp[CP_SYS],
            total: cp[CP_INTR] + cp[CP_IDLE],
        })
        .collect()
}

/// Busy percentage between two samples, or `None` when no ticks elapsed
pub fn usage_percent(first: &[CoreTimes], second: &[CoreTimes]) -> Option<u8> {
    let mut busy = 0u64;
    let mut baseline = 0u64;
    for (a, b) in first.iter().zip(second) {
        busy += b.in_use.saturating_sub(a.in_use);
        baseline += b.total.saturating_sub(a.total);
    }
    let denominator = busy + baseline;
    if denominator == 0 {
        return None;
    }
    Some(((busy as f64 / denominator as f64) * 100.0).round().min(100.0) as u8)
}

/// Parse per-core `cpuN` rows of a /proc/stat snapshot
///
/// The aggregate `cpu` row is skipped; fields are
/// user nice system idle iowait irq softirq, of which busy takes the
/// first three and the baseline takes irq + idle.
pub fn parse_proc_stat(content: &str) -> Vec<CoreTimes> {
    let mut times = Vec::new();
    for line in content.lines() {
        let Some(rest) = line.strip_prefix("cpu") else {
            continue;
        };
        if !rest.starts_with(|c: char| c.is_ascii_digit()) {
            continue;
        }
        let fields: Vec<u64> = rest
            .split_whitespace()
            .skip(1)
            .map(|v| v.parse().unwrap_or(0))
            .collect();
        if fields.len() < 7 {
            continue;
        }
        times.push(CoreTimes {
            in_use: fields[0] + fields[1] + fields[2],
            total: fields[5] + fields[3],
        });
    }
    times
}

#[cfg(target_os = "linux")]
pub fn collect() -> Result<Vec<CoreTimes>> {
    let content = std::fs::read_to_string("/proc/stat")?;
    let times = parse_proc_stat(&content);
    if times.is_empty() {
        return Err(FetchError::Detection(
            "no per-core counters in /proc/stat".to_string(),
        ));
    }
    Ok(times)
}

#[cfg(target_os = "freebsd")]
pub fn collect() -> Result<Vec<CoreTimes>> {
    let states = fetch_sized_buffer("kern.cp_times")?;
    let core_count = core_count_from_len(states.len() * std::mem::size_of::<u64>());
    debug_assert!(core_count > 0);
    Ok(partition_states(&states))
}

/// Two-call size-then-fetch sysctl protocol, hidden behind one owned buffer
///
/// The first call with a null destination reports the required size; the
/// second fills an exactly-sized allocation. The two failure modes differ
/// by message text only.
#[cfg(target_os = "freebsd")]
fn fetch_sized_buffer(name: &str) -> Result<Vec<u64>> {
    use std::ffi::CString;

    use crate::error::FetchError;

    let name_c = CString::new(name)
        .map_err(|_| FetchError::Parse(format!("invalid sysctl name: {}", name)))?;

    let mut needed: libc::size_t = 0;
    let sized = unsafe {
        libc::sysctlbyname(
            name_c.as_ptr(),
            std::ptr::null_mut(),
            &mut needed,
            std::ptr::null(),
            0,
        )
    };
    if sized != 0 {
        return Err(FetchError::Detection(format!(
            "sysctlbyname({}, NULL) failed",
            name
        )));
    }

    let mut values = vec![0u64; needed / std::mem::size_of::<u64>()];
    let fetched = unsafe {
        libc::sysctlbyname(
            name_c.as_ptr(),
            values.as_mut_ptr() as *mut libc::c_void,
            &mut needed,
            std::ptr::null(),
            0,
        )
    };
    if fetched != 0 {
        return Err(FetchError::Detection(format!(
            "sysctlbyname({}) failed",
            name
        )));
    }
    values.truncate(needed / std::mem::size_of::<u64>());
    Ok(values)
}

#[cfg(not(any(target_os = "linux", target_os = "freebsd")))]
pub fn collect() -> Result<Vec<CoreTimes>> {
    Err(crate::error::FetchError::Detection(
        "CPU tick counters are not supported on this platform".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_count_matches_buffer_size() {
        for cores in 1..=8usize {
            let len = cores * CPU_STATES * std::mem::size_of::<u64>();
            assert_eq!(core_count_from_len(len), cores);
        }
    }

    #[test]
    fn partition_buckets_user_nice_sys_against_intr_idle() {
        // user nice sys intr idle, two cores
        let states = [10, 2, 5, 1, 100, 20, 0, 10, 3, 200];
        let times = partition_states(&states);
        assert_eq!(times.len(), 2);
        assert_eq!(times[0], CoreTimes { in_use: 17, total: 101 });
        assert_eq!(times[1], CoreTimes { in_use: 30, total: 203 });
    }

    #[test]
    fn partition_ignores_trailing_partial_core() {
        let states = [1, 1, 1, 1, 1, 9, 9];
        assert_eq!(partition_states(&states).len(), 1);
    }

    #[test]
    fn usage_percent_over_two_samples() {
        let first = [CoreTimes { in_use: 100, total: 900 }];
        let second = [CoreTimes { in_use: 130, total: 970 }];
        // 30 busy ticks out of 100 elapsed
        assert_eq!(usage_percent(&first, &second), Some(30));
    }

    #[test]
    fn usage_percent_without_elapsed_ticks_is_none() {
        let sample = [CoreTimes { in_use: 5, total: 5 }];
        assert_eq!(usage_percent(&sample, &sample), None);
    }

    #[test]
    fn proc_stat_rows_parse_per_core_only() {
        let content = "\
cpu  100 20 50 1000 30 7 3 0 0 0
cpu0 60 10 30 500 15 4 2 0 0 0
cpu1 40 10 20 500 15 3 1 0 0 0
intr 12345
ctxt 67890
";
        let times = parse_proc_stat(content);
        assert_eq!(times.len(), 2);
        assert_eq!(times[0], CoreTimes { in_use: 100, total: 504 });
        assert_eq!(times[1], CoreTimes { in_use: 70, total: 503 });
    }
}
