//! Per-backend fact structures

/// One core's tick counters since boot.
///
/// Both fields only ever grow; a usage percentage needs two samples
/// taken over an interval and is derived by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreTimes {
    /// user + nice + system time
    pub in_use: u64,
    /// interrupt + idle time, the denominator baseline
    pub total: u64,
}

/// Usage of one mounted filesystem
#[derive(Debug, Clone)]
pub struct DiskUsage {
    /// Mount path the statistics were queried for
    pub folder: String,
    pub total_bytes: u64,
    pub available_bytes: u64,
    pub used_bytes: u64,
    pub total_inodes: u64,
    pub used_inodes: u64,
    /// Opaque id used to detect two paths on the same filesystem
    pub filesystem_id: u64,
}

/// One display-class PCI adapter
#[derive(Debug, Clone)]
pub struct GpuDevice {
    /// Discovery-order counter, starting at 1
    pub index: u8,
    /// Vendor name as the ID database spells it
    pub vendor_raw: String,
    /// Vendor name after cosmetic rewriting
    pub vendor: String,
    pub name: String,
}
