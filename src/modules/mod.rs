//! Per-fact output assembly: key construction, templating, caching
//!
//! Each module turns backend data (or its error) into `FactLine`s. A
//! failed detection still produces a line: the fact's key followed by
//! the diagnostic message, so nothing silently vanishes from the output.

pub mod cpu_usage;
pub mod disk;
pub mod gpu;
pub mod identity;

/// One rendered output line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactLine {
    /// Left-hand label; empty for bare lines like the title
    pub key: String,
    pub value: String,
}
