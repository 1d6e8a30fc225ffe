pub mod facts;
pub mod platform;

pub use facts::{CoreTimes, DiskUsage, GpuDevice};
pub use platform::PlatformInfo;
