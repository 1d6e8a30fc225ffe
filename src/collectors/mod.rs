//! Detection backends, one module per fact family

pub mod cpu_usage;
pub mod disk;
pub mod gpu;
