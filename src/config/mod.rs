pub mod compute_config;

pub use compute_config::{ComputeConfig, ConfigError, DEFAULT_ELEMENT_COUNT, DEFAULT_THREADGROUP_SIZE};
