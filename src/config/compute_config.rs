use thiserror::Error;

use crate::kernels::VECTOR_ADD_ENTRY;

pub const DEFAULT_ELEMENT_COUNT: usize = 1_000_000;
pub const DEFAULT_THREADGROUP_SIZE: u32 = 256;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("element count must be non-zero")]
    ZeroElements,
    #[error("element count {0} does not fit the 32-bit count argument")]
    TooManyElements(usize),
    #[error("thread-group size must be non-zero")]
    ZeroGroupSize,
    #[error("entry point name is empty")]
    EmptyEntryPoint,
}

/// Fixed parameters of one run. Built in code only; nothing is read from
/// files or the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeConfig {
    pub element_count: usize,
    pub threadgroup_size: u32,
    pub entry_point: String,
}

impl Default for ComputeConfig {
    fn default() -> Self {
        Self {
            element_count: DEFAULT_ELEMENT_COUNT,
            threadgroup_size: DEFAULT_THREADGROUP_SIZE,
            entry_point: VECTOR_ADD_ENTRY.to_string(),
        }
    }
}

impl ComputeConfig {
    pub fn with_elements(element_count: usize) -> Self {
        Self { element_count, ..Self::default() }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.element_count == 0 {
            return Err(ConfigError::ZeroElements);
        }
        if u32::try_from(self.element_count).is_err() {
            return Err(ConfigError::TooManyElements(self.element_count));
        }
        if self.threadgroup_size == 0 {
            return Err(ConfigError::ZeroGroupSize);
        }
        if self.entry_point.is_empty() {
            return Err(ConfigError::EmptyEntryPoint);
        }
        Ok(())
    }
}
