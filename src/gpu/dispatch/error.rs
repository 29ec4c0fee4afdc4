use thiserror::Error;

use crate::gpu::launcher::LaunchError;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("thread-group size must be non-zero")]
    InvalidGroupSize,
    #[error("dispatch must cover at least one element")]
    EmptyGrid,
    #[error("{count} elements in groups of {group_size} exceed the grid limit")]
    GridTooLarge { count: usize, group_size: u32 },
    #[error("invalid binding at slot {slot}: {reason}")]
    InvalidBinding { slot: usize, reason: &'static str },
    #[error("slot {0} is bound twice")]
    DuplicateBinding(usize),
    #[error("slot {0} has no buffer bound")]
    UnboundSlot(usize),
    #[error("the command already holds a dispatch")]
    AlreadyEncoded,
    #[error("encoding ended without a dispatch")]
    NotEncoded,
    #[error("pipeline mismatch: {0}")]
    PipelineMismatch(String),
    #[error(transparent)]
    Launch(#[from] LaunchError),
}

impl DispatchError {
    /// True when the device itself failed rather than the command.
    pub fn is_device_lost(&self) -> bool {
        matches!(self, DispatchError::Launch(LaunchError::DeviceLost(_)))
    }
}
