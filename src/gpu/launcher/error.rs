use thiserror::Error;

use crate::gpu::runtime::{GpuRuntimeError, MissingSymbol};
use crate::gpu::safety::CudaStatus;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error(transparent)]
    MissingSymbol(#[from] MissingSymbol),
    #[error(transparent)]
    Runtime(#[from] GpuRuntimeError),
    #[error("kernel launch failed: {0}")]
    LaunchFailed(CudaStatus),
    #[error("device lost during execution: {0}")]
    DeviceLost(CudaStatus),
    #[error("waiting for completion failed: {0}")]
    SyncFailed(CudaStatus),
}

impl LaunchError {
    /// Classifies a failed driver call made while work was in flight.
    pub(crate) fn from_status(status: CudaStatus, while_waiting: bool) -> Self {
        if crate::gpu::safety::GpuSafety::is_device_lost(status.code()) {
            LaunchError::DeviceLost(status)
        } else if while_waiting {
            LaunchError::SyncFailed(status)
        } else {
            LaunchError::LaunchFailed(status)
        }
    }
}
