use thiserror::Error;

use crate::gpu::runtime::MissingSymbol;
use crate::gpu::safety::CudaStatus;

#[derive(Debug, Error)]
pub enum ArchError {
    #[error(transparent)]
    MissingSymbol(#[from] MissingSymbol),
    #[error("failed to detect CUDA compute capability: {0}")]
    DetectionFailed(CudaStatus),
}
