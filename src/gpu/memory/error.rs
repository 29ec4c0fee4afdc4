use thiserror::Error;

use crate::gpu::runtime::{GpuRuntimeError, MissingSymbol};
use crate::gpu::safety::CudaStatus;

#[derive(Debug, Error)]
pub enum GpuMemoryError {
    #[error(transparent)]
    MissingSymbol(#[from] MissingSymbol),
    #[error(transparent)]
    Runtime(#[from] GpuRuntimeError),
    #[error("buffer must hold at least one element")]
    EmptyBuffer,
    #[error("{count} elements of {element_size} bytes exceed the addressable size")]
    TooLarge { count: usize, element_size: usize },
    #[error("byte length {byte_length} is not a multiple of the element size {element_size}")]
    Misaligned { byte_length: usize, element_size: usize },
    #[error("cuMemAllocManaged({bytes} bytes) failed: {status}")]
    AllocationFailed { bytes: usize, status: CudaStatus },
    #[error("buffer holds {found} elements, expected {expected}")]
    LengthMismatch { expected: usize, found: usize },
    #[error("count buffer holds {found}, buffers hold {expected} elements")]
    CountMismatch { expected: usize, found: usize },
    #[error("count buffer must hold exactly one element, holds {0}")]
    ScalarShape(usize),
    #[error("buffers were allocated on different device contexts")]
    ContextMismatch,
}
