use thiserror::Error;

use crate::gpu::safety::CudaStatus;

/// A driver entry point that the loaded library does not export.
#[derive(Debug, Error)]
#[error("CUDA driver missing symbol: {0}")]
pub struct MissingSymbol(pub String);

#[derive(Debug, Error)]
pub enum GpuRuntimeError {
    #[error("CUDA driver not found: {0}")]
    DriverNotFound(String),
    #[error(transparent)]
    MissingSymbol(#[from] MissingSymbol),
    #[error("failed to initialize CUDA driver: {0}")]
    InitFailed(CudaStatus),
    #[error("no CUDA-capable device present")]
    NoDevice,
    #[error("device query failed: {0}")]
    DeviceQueryFailed(CudaStatus),
    #[error("device '{0}' does not support managed (shared) memory")]
    ManagedMemoryUnsupported(String),
    #[error("failed to create CUDA context: {0}")]
    ContextCreateFailed(CudaStatus),
    #[error("failed to bind CUDA context: {0}")]
    ContextBindFailed(CudaStatus),
    #[error("failed to create CUDA stream: {0}")]
    StreamCreateFailed(CudaStatus),
}
