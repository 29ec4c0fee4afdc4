use thiserror::Error;

use crate::gpu::runtime::{GpuRuntimeError, MissingSymbol};
use crate::gpu::safety::CudaStatus;

#[derive(Debug, Error)]
pub enum CudaLoaderError {
    #[error(transparent)]
    MissingSymbol(#[from] MissingSymbol),
    #[error(transparent)]
    Runtime(#[from] GpuRuntimeError),
    #[error("cuModuleLoadData failed: {0}")]
    ModuleLoadFailed(CudaStatus),
    #[error("entry point '{0}' contains an interior NUL byte")]
    InvalidName(String),
    #[error("entry point '{name}' not found in module: {status}")]
    FunctionNotFound { name: String, status: CudaStatus },
}
