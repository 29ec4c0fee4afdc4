use thiserror::Error;

use crate::gpu::runtime::{GpuRuntimeError, MissingSymbol};
use crate::gpu::safety::CudaStatus;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    MissingSymbol(#[from] MissingSymbol),
    #[error(transparent)]
    Runtime(#[from] GpuRuntimeError),
    #[error("kernel '{0}' has a null function handle")]
    NullFunction(String),
    #[error("kernel '{0}' must take at least one argument")]
    InvalidArity(String),
    #[error("attribute query for kernel '{name}' failed: {status}")]
    AttributeQueryFailed { name: String, status: CudaStatus },
    #[error("kernel '{0}' cannot be launched with any thread-group size")]
    Unlaunchable(String),
}
