use thiserror::Error;

use crate::config::ConfigError;
use crate::gpu::dispatch::DispatchError;
use crate::gpu::loader::{CompileError, CudaLoaderError};
use crate::gpu::memory::GpuMemoryError;
use crate::gpu::pipeline::PipelineError;
use crate::gpu::runtime::GpuRuntimeError;
use crate::report::VerificationError;

/// Every way a run can fail. Nothing is retried; the binary reports the
/// stage and exits.
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("no usable compute device: {0}")]
    NoDeviceFound(#[from] GpuRuntimeError),
    #[error("kernel compilation failed: {0}")]
    CompileError(#[from] CompileError),
    #[error("entry point '{name}' not found: {source}")]
    EntryPointNotFound {
        name: String,
        #[source]
        source: CudaLoaderError,
    },
    #[error("pipeline construction failed: {0}")]
    PipelineBuildError(#[from] PipelineError),
    #[error("buffer allocation failed: {0}")]
    AllocationError(#[from] GpuMemoryError),
    #[error("submission failed: {0}")]
    SubmissionError(#[from] DispatchError),
    #[error("output verification failed: {0}")]
    Verification(#[from] VerificationError),
    #[error("writing the report failed: {0}")]
    Report(#[from] std::io::Error),
}

impl From<CudaLoaderError> for ComputeError {
    fn from(e: CudaLoaderError) -> Self {
        if let CudaLoaderError::FunctionNotFound { name, .. } = &e {
            let name = name.clone();
            return ComputeError::EntryPointNotFound { name, source: e };
        }
        ComputeError::CompileError(CompileError::Module(e))
    }
}

impl ComputeError {
    pub fn stage(&self) -> &'static str {
        match self {
            ComputeError::Config(_) => "config",
            ComputeError::NoDeviceFound(_) => "device",
            ComputeError::CompileError(_) => "compile",
            ComputeError::EntryPointNotFound { .. } => "entry-point",
            ComputeError::PipelineBuildError(_) => "pipeline",
            ComputeError::AllocationError(_) => "allocation",
            ComputeError::SubmissionError(_) => "submission",
            ComputeError::Verification(_) => "verification",
            ComputeError::Report(_) => "report",
        }
    }

    /// True for failures before anything was submitted to the device.
    pub fn is_setup(&self) -> bool {
        matches!(
            self,
            ComputeError::Config(_)
                | ComputeError::NoDeviceFound(_)
                | ComputeError::CompileError(_)
                | ComputeError::EntryPointNotFound { .. }
                | ComputeError::PipelineBuildError(_)
                | ComputeError::AllocationError(_)
        )
    }
}
