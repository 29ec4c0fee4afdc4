use log::{info, warn};

use super::{CudaFunction, CudaLoader, CudaLoaderError, CudaModule};
use crate::gpu::arch::{CudaArchDetector, FALLBACK_ARCH};
use crate::gpu::nvrtc::{NvrtcCompiler, NvrtcError};
use crate::gpu::runtime::GpuRuntime;

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Nvrtc(#[from] NvrtcError),
    #[error(transparent)]
    Module(CudaLoaderError),
}

/// Kernel source compiled for one runtime's device and loaded into its
/// context.
pub struct KernelProgram<'rt> {
    loader: CudaLoader<'rt>,
    module: CudaModule<'rt>,
    arch: String,
}

impl<'rt> KernelProgram<'rt> {
    /// Compiles `source` for the device behind `rt`. `label` names the
    /// program in compiler diagnostics.
    pub fn compile(rt: &'rt GpuRuntime, source: &str, label: &str) -> Result<Self, CompileError> {
        let compiler = NvrtcCompiler::new()?;

        let detected = CudaArchDetector::new(rt).arch_flag().unwrap_or_else(|e| {
            warn!("compute capability unknown ({}), targeting {}", e, FALLBACK_ARCH);
            FALLBACK_ARCH.to_string()
        });
        let arch = compiler.resolve_arch(&detected);

        let program = compiler.compile(source, label, &arch)?;
        let loader = CudaLoader::new(rt);
        let module = loader.load_module(&program).map_err(CompileError::Module)?;

        info!("kernel program '{}' ready for {}", label, arch);
        Ok(Self { loader, module, arch })
    }

    pub fn arch(&self) -> &str {
        &self.arch
    }

    pub fn lookup_entry_point(&self, name: &str) -> Result<CudaFunction<'_>, CudaLoaderError> {
        self.loader.get_function(&self.module, name)
    }
}
