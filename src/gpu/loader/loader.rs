use libloading::Symbol;
use log::debug;
use std::ffi::{c_char, c_void, CString};
use std::ptr;

use super::CudaLoaderError;
use crate::gpu::nvrtc::NvrtcProgram;
use crate::gpu::runtime::GpuRuntime;
use crate::gpu::safety::error_codes::CUDA_ERROR_NOT_FOUND;
use crate::gpu::safety::{CudaStatus, GpuSafety};

pub type CUmodule = *mut c_void;
pub type CUfunction = *mut c_void;

/// A PTX image loaded into a runtime's context. Unloaded on drop.
pub struct CudaModule<'rt> {
    rt: &'rt GpuRuntime,
    handle: CUmodule,
}

/// A kernel entry point. Only valid while its module is loaded, which the
/// borrow enforces.
pub struct CudaFunction<'m> {
    pub(crate) handle: CUfunction,
    name: String,
    module: &'m CudaModule<'m>,
}

impl<'m> CudaFunction<'m> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn runtime(&self) -> &'m GpuRuntime {
        self.module.rt
    }
}

pub struct CudaLoader<'rt> {
    rt: &'rt GpuRuntime,
}

impl<'rt> CudaLoader<'rt> {
    pub fn new(rt: &'rt GpuRuntime) -> Self {
        Self { rt }
    }

    pub fn load_module(&self, program: &NvrtcProgram) -> Result<CudaModule<'rt>, CudaLoaderError> {
        self.rt.bind()?;

        unsafe {
            let cu_module_load_data: Symbol<unsafe extern "C" fn(*mut CUmodule, *const c_void) -> i32> =
                self.rt.symbol(b"cuModuleLoadData\0")?;

            let mut module: CUmodule = ptr::null_mut();
            let res = cu_module_load_data(&mut module, program.ptx.as_ptr() as *const c_void);
            GpuSafety::check(res, "cuModuleLoadData").map_err(CudaLoaderError::ModuleLoadFailed)?;

            debug!("module loaded ({})", program.arch);
            Ok(CudaModule { rt: self.rt, handle: module })
        }
    }

    /// Looks up `name` in `module`. An absent symbol is reported as
    /// `FunctionNotFound`, never as a load failure.
    pub fn get_function<'m>(
        &self,
        module: &'m CudaModule<'m>,
        name: &str,
    ) -> Result<CudaFunction<'m>, CudaLoaderError> {
        let cname = CString::new(name).map_err(|_| CudaLoaderError::InvalidName(name.into()))?;
        module.rt.bind()?;

        unsafe {
            let cu_get_function: Symbol<
                unsafe extern "C" fn(*mut CUfunction, CUmodule, *const c_char) -> i32,
            > = module.rt.symbol(b"cuModuleGetFunction\0")?;

            let mut func: CUfunction = ptr::null_mut();
            let res = cu_get_function(&mut func, module.handle, cname.as_ptr());

            if res != 0 || func.is_null() {
                let code = if res == 0 { CUDA_ERROR_NOT_FOUND } else { res };
                return Err(CudaLoaderError::FunctionNotFound {
                    name: name.into(),
                    status: CudaStatus(code),
                });
            }

            Ok(CudaFunction { handle: func, name: name.into(), module })
        }
    }
}

impl Drop for CudaModule<'_> {
    fn drop(&mut self) {
        unsafe {
            if let Ok(unload) = self.rt.symbol::<unsafe extern "C" fn(CUmodule) -> i32>(b"cuModuleUnload\0") {
                let _ = GpuSafety::check(unload(self.handle), "cuModuleUnload");
            }
        }
    }
}
