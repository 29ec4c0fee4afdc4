use libloading::Symbol;
use log::trace;
use std::ffi::c_void;
use std::ptr;

use super::LaunchError;
use crate::gpu::pipeline::ComputePipeline;
use crate::gpu::runtime::context::{CUcontext, CUstream};
use crate::gpu::runtime::GpuRuntime;
use crate::gpu::safety::GpuSafety;

type LaunchFn = unsafe extern "C" fn(
    cufunc: *mut c_void,
    grid_x: u32, grid_y: u32, grid_z: u32,
    block_x: u32, block_y: u32, block_z: u32,
    shared_mem: u32,
    stream: CUstream,
    args: *mut *mut c_void,
    extra: *mut *mut c_void,
) -> i32;

pub struct GpuLauncher<'rt> {
    rt: &'rt GpuRuntime,
}

impl<'rt> GpuLauncher<'rt> {
    pub fn new(rt: &'rt GpuRuntime) -> Self {
        Self { rt }
    }

    /// Enqueues one kernel launch on the runtime stream. Returns as soon as
    /// the launch is queued; pair with `synchronize`.
    pub fn launch(
        &self,
        pipeline: &ComputePipeline<'_>,
        grid: (u32, u32, u32),
        block: (u32, u32, u32),
        shared_mem: u32,
        args: &mut [*mut c_void],
    ) -> Result<(), LaunchError> {
        self.rt.bind()?;

        unsafe {
            let cu_launch: Symbol<LaunchFn> = self.rt.symbol(b"cuLaunchKernel\0")?;

            let res = cu_launch(
                pipeline.handle(),
                grid.0, grid.1, grid.2,
                block.0, block.1, block.2,
                shared_mem,
                self.rt.stream(),
                args.as_mut_ptr(),
                ptr::null_mut(),
            );
            GpuSafety::check(res, "cuLaunchKernel")
                .map_err(|status| LaunchError::from_status(status, false))?;
        }

        trace!("launched '{}' grid={:?} block={:?}", pipeline.name(), grid, block);
        Ok(())
    }

    /// Blocks until every queued launch has finished. The context-wide sync
    /// also makes managed pages safe for host access on devices without
    /// concurrent managed access.
    pub fn synchronize(&self) -> Result<(), LaunchError> {
        unsafe {
            let cu_stream_sync: Symbol<unsafe extern "C" fn(CUstream) -> i32> =
                self.rt.symbol(b"cuStreamSynchronize\0")?;
            let cu_ctx_sync: Symbol<unsafe extern "C" fn() -> i32> =
                self.rt.symbol(b"cuCtxSynchronize\0")?;

            GpuSafety::check(cu_stream_sync(self.rt.stream()), "cuStreamSynchronize")
                .map_err(|status| LaunchError::from_status(status, true))?;
            GpuSafety::check(cu_ctx_sync(), "cuCtxSynchronize")
                .map_err(|status| LaunchError::from_status(status, true))?;
        }
        Ok(())
    }

    pub(crate) fn context(&self) -> CUcontext {
        self.rt.context()
    }
}
