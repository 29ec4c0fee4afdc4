use libloading::Symbol;
use log::info;

use super::PipelineError;
use crate::gpu::loader::loader::CUfunction;
use crate::gpu::loader::CudaFunction;
use crate::gpu::runtime::context::CUcontext;
use crate::gpu::runtime::GpuRuntime;
use crate::gpu::safety::GpuSafety;

const CU_FUNC_ATTRIBUTE_MAX_THREADS_PER_BLOCK: i32 = 0;
const CU_FUNC_ATTRIBUTE_NUM_REGS: i32 = 4;

/// A kernel entry point ready for dispatch.
///
/// Built once and never mutated afterwards, so it can be dispatched any
/// number of times.
pub struct ComputePipeline<'m> {
    function: CudaFunction<'m>,
    arity: usize,
    max_threads_per_group: u32,
    registers: u32,
}

impl<'m> ComputePipeline<'m> {
    /// `arity` is the number of argument slots the kernel expects.
    pub fn build(function: CudaFunction<'m>, arity: usize) -> Result<Self, PipelineError> {
        if function.handle.is_null() {
            return Err(PipelineError::NullFunction(function.name().into()));
        }
        if arity == 0 {
            return Err(PipelineError::InvalidArity(function.name().into()));
        }

        let rt = function.runtime();
        rt.bind()?;

        let max_threads = query_attribute(rt, &function, CU_FUNC_ATTRIBUTE_MAX_THREADS_PER_BLOCK)?;
        if max_threads <= 0 {
            return Err(PipelineError::Unlaunchable(function.name().into()));
        }
        let registers = query_attribute(rt, &function, CU_FUNC_ATTRIBUTE_NUM_REGS)?;

        info!(
            "pipeline '{}' built: {} slots, max {} threads/group, {} registers",
            function.name(),
            arity,
            max_threads,
            registers
        );

        Ok(Self {
            function,
            arity,
            max_threads_per_group: max_threads as u32,
            registers: registers.max(0) as u32,
        })
    }

    pub fn name(&self) -> &str {
        self.function.name()
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn max_threads_per_group(&self) -> u32 {
        self.max_threads_per_group
    }

    pub fn registers(&self) -> u32 {
        self.registers
    }

    pub(crate) fn handle(&self) -> CUfunction {
        self.function.handle
    }

    pub(crate) fn runtime(&self) -> &'m GpuRuntime {
        self.function.runtime()
    }

    pub(crate) fn context(&self) -> CUcontext {
        self.runtime().context()
    }
}

fn query_attribute(rt: &GpuRuntime, function: &CudaFunction<'_>, attr: i32) -> Result<i32, PipelineError> {
    unsafe {
        let cu_func_get_attribute: Symbol<unsafe extern "C" fn(*mut i32, i32, CUfunction) -> i32> =
            rt.symbol(b"cuFuncGetAttribute\0")?;

        let mut value = 0;
        GpuSafety::check(
            cu_func_get_attribute(&mut value, attr, function.handle),
            "cuFuncGetAttribute",
        )
        .map_err(|status| PipelineError::AttributeQueryFailed {
            name: function.name().into(),
            status,
        })?;

        Ok(value)
    }
}
