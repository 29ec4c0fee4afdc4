use log::info;
use std::io::Write;

use crate::config::ComputeConfig;
use crate::error::ComputeError;
use crate::gpu::dispatch::{Completion, DispatchEngine, VECTOR_ADD_ARITY};
use crate::gpu::loader::KernelProgram;
use crate::gpu::memory::{BufferSet, GpuMemoryEngine};
use crate::gpu::pipeline::ComputePipeline;
use crate::gpu::runtime::GpuRuntime;
use crate::kernels::{VECTOR_ADD_ENTRY, VECTOR_ADD_SRC};
use crate::report::{verify_pattern, Reporter};

/// Device, kernel and pipeline setup, then one fill-dispatch-wait cycle.
/// `inspect` sees the finished submission while its buffers are alive.
///
/// Everything is owned by this call and released in reverse order on
/// return, so independent runs never share device state.
pub fn with_completion<R, F>(config: &ComputeConfig, inspect: F) -> Result<R, ComputeError>
where
    F: FnOnce(&Completion<'_>) -> Result<R, ComputeError>,
{
    config.validate()?;

    let rt = GpuRuntime::new()?;
    let program = KernelProgram::compile(&rt, VECTOR_ADD_SRC, VECTOR_ADD_ENTRY)?;
    let function = program.lookup_entry_point(&config.entry_point)?;
    let pipeline = ComputePipeline::build(function, VECTOR_ADD_ARITY)?;
    let engine = DispatchEngine::new(pipeline, config.threadgroup_size)?;

    let memory = GpuMemoryEngine::new(&rt);
    let mut buffers = BufferSet::allocate(&memory, config.element_count)?;
    buffers.write_pattern()?;
    info!("{} elements staged on {}", buffers.count(), rt.device_name());

    let completion = engine.dispatch(&mut buffers)?;
    inspect(&completion)
}

/// The full program: run once, print the report to `out`, then check
/// every output element against `3 * i`.
pub fn run<W: Write>(config: &ComputeConfig, out: &mut W) -> Result<(), ComputeError> {
    with_completion(config, |completion| {
        Reporter::default().report(out, completion.output(), completion.elapsed())?;
        verify_pattern(completion.output())?;
        Ok(())
    })
}

/// Runs once and returns a copy of the output buffer.
pub fn run_to_vec(config: &ComputeConfig) -> Result<Vec<f32>, ComputeError> {
    with_completion(config, |completion| Ok(completion.output().to_vec()))
}
