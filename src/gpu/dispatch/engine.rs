use log::info;
use std::time::Duration;

use super::{CommandEncoder, DispatchError, LaunchConfig};
use crate::gpu::launcher::GpuLauncher;
use crate::gpu::memory::BufferSet;
use crate::gpu::pipeline::ComputePipeline;

/// Kernel slots, in the order the vector-add entry point declares them.
pub const SLOT_A: usize = 0;
pub const SLOT_B: usize = 1;
pub const SLOT_C: usize = 2;
pub const SLOT_COUNT: usize = 3;
pub const VECTOR_ADD_ARITY: usize = 4;

/// Owns the pipeline and submits one synchronous command per call.
pub struct DispatchEngine<'m> {
    pipeline: ComputePipeline<'m>,
    launcher: GpuLauncher<'m>,
    group_size: u32,
}

impl<'m> DispatchEngine<'m> {
    pub fn new(pipeline: ComputePipeline<'m>, group_size: u32) -> Result<Self, DispatchError> {
        if group_size == 0 {
            return Err(DispatchError::InvalidGroupSize);
        }
        if group_size > pipeline.max_threads_per_group() {
            return Err(DispatchError::PipelineMismatch(format!(
                "group size {} exceeds the limit of {} for '{}'",
                group_size,
                pipeline.max_threads_per_group(),
                pipeline.name()
            )));
        }
        let launcher = GpuLauncher::new(pipeline.runtime());
        Ok(Self { pipeline, launcher, group_size })
    }

    pub fn pipeline(&self) -> &ComputePipeline<'m> {
        &self.pipeline
    }

    pub fn group_size(&self) -> u32 {
        self.group_size
    }

    /// Binds A, B, C and the count to slots 0..=3, dispatches one grid over
    /// `buffers.count()` elements and waits for it. The buffers stay
    /// borrowed by the returned `Completion`.
    pub fn dispatch<'b>(&self, buffers: &'b mut BufferSet<'_>) -> Result<Completion<'b>, DispatchError> {
        if buffers.context() != self.pipeline.context() {
            return Err(DispatchError::PipelineMismatch(
                "buffers were allocated on a different device context".into(),
            ));
        }
        let launch = LaunchConfig::for_elements(buffers.count(), self.group_size)?;

        let mut encoder = CommandEncoder::for_pipeline(&self.pipeline);
        let [a, b, c, count] = buffers.bindings();
        encoder.set_buffer(SLOT_A, a)?;
        encoder.set_buffer(SLOT_B, b)?;
        encoder.set_buffer(SLOT_C, c)?;
        encoder.set_buffer(SLOT_COUNT, count)?;
        encoder.dispatch_threads(launch)?;
        let command = encoder.end_encoding()?;

        let elapsed = command.commit_and_wait(&self.pipeline, &self.launcher)?;
        info!(
            "dispatched {} elements ({} idle threads) in {:?}",
            launch.count,
            launch.idle_threads(),
            elapsed
        );

        Ok(Completion { buffers, launch, elapsed })
    }
}

/// Proof that a submission finished. The output buffer can only be read
/// through this value.
pub struct Completion<'b> {
    buffers: &'b BufferSet<'b>,
    launch: LaunchConfig,
    elapsed: Duration,
}

impl<'b> Completion<'b> {
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn launch_config(&self) -> LaunchConfig {
        self.launch
    }

    pub fn count(&self) -> usize {
        self.buffers.count()
    }

    pub fn output(&self) -> &'b [f32] {
        self.buffers.output()
    }

    pub fn inputs(&self) -> (&'b [f32], &'b [f32]) {
        self.buffers.inputs()
    }

    pub fn read(&self, index: usize) -> Option<f32> {
        self.output().get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;
    use crate::gpu::loader::KernelProgram;
    use crate::gpu::memory::{write_pattern, GpuMemoryEngine};
    use crate::gpu::nvrtc::NvrtcCompiler;
    use crate::gpu::runtime::GpuRuntime;
    use crate::kernels::{VECTOR_ADD_ENTRY, VECTOR_ADD_SRC};

    const SENTINEL: f32 = -7.5;

    fn runtime_or_skip() -> Option<GpuRuntime> {
        match (GpuRuntime::new(), NvrtcCompiler::new()) {
            (Ok(rt), Ok(_)) => Some(rt),
            _ => {
                eprintln!("CUDA or NVRTC not available, skipping test");
                None
            }
        }
    }

    #[test]
    #[serial]
    fn threads_past_count_leave_the_tail_untouched() {
        let Some(rt) = runtime_or_skip() else {
            return;
        };

        let program = KernelProgram::compile(&rt, VECTOR_ADD_SRC, VECTOR_ADD_ENTRY).unwrap();
        let function = program.lookup_entry_point(VECTOR_ADD_ENTRY).unwrap();
        let engine = DispatchEngine::new(ComputePipeline::build(function, VECTOR_ADD_ARITY).unwrap(), 4).unwrap();

        // Eight slots of storage, but the kernel is told only five are valid.
        let memory = GpuMemoryEngine::new(&rt);
        let mut a = memory.alloc_shared::<f32>(8).unwrap();
        let mut b = memory.alloc_shared::<f32>(8).unwrap();
        let mut c = memory.alloc_shared::<f32>(8).unwrap();
        let count = memory.alloc_scalar::<u32>(5).unwrap();
        write_pattern(a.as_mut_slice(), b.as_mut_slice()).unwrap();
        c.as_mut_slice().fill(SENTINEL);

        let launch = LaunchConfig::for_elements(5, engine.group_size()).unwrap();
        assert_eq!(launch.total_threads(), 8);

        let mut encoder = CommandEncoder::for_pipeline(engine.pipeline());
        encoder.set_buffer(SLOT_A, a.device_ptr()).unwrap();
        encoder.set_buffer(SLOT_B, b.device_ptr()).unwrap();
        encoder.set_buffer(SLOT_C, c.device_ptr()).unwrap();
        encoder.set_buffer(SLOT_COUNT, count.device_ptr()).unwrap();
        encoder.dispatch_threads(launch).unwrap();
        encoder
            .end_encoding()
            .unwrap()
            .commit_and_wait(&engine.pipeline, &engine.launcher)
            .unwrap();

        assert_eq!(&c.as_slice()[..5], &[0.0, 3.0, 6.0, 9.0, 12.0]);
        assert_eq!(&c.as_slice()[5..], &[SENTINEL; 3]);
    }
}
