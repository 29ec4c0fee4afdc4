use log::debug;
use std::ffi::c_void;
use std::time::{Duration, Instant};

use super::{DispatchError, LaunchConfig};
use crate::gpu::launcher::GpuLauncher;
use crate::gpu::memory::CUdeviceptr;
use crate::gpu::pipeline::ComputePipeline;

/// Records buffer bindings and one dispatch for a pipeline.
///
/// `end_encoding` consumes the encoder, so nothing can be added once the
/// command is closed.
#[derive(Debug)]
pub struct CommandEncoder {
    slots: Vec<Option<CUdeviceptr>>,
    max_group_size: u32,
    launch: Option<LaunchConfig>,
}

impl CommandEncoder {
    pub fn new(arity: usize, max_group_size: u32) -> Self {
        Self {
            slots: vec![None; arity],
            max_group_size,
            launch: None,
        }
    }

    pub fn for_pipeline(pipeline: &ComputePipeline<'_>) -> Self {
        Self::new(pipeline.arity(), pipeline.max_threads_per_group())
    }

    pub fn set_buffer(&mut self, slot: usize, ptr: CUdeviceptr) -> Result<(), DispatchError> {
        if ptr == 0 {
            return Err(DispatchError::InvalidBinding { slot, reason: "null device pointer" });
        }
        let entry = self
            .slots
            .get_mut(slot)
            .ok_or(DispatchError::InvalidBinding { slot, reason: "slot out of range" })?;
        if entry.is_some() {
            return Err(DispatchError::DuplicateBinding(slot));
        }
        *entry = Some(ptr);
        Ok(())
    }

    pub fn dispatch_threads(&mut self, launch: LaunchConfig) -> Result<(), DispatchError> {
        if self.launch.is_some() {
            return Err(DispatchError::AlreadyEncoded);
        }
        if launch.group_size > self.max_group_size {
            return Err(DispatchError::PipelineMismatch(format!(
                "group size {} exceeds the pipeline limit of {}",
                launch.group_size, self.max_group_size
            )));
        }
        self.launch = Some(launch);
        Ok(())
    }

    pub fn end_encoding(self) -> Result<EncodedCommand, DispatchError> {
        let launch = self.launch.ok_or(DispatchError::NotEncoded)?;
        let args = self
            .slots
            .iter()
            .enumerate()
            .map(|(slot, ptr)| ptr.ok_or(DispatchError::UnboundSlot(slot)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(EncodedCommand { args, launch })
    }
}

/// A closed command: bindings plus one dispatch. Submitted at most once.
#[derive(Debug)]
pub struct EncodedCommand {
    args: Vec<CUdeviceptr>,
    launch: LaunchConfig,
}

impl EncodedCommand {
    pub fn launch_config(&self) -> LaunchConfig {
        self.launch
    }

    pub fn bindings(&self) -> &[CUdeviceptr] {
        &self.args
    }

    /// Launches the command and blocks until the device reports completion.
    /// Returns the wall-clock time from commit to completion.
    pub fn commit_and_wait(
        self,
        pipeline: &ComputePipeline<'_>,
        launcher: &GpuLauncher<'_>,
    ) -> Result<Duration, DispatchError> {
        if pipeline.context() != launcher.context() {
            return Err(DispatchError::PipelineMismatch(
                "launcher runs on a different device context than the pipeline".into(),
            ));
        }
        if pipeline.arity() != self.args.len() {
            return Err(DispatchError::PipelineMismatch(format!(
                "pipeline '{}' takes {} arguments, command binds {}",
                pipeline.name(),
                pipeline.arity(),
                self.args.len()
            )));
        }

        // cuLaunchKernel wants a pointer to each argument value.
        let mut params: Vec<*mut c_void> = self
            .args
            .iter()
            .map(|p| p as *const CUdeviceptr as *mut c_void)
            .collect();

        let start = Instant::now();
        launcher.launch(pipeline, self.launch.grid(), self.launch.block(), 0, &mut params)?;
        launcher.synchronize()?;
        let elapsed = start.elapsed();

        debug!(
            "'{}' completed: {} threads in {} groups, {:?}",
            pipeline.name(),
            self.launch.total_threads(),
            self.launch.groups,
            elapsed
        );
        Ok(elapsed)
    }
}
