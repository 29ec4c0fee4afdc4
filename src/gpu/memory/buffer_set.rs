use rayon::prelude::*;

use super::engine::{CUdeviceptr, GpuMemoryEngine, SharedBuffer};
use super::GpuMemoryError;
use crate::gpu::runtime::context::CUcontext;

/// Inputs A and B, output C and the scalar element count, all of the same
/// length. The output is only readable through a completed submission.
pub struct BufferSet<'rt> {
    a: SharedBuffer<'rt, f32>,
    b: SharedBuffer<'rt, f32>,
    c: SharedBuffer<'rt, f32>,
    count: SharedBuffer<'rt, u32>,
}

impl<'rt> BufferSet<'rt> {
    /// Allocates all four buffers for `count` elements.
    pub fn allocate(engine: &GpuMemoryEngine<'rt>, count: usize) -> Result<Self, GpuMemoryError> {
        let scalar = u32::try_from(count)
            .map_err(|_| GpuMemoryError::TooLarge { count, element_size: std::mem::size_of::<f32>() })?;

        let a = engine.alloc_shared::<f32>(count)?;
        let b = engine.alloc_shared::<f32>(count)?;
        let c = engine.alloc_shared::<f32>(count)?;
        let count = engine.alloc_scalar::<u32>(scalar)?;

        Self::new(a, b, c, count)
    }

    pub fn new(
        a: SharedBuffer<'rt, f32>,
        b: SharedBuffer<'rt, f32>,
        c: SharedBuffer<'rt, f32>,
        count: SharedBuffer<'rt, u32>,
    ) -> Result<Self, GpuMemoryError> {
        let expected = a.len();
        for found in [b.len(), c.len()] {
            if found != expected {
                return Err(GpuMemoryError::LengthMismatch { expected, found });
            }
        }
        if count.len() != 1 {
            return Err(GpuMemoryError::ScalarShape(count.len()));
        }
        let ctx = a.context();
        if [b.context(), c.context(), count.context()].iter().any(|other| *other != ctx) {
            return Err(GpuMemoryError::ContextMismatch);
        }
        let stored = count.as_slice()[0] as usize;
        if stored != expected {
            return Err(GpuMemoryError::CountMismatch { expected, found: stored });
        }

        Ok(Self { a, b, c, count })
    }

    pub fn count(&self) -> usize {
        self.a.len()
    }

    pub fn inputs(&self) -> (&[f32], &[f32]) {
        (self.a.as_slice(), self.b.as_slice())
    }

    pub fn inputs_mut(&mut self) -> (&mut [f32], &mut [f32]) {
        (self.a.as_mut_slice(), self.b.as_mut_slice())
    }

    /// Fills `A[i] = i`, `B[i] = 2i`.
    pub fn write_pattern(&mut self) -> Result<(), GpuMemoryError> {
        let (a, b) = self.inputs_mut();
        write_pattern(a, b)
    }

    /// Device pointers in kernel slot order: A, B, C, count.
    pub(crate) fn bindings(&self) -> [CUdeviceptr; 4] {
        [
            self.a.device_ptr(),
            self.b.device_ptr(),
            self.c.device_ptr(),
            self.count.device_ptr(),
        ]
    }

    pub(crate) fn context(&self) -> CUcontext {
        self.a.context()
    }

    pub(crate) fn output(&self) -> &[f32] {
        self.c.as_slice()
    }
}

/// Host fill for the inputs. The expected sum is `C[i] = 3i`.
pub fn write_pattern(a: &mut [f32], b: &mut [f32]) -> Result<(), GpuMemoryError> {
    if a.len() != b.len() {
        return Err(GpuMemoryError::LengthMismatch { expected: a.len(), found: b.len() });
    }

    a.par_iter_mut()
        .zip(b.par_iter_mut())
        .enumerate()
        .for_each(|(i, (x, y))| {
            *x = i as f32;
            *y = (i * 2) as f32;
        });

    Ok(())
}
