use libloading::Symbol;
use log::{debug, trace};
use std::marker::PhantomData;
use std::slice;

use super::layout::{BufferLayout, DeviceElement};
use super::GpuMemoryError;
use crate::gpu::runtime::context::CUcontext;
use crate::gpu::runtime::GpuRuntime;
use crate::gpu::safety::GpuSafety;

pub type CUdeviceptr = u64;

const CU_MEM_ATTACH_GLOBAL: u32 = 0x1;

/// Managed allocation visible to host and device at the same address.
/// There is no upload or download step: the host writes through
/// `as_mut_slice`, the kernel reads the same pages.
///
/// Host access is only sound while no submission is running. Submissions
/// are synchronous and borrow their buffers, so safe code cannot overlap
/// the two.
pub struct SharedBuffer<'rt, T: DeviceElement> {
    rt: &'rt GpuRuntime,
    ptr: CUdeviceptr,
    layout: BufferLayout,
    _marker: PhantomData<T>,
}

impl<'rt, T: DeviceElement> SharedBuffer<'rt, T> {
    pub fn len(&self) -> usize {
        self.layout.count()
    }

    pub fn is_empty(&self) -> bool {
        self.layout.count() == 0
    }

    pub fn layout(&self) -> BufferLayout {
        self.layout
    }

    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.ptr as usize as *const T, self.layout.count()) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.ptr as usize as *mut T, self.layout.count()) }
    }

    pub(crate) fn device_ptr(&self) -> CUdeviceptr {
        self.ptr
    }

    pub(crate) fn context(&self) -> CUcontext {
        self.rt.context()
    }
}

impl<T: DeviceElement> Drop for SharedBuffer<'_, T> {
    fn drop(&mut self) {
        unsafe {
            if let Ok(cu_free) =
                self.rt.symbol::<unsafe extern "C" fn(CUdeviceptr) -> i32>(b"cuMemFree_v2\0")
            {
                let _ = GpuSafety::check(cu_free(self.ptr), "cuMemFree_v2");
            }
        }
        trace!("freed {} bytes at {:#x}", self.layout.byte_length(), self.ptr);
    }
}

pub struct GpuMemoryEngine<'rt> {
    rt: &'rt GpuRuntime,
}

impl<'rt> GpuMemoryEngine<'rt> {
    pub fn new(rt: &'rt GpuRuntime) -> Self {
        Self { rt }
    }

    /// Allocates `count` zeroed elements of shared memory.
    pub fn alloc_shared<T: DeviceElement>(&self, count: usize) -> Result<SharedBuffer<'rt, T>, GpuMemoryError> {
        let layout = BufferLayout::new::<T>(count)?;
        self.alloc_layout(layout)
    }

    /// Same as `alloc_shared`, sized in bytes. A length that is not a whole
    /// number of elements is rejected before the driver is called.
    pub fn alloc_bytes<T: DeviceElement>(&self, byte_length: usize) -> Result<SharedBuffer<'rt, T>, GpuMemoryError> {
        let layout = BufferLayout::from_bytes::<T>(byte_length)?;
        self.alloc_layout(layout)
    }

    /// One-element buffer holding `value`.
    pub fn alloc_scalar<T: DeviceElement>(&self, value: T) -> Result<SharedBuffer<'rt, T>, GpuMemoryError> {
        let mut buf = self.alloc_shared::<T>(1)?;
        buf.as_mut_slice()[0] = value;
        Ok(buf)
    }

    fn alloc_layout<T: DeviceElement>(&self, layout: BufferLayout) -> Result<SharedBuffer<'rt, T>, GpuMemoryError> {
        self.rt.bind()?;

        let bytes = layout.byte_length();
        let ptr = unsafe {
            let cu_mem_alloc_managed: Symbol<unsafe extern "C" fn(*mut CUdeviceptr, usize, u32) -> i32> =
                self.rt.symbol(b"cuMemAllocManaged\0")?;

            let mut ptr: CUdeviceptr = 0;
            GpuSafety::check(
                cu_mem_alloc_managed(&mut ptr, bytes, CU_MEM_ATTACH_GLOBAL),
                "cuMemAllocManaged",
            )
            .map_err(|status| GpuMemoryError::AllocationFailed { bytes, status })?;
            ptr
        };
        debug!("allocated {} shared bytes at {:#x}", bytes, ptr);

        let mut buf = SharedBuffer {
            rt: self.rt,
            ptr,
            layout,
            _marker: PhantomData,
        };
        buf.as_mut_slice().fill(T::default());
        Ok(buf)
    }
}
