use std::mem::size_of;

use super::GpuMemoryError;

/// Element types that may live in a shared buffer: plain fixed-width
/// values with no drop glue and a zero default.
pub trait DeviceElement: Copy + Default + Send + Sync + 'static {}

impl DeviceElement for f32 {}
impl DeviceElement for u32 {}

/// Size of one buffer. `byte_length == count * element_size` holds for
/// every value of this type; constructors reject anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferLayout {
    count: usize,
    element_size: usize,
}

impl BufferLayout {
    pub fn new<T: DeviceElement>(count: usize) -> Result<Self, GpuMemoryError> {
        let element_size = size_of::<T>();
        if count == 0 {
            return Err(GpuMemoryError::EmptyBuffer);
        }
        if count.checked_mul(element_size).map_or(true, |b| b > isize::MAX as usize) {
            return Err(GpuMemoryError::TooLarge { count, element_size });
        }
        Ok(Self { count, element_size })
    }

    pub fn from_bytes<T: DeviceElement>(byte_length: usize) -> Result<Self, GpuMemoryError> {
        let element_size = size_of::<T>();
        if byte_length % element_size != 0 {
            return Err(GpuMemoryError::Misaligned { byte_length, element_size });
        }
        Self::new::<T>(byte_length / element_size)
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn element_size(&self) -> usize {
        self.element_size
    }

    pub fn byte_length(&self) -> usize {
        self.count * self.element_size
    }
}
