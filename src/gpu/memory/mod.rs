pub mod buffer_set;
pub mod engine;
pub mod error;
pub mod layout;

pub use buffer_set::{write_pattern, BufferSet};
pub use engine::{CUdeviceptr, GpuMemoryEngine, SharedBuffer};
pub use error::GpuMemoryError;
pub use layout::{BufferLayout, DeviceElement};
