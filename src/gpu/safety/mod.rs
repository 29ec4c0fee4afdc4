pub mod error_codes;
pub mod safety_layer;

pub use error_codes::{describe, CudaStatus};
pub use safety_layer::GpuSafety;
