pub mod detect;
pub mod error;

pub use detect::{arch_for_capability, CudaArchDetector, FALLBACK_ARCH};
pub use error::ArchError;
