pub mod compiler;
pub mod error;

pub use compiler::{clamp_arch, NvrtcCompiler, NvrtcProgram};
pub use error::NvrtcError;
