pub mod error;
pub mod loader;
pub mod program;

pub use error::CudaLoaderError;
pub use loader::{CudaFunction, CudaLoader, CudaModule};
pub use program::{CompileError, KernelProgram};
