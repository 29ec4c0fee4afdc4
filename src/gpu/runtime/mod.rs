pub mod context;
pub mod error;
pub mod logging;

pub use context::GpuRuntime;
pub use error::{GpuRuntimeError, MissingSymbol};
