pub mod error;
pub mod launch;

pub use error::LaunchError;
pub use launch::GpuLauncher;
