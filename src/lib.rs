//! Vector addition on a CUDA device: the driver and NVRTC are loaded at
//! runtime, buffers live in managed memory shared by host and device, and
//! a single synchronous submission computes `C[i] = A[i] + B[i]`.

pub mod app;
pub mod config;
pub mod error;
pub mod gpu;
pub mod kernels;
pub mod report;

pub use config::ComputeConfig;
pub use error::ComputeError;
