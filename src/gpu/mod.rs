pub mod arch;
pub mod dispatch;
pub mod launcher;
pub mod loader;
pub mod memory;
pub mod nvrtc;
pub mod pipeline;
pub mod runtime;
pub mod safety;
