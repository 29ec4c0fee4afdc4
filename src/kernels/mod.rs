//! Kernel sources compiled at first use by NVRTC.

/// Elementwise `C[i] = A[i] + B[i]` over `f32`, guarded by `i < *count`.
pub const VECTOR_ADD_SRC: &str = include_str!("vector_add.cu");

pub const VECTOR_ADD_ENTRY: &str = "vector_add";
