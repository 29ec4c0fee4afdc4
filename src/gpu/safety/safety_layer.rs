use log::warn;

use super::error_codes::{
    CudaStatus, CUDA_ERROR_ILLEGAL_ADDRESS, CUDA_ERROR_ILLEGAL_INSTRUCTION,
    CUDA_ERROR_LAUNCH_FAILED, CUDA_ERROR_LAUNCH_TIMEOUT, CUDA_ERROR_MISALIGNED_ADDRESS,
    CUDA_ERROR_UNKNOWN, CUDA_SUCCESS,
};

pub struct GpuSafety;

impl GpuSafety {
    /// Turns a raw `CUresult` into `Ok` or a logged `CudaStatus`.
    pub fn check(code: i32, context: &str) -> Result<(), CudaStatus> {
        if code == CUDA_SUCCESS {
            return Ok(());
        }

        let status = CudaStatus(code);
        warn!("[SAFETY] CUDA error in {} -> {}", context, status);

        Err(status)
    }

    /// Returns true when the code leaves the context unusable. Every later
    /// call on the same context fails with the same status.
    pub fn is_device_lost(code: i32) -> bool {
        matches!(
            code,
            CUDA_ERROR_ILLEGAL_ADDRESS
                | CUDA_ERROR_LAUNCH_TIMEOUT
                | CUDA_ERROR_ILLEGAL_INSTRUCTION
                | CUDA_ERROR_MISALIGNED_ADDRESS
                | CUDA_ERROR_LAUNCH_FAILED
                | CUDA_ERROR_UNKNOWN
        )
    }
}
