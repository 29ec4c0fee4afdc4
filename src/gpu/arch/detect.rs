use libloading::Symbol;

use super::ArchError;
use crate::gpu::runtime::context::CUdevice;
use crate::gpu::runtime::GpuRuntime;
use crate::gpu::safety::GpuSafety;

const CU_DEVICE_ATTRIBUTE_COMPUTE_CAPABILITY_MAJOR: i32 = 75;
const CU_DEVICE_ATTRIBUTE_COMPUTE_CAPABILITY_MINOR: i32 = 76;

/// Oldest virtual architecture every supported NVRTC release still accepts.
pub const FALLBACK_ARCH: &str = "compute_52";

pub struct CudaArchDetector<'rt> {
    rt: &'rt GpuRuntime,
}

impl<'rt> CudaArchDetector<'rt> {
    pub fn new(rt: &'rt GpuRuntime) -> Self {
        Self { rt }
    }

    pub fn compute_capability(&self) -> Result<(i32, i32), ArchError> {
        unsafe {
            let cu_device_get_attr: Symbol<unsafe extern "C" fn(*mut i32, i32, CUdevice) -> i32> =
                self.rt.symbol(b"cuDeviceGetAttribute\0")?;

            let device = self.rt.device();
            let mut major = 0;
            let mut minor = 0;

            GpuSafety::check(
                cu_device_get_attr(&mut major, CU_DEVICE_ATTRIBUTE_COMPUTE_CAPABILITY_MAJOR, device),
                "cuDeviceGetAttribute(CC_MAJOR)",
            )
            .map_err(ArchError::DetectionFailed)?;
            GpuSafety::check(
                cu_device_get_attr(&mut minor, CU_DEVICE_ATTRIBUTE_COMPUTE_CAPABILITY_MINOR, device),
                "cuDeviceGetAttribute(CC_MINOR)",
            )
            .map_err(ArchError::DetectionFailed)?;

            Ok((major, minor))
        }
    }

    /// Virtual architecture flag for NVRTC. Always `compute_XY`, never
    /// `sm_XY`, so the driver JITs the PTX for the exact device.
    pub fn arch_flag(&self) -> Result<String, ArchError> {
        let (major, minor) = self.compute_capability()?;
        Ok(arch_for_capability(major, minor))
    }
}

/// Maps a compute capability to the matching `compute_XY` flag.
pub fn arch_for_capability(major: i32, minor: i32) -> String {
    if major < 5 || (major == 5 && minor < 2) {
        return FALLBACK_ARCH.to_string();
    }
    format!("compute_{}{}", major, minor)
}
